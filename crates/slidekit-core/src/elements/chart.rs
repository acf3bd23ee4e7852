//! Chart element payload.
//!
//! The data is inert here; drawing is delegated to a chart renderer in the
//! render crate.

use super::SerializableColor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Chart types supported on slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Vertical bar chart.
    #[default]
    Bar,
    /// Horizontal bar chart.
    BarHorizontal,
    /// Line chart.
    Line,
    /// Area chart (filled line).
    Area,
    /// Pie chart.
    Pie,
    /// Donut chart.
    Donut,
    /// Scatter plot.
    Scatter,
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "bar_horizontal" | "barh" => Ok(Self::BarHorizontal),
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "pie" => Ok(Self::Pie),
            "donut" => Ok(Self::Donut),
            "scatter" => Ok(Self::Scatter),
            _ => Err(format!("Unknown chart type: {s}")),
        }
    }
}

impl ChartType {
    /// Pie and donut charts use one slice per label instead of axes.
    pub fn is_radial(self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Donut)
    }
}

/// A named data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
    /// Overrides the theme palette colour for this series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            color: None,
        }
    }
}

/// Typed chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartContent {
    pub chart_type: ChartType,
    pub title: Option<String>,
    /// Category labels, one per value index.
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Theme id looked up in the theme table.
    pub theme: Option<String>,
    pub show_legend: bool,
}

impl Default for ChartContent {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Bar,
            title: None,
            labels: Vec::new(),
            series: Vec::new(),
            theme: None,
            show_legend: true,
        }
    }
}

impl ChartContent {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..Default::default()
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Largest value across all series, or 0 for empty data.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    /// Number of categories (longest of labels and series).
    pub fn category_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len())
            .chain(std::iter::once(self.labels.len()))
            .max()
            .unwrap_or(0)
    }
}
