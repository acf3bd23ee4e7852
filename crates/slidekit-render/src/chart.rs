//! Chart rendering seam.
//!
//! The pipeline does not know how charts look. It hands the chart payload,
//! the frame and the render scale to a [`ChartRenderer`]; the
//! [`BasicChartRenderer`] here covers every chart type with flat shapes.

use crate::shapes::TOLERANCE;
use crate::text::{TextBox, measure};
use crate::visual::{Primitive, StrokeVisual, TextRun};
use kurbo::{Arc, BezPath, Circle, Point, Rect, Shape, Size, Vec2};
use slidekit_core::elements::{ChartContent, ChartType, HorizontalAlign, SerializableColor, VerticalAlign};
use slidekit_core::theme::ResolvedTheme;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Draws chart payloads.
pub trait ChartRenderer {
    /// Primitives for `chart` in a box of `frame` slide units, already
    /// multiplied by `scale`.
    fn render_chart(
        &self,
        chart: &ChartContent,
        frame: Size,
        scale: f64,
        show_legend: bool,
        theme: &ResolvedTheme,
    ) -> Vec<Primitive>;
}

const PADDING: f64 = 8.0;
const TITLE_SIZE: f64 = 14.0;
const LABEL_SIZE: f64 = 10.0;
const LEGEND_SIZE: f64 = 11.0;
const SWATCH: f64 = 10.0;
const DONUT_HOLE: f64 = 0.6;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicChartRenderer;

impl ChartRenderer for BasicChartRenderer {
    fn render_chart(
        &self,
        chart: &ChartContent,
        frame: Size,
        scale: f64,
        show_legend: bool,
        theme: &ResolvedTheme,
    ) -> Vec<Primitive> {
        let mut prims = Vec::new();
        let mut plot = frame.to_rect().inset(-PADDING);

        if let Some(title) = chart.title.as_deref().filter(|t| !t.is_empty()) {
            let height = TITLE_SIZE * 1.2;
            let rect = Rect::new(plot.x0, plot.y0, plot.x1, plot.y0 + height);
            prims.push(label(title, rect, TITLE_SIZE, true, theme.text_color, HorizontalAlign::Center));
            plot.y0 += height + 4.0;
        }

        let legend = legend_entries(chart, theme);
        if show_legend && !legend.is_empty() {
            let height = LEGEND_SIZE * 1.2;
            let row = Rect::new(plot.x0, plot.y1 - height, plot.x1, plot.y1);
            draw_legend(&mut prims, &legend, row, theme);
            plot.y1 -= height + 4.0;
        }

        if plot.width() > 0.0 && plot.height() > 0.0 {
            if chart.chart_type.is_radial() {
                draw_radial(&mut prims, chart, plot, theme);
            } else {
                draw_cartesian(&mut prims, chart, plot, theme);
            }
        }

        prims.into_iter().map(|p| p.scaled(scale)).collect()
    }
}

fn label(text: &str, rect: Rect, font_size: f64, bold: bool, color: SerializableColor, align: HorizontalAlign) -> Primitive {
    let text_box = TextBox {
        size: rect.size(),
        padding: 0.0,
        font_size,
        line_height: 1.2,
        align,
        vertical_align: VerticalAlign::Middle,
    };
    let mut lines = text_box.layout(text);
    lines.truncate(1);
    for line in &mut lines {
        line.origin += rect.origin().to_vec2();
    }
    Primitive::Text(TextRun {
        lines,
        font_family: "Inter".to_string(),
        font_size,
        color,
        bold,
        italic: false,
        underline: false,
    })
}

fn series_color(chart: &ChartContent, index: usize, theme: &ResolvedTheme) -> SerializableColor {
    chart
        .series
        .get(index)
        .and_then(|s| s.color)
        .unwrap_or_else(|| theme.series_color(index))
}

/// Legend labels with their colours: categories for radial charts, series
/// names otherwise.
fn legend_entries(chart: &ChartContent, theme: &ResolvedTheme) -> Vec<(String, SerializableColor)> {
    if chart.chart_type.is_radial() {
        chart
            .labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), theme.series_color(i)))
            .collect()
    } else {
        chart
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), series_color(chart, i, theme)))
            .collect()
    }
}

fn draw_legend(prims: &mut Vec<Primitive>, entries: &[(String, SerializableColor)], row: Rect, theme: &ResolvedTheme) {
    let mut x = row.x0;
    let swatch_top = row.center().y - SWATCH / 2.0;
    for (name, color) in entries {
        if x >= row.x1 {
            break;
        }
        let swatch = Rect::new(x, swatch_top, x + SWATCH, swatch_top + SWATCH);
        prims.push(Primitive::fill(swatch.to_path(TOLERANCE), *color));
        x += SWATCH + 4.0;
        let width = measure(name, LEGEND_SIZE);
        let text_rect = Rect::new(x, row.y0, (x + width).min(row.x1), row.y1);
        prims.push(label(name, text_rect, LEGEND_SIZE, false, theme.text_color, HorizontalAlign::Left));
        x += width + 12.0;
    }
}

fn draw_cartesian(prims: &mut Vec<Primitive>, chart: &ChartContent, mut plot: Rect, theme: &ResolvedTheme) {
    let horizontal = chart.chart_type == ChartType::BarHorizontal;
    let categories = chart.category_count();
    let max = match chart.max_value() {
        m if m > 0.0 => m,
        _ => 1.0,
    };

    // Category labels under the x axis.
    if !horizontal && !chart.labels.is_empty() && categories > 0 {
        let height = LABEL_SIZE * 1.2;
        plot.y1 -= height;
        let group = plot.width() / categories as f64;
        for (i, text) in chart.labels.iter().enumerate() {
            let x0 = plot.x0 + i as f64 * group;
            let rect = Rect::new(x0, plot.y1, x0 + group, plot.y1 + height);
            prims.push(label(text, rect, LABEL_SIZE, false, theme.text_color, HorizontalAlign::Center));
        }
    }

    let mut axes = BezPath::new();
    axes.move_to(Point::new(plot.x0, plot.y0));
    axes.line_to(Point::new(plot.x0, plot.y1));
    axes.line_to(Point::new(plot.x1, plot.y1));
    prims.push(Primitive::stroke(axes, StrokeVisual::solid(theme.border_color, 1.0)));

    if categories == 0 || chart.series.is_empty() {
        return;
    }
    let series_count = chart.series.len() as f64;

    for (s, series) in chart.series.iter().enumerate() {
        let color = series_color(chart, s, theme);
        let points: Vec<(usize, f64)> = series
            .values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i, v.max(0.0) / max))
            .collect();

        match chart.chart_type {
            ChartType::Bar => {
                let group = plot.width() / categories as f64;
                let bar = group * 0.8 / series_count;
                for &(i, t) in &points {
                    let x = plot.x0 + i as f64 * group + group * 0.1 + s as f64 * bar;
                    let rect = Rect::new(x, plot.y1 - t * plot.height(), x + bar, plot.y1);
                    prims.push(Primitive::fill(rect.to_path(TOLERANCE), color));
                }
            }
            ChartType::BarHorizontal => {
                let group = plot.height() / categories as f64;
                let bar = group * 0.8 / series_count;
                for &(i, t) in &points {
                    let y = plot.y0 + i as f64 * group + group * 0.1 + s as f64 * bar;
                    let rect = Rect::new(plot.x0, y, plot.x0 + t * plot.width(), y + bar);
                    prims.push(Primitive::fill(rect.to_path(TOLERANCE), color));
                }
            }
            ChartType::Line | ChartType::Area | ChartType::Scatter => {
                let group = plot.width() / categories as f64;
                let at = |i: usize, t: f64| Point::new(plot.x0 + (i as f64 + 0.5) * group, plot.y1 - t * plot.height());
                if chart.chart_type == ChartType::Scatter {
                    for &(i, t) in &points {
                        prims.push(Primitive::fill(Circle::new(at(i, t), 3.0).to_path(TOLERANCE), color));
                    }
                    continue;
                }
                let Some((&(first_i, first_t), rest)) = points.split_first() else {
                    continue;
                };
                let mut line = BezPath::new();
                line.move_to(at(first_i, first_t));
                for &(i, t) in rest {
                    line.line_to(at(i, t));
                }
                if chart.chart_type == ChartType::Area {
                    let last_i = rest.last().map_or(first_i, |&(i, _)| i);
                    let mut area = line.clone();
                    area.line_to(at(last_i, 0.0));
                    area.line_to(at(first_i, 0.0));
                    area.close_path();
                    prims.push(Primitive::fill(area, color.with_opacity(0.35)));
                }
                prims.push(Primitive::stroke(line, StrokeVisual::solid(color, 2.0)));
            }
            // Drawn by draw_radial.
            ChartType::Pie | ChartType::Donut => {}
        }
    }
}

fn draw_radial(prims: &mut Vec<Primitive>, chart: &ChartContent, plot: Rect, theme: &ResolvedTheme) {
    let values: Vec<f64> = chart
        .series
        .first()
        .map(|s| s.values.iter().map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 }).collect())
        .unwrap_or_default();
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return;
    }
    let center = plot.center();
    let radius = plot.width().min(plot.height()) / 2.0;
    let inner = if chart.chart_type == ChartType::Donut { radius * DONUT_HOLE } else { 0.0 };

    let mut start = -FRAC_PI_2;
    for (i, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        prims.push(Primitive::fill(slice(center, radius, inner, start, sweep), theme.series_color(i)));
        start += sweep;
    }
}

/// A pie slice, or an annulus sector when `inner > 0`.
fn slice(center: Point, radius: f64, inner: f64, start: f64, sweep: f64) -> BezPath {
    let outer_arc = Arc::new(center, Vec2::new(radius, radius), start, sweep, 0.0);
    let mut path = BezPath::new();
    if inner > 0.0 {
        path.move_to(center + Vec2::from_angle(start) * radius);
        path.extend(outer_arc.append_iter(TOLERANCE));
        path.line_to(center + Vec2::from_angle(start + sweep) * inner);
        let inner_arc = Arc::new(center, Vec2::new(inner, inner), start + sweep, -sweep, 0.0);
        path.extend(inner_arc.append_iter(TOLERANCE));
    } else {
        path.move_to(center);
        path.line_to(center + Vec2::from_angle(start) * radius);
        path.extend(outer_arc.append_iter(TOLERANCE));
    }
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidekit_core::elements::ChartSeries;

    fn bar_chart() -> ChartContent {
        ChartContent::new(ChartType::Bar)
            .with_labels(["Q1", "Q2", "Q3"])
            .with_series(ChartSeries::new("2024", vec![1.0, 2.0, 3.0]))
            .with_series(ChartSeries::new("2025", vec![2.0, 3.0, 4.0]))
    }

    fn count_fills(prims: &[Primitive]) -> usize {
        prims
            .iter()
            .filter(|p| matches!(p, Primitive::Path { fill: Some(_), .. }))
            .count()
    }

    #[test]
    fn test_bar_chart_one_rect_per_value() {
        let theme = ResolvedTheme::default();
        let prims = BasicChartRenderer.render_chart(&bar_chart(), Size::new(400.0, 300.0), 1.0, false, &theme);
        assert_eq!(count_fills(&prims), 6);
    }

    #[test]
    fn test_legend_adds_swatches() {
        let theme = ResolvedTheme::default();
        let with = BasicChartRenderer.render_chart(&bar_chart(), Size::new(400.0, 300.0), 1.0, true, &theme);
        let without = BasicChartRenderer.render_chart(&bar_chart(), Size::new(400.0, 300.0), 1.0, false, &theme);
        assert_eq!(count_fills(&with), count_fills(&without) + 2);
    }

    #[test]
    fn test_scale_passes_through() {
        let theme = ResolvedTheme::default();
        let chart = bar_chart();
        let full = BasicChartRenderer.render_chart(&chart, Size::new(400.0, 300.0), 1.0, true, &theme);
        let small = BasicChartRenderer.render_chart(&chart, Size::new(400.0, 300.0), 0.25, true, &theme);
        let expected: Vec<_> = full.into_iter().map(|p| p.scaled(0.25)).collect();
        assert_eq!(small, expected);
    }

    #[test]
    fn test_tallest_bar_reaches_plot_top() {
        let theme = ResolvedTheme::default();
        let chart = ChartContent::new(ChartType::Bar).with_series(ChartSeries::new("a", vec![5.0, 10.0]));
        let prims = BasicChartRenderer.render_chart(&chart, Size::new(200.0, 100.0), 1.0, false, &theme);
        let tops: Vec<f64> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Path { path, fill: Some(_), .. } => Some(path.bounding_box().y0),
                _ => None,
            })
            .collect();
        assert_eq!(tops.len(), 2);
        assert!((tops[1] - PADDING).abs() < 1e-9);
        assert!((tops[0] - (PADDING + 42.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pie_slices_and_empty_pie() {
        let theme = ResolvedTheme::default();
        let pie = ChartContent::new(ChartType::Donut).with_series(ChartSeries::new("share", vec![1.0, 0.0, 3.0]));
        let prims = BasicChartRenderer.render_chart(&pie, Size::new(200.0, 200.0), 1.0, false, &theme);
        assert_eq!(count_fills(&prims), 2);

        let empty = ChartContent::new(ChartType::Pie).with_series(ChartSeries::new("none", vec![0.0, f64::NAN]));
        assert!(BasicChartRenderer.render_chart(&empty, Size::new(200.0, 200.0), 1.0, false, &theme).is_empty());
    }
}
