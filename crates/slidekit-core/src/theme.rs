//! Theme lookup table for table and chart colouring.

use crate::elements::SerializableColor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named style bundle. Unset fields fall back to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleBundle {
    pub header_fill: Option<SerializableColor>,
    pub header_text: Option<SerializableColor>,
    pub body_fill: Option<SerializableColor>,
    pub stripe_fill: Option<SerializableColor>,
    pub text_color: Option<SerializableColor>,
    pub border_color: Option<SerializableColor>,
    pub series_palette: Vec<SerializableColor>,
}

/// A theme with every value filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTheme {
    pub header_fill: SerializableColor,
    pub header_text: SerializableColor,
    pub body_fill: SerializableColor,
    pub stripe_fill: SerializableColor,
    pub text_color: SerializableColor,
    pub border_color: SerializableColor,
    pub series_palette: Vec<SerializableColor>,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            header_fill: SerializableColor::rgb(55, 65, 81),
            header_text: SerializableColor::white(),
            body_fill: SerializableColor::white(),
            stripe_fill: SerializableColor::rgb(243, 244, 246),
            text_color: SerializableColor::rgb(31, 41, 55),
            border_color: SerializableColor::rgb(209, 213, 219),
            series_palette: vec![
                SerializableColor::rgb(66, 133, 244),
                SerializableColor::rgb(234, 67, 53),
                SerializableColor::rgb(251, 188, 5),
                SerializableColor::rgb(52, 168, 83),
                SerializableColor::rgb(171, 71, 188),
                SerializableColor::rgb(0, 172, 193),
            ],
        }
    }
}

impl ResolvedTheme {
    /// Palette colour for series `index`, cycling.
    pub fn series_color(&self, index: usize) -> SerializableColor {
        if self.series_palette.is_empty() {
            return self.text_color;
        }
        self.series_palette[index % self.series_palette.len()]
    }
}

/// Read-only id to style bundle lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeTable {
    themes: HashMap<String, StyleBundle>,
}

impl ThemeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with a few stock themes.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert(
            "dark",
            StyleBundle {
                header_fill: Some(SerializableColor::rgb(17, 24, 39)),
                body_fill: Some(SerializableColor::rgb(31, 41, 55)),
                stripe_fill: Some(SerializableColor::rgb(55, 65, 81)),
                text_color: Some(SerializableColor::rgb(243, 244, 246)),
                border_color: Some(SerializableColor::rgb(75, 85, 99)),
                ..Default::default()
            },
        );
        table.insert(
            "ocean",
            StyleBundle {
                header_fill: Some(SerializableColor::rgb(3, 105, 161)),
                stripe_fill: Some(SerializableColor::rgb(224, 242, 254)),
                border_color: Some(SerializableColor::rgb(125, 211, 252)),
                series_palette: vec![
                    SerializableColor::rgb(3, 105, 161),
                    SerializableColor::rgb(14, 165, 233),
                    SerializableColor::rgb(125, 211, 252),
                ],
                ..Default::default()
            },
        );
        table
    }

    pub fn insert(&mut self, id: impl Into<String>, bundle: StyleBundle) {
        self.themes.insert(id.into(), bundle);
    }

    pub fn get(&self, id: &str) -> Option<&StyleBundle> {
        self.themes.get(id)
    }

    /// Fill a theme's unset values from the built-in default. Unknown ids
    /// resolve to the default.
    pub fn resolve(&self, id: Option<&str>) -> ResolvedTheme {
        let base = ResolvedTheme::default();
        let Some(bundle) = id.and_then(|id| self.get(id)) else {
            if let Some(id) = id {
                log::debug!("Unknown theme '{id}', using default");
            }
            return base;
        };
        ResolvedTheme {
            header_fill: bundle.header_fill.unwrap_or(base.header_fill),
            header_text: bundle.header_text.unwrap_or(base.header_text),
            body_fill: bundle.body_fill.unwrap_or(base.body_fill),
            stripe_fill: bundle.stripe_fill.unwrap_or(base.stripe_fill),
            text_color: bundle.text_color.unwrap_or(base.text_color),
            border_color: bundle.border_color.unwrap_or(base.border_color),
            series_palette: if bundle.series_palette.is_empty() {
                base.series_palette
            } else {
                bundle.series_palette.clone()
            },
        }
    }
}
