//! Text element payload.

use super::SerializableColor;
use serde::{Deserialize, Serialize};

/// Horizontal alignment of flowed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    /// Offset factor applied to the free horizontal space.
    pub fn factor(self) -> f64 {
        match self {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => 0.5,
            HorizontalAlign::Right => 1.0,
        }
    }
}

/// Vertical alignment of the text block inside the element frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn factor(self) -> f64 {
        match self {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => 0.5,
            VerticalAlign::Bottom => 1.0,
        }
    }
}

/// Content and style of a text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    /// The text. Newlines start new paragraphs.
    pub text: String,
    /// Font size in slide units.
    pub font_size: f64,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: SerializableColor,
    pub align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    /// Line height as a multiple of font size.
    pub line_height: f64,
    /// Inner padding in slide units.
    pub padding: f64,
    /// Shown in italics when `text` is empty.
    pub placeholder: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            font_family: "Inter".to_string(),
            bold: false,
            italic: false,
            underline: false,
            color: SerializableColor::rgb(30, 30, 30),
            align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            line_height: 1.2,
            padding: 8.0,
            placeholder: "Click to add text".to_string(),
        }
    }
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_align(mut self, align: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.align = align;
        self.vertical_align = vertical;
        self
    }

    /// Check if there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
