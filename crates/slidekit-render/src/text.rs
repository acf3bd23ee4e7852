//! Text flow with approximate metrics.
//!
//! Layout runs in slide units so that every render scale wraps identically;
//! the pipeline scales the result afterwards. Backends with real shaping
//! (parley) re-measure each line but keep these line breaks.

use crate::visual::{Primitive, TextLine, TextRun};
use kurbo::{Point, Size};
use slidekit_core::elements::{HorizontalAlign, SerializableColor, TextContent, VerticalAlign};

/// Average advance of a glyph relative to the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.55;

/// Colour of the prompt shown for empty text.
const PLACEHOLDER_COLOR: SerializableColor = SerializableColor {
    r: 156,
    g: 163,
    b: 175,
    a: 255,
};

pub fn measure(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_FACTOR
}

/// Greedy word wrap. Explicit newlines always break; words wider than
/// `max_width` are split by character.
pub fn wrap(text: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let char_width = font_size * CHAR_WIDTH_FACTOR;
    let max_chars = if char_width > 0.0 && max_width.is_finite() {
        ((max_width / char_width).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            // Split words that cannot fit on any line.
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        lines.push(current);
    }
    lines
}

/// Box-relative layout parameters shared by text elements, table cells and
/// chart labels.
#[derive(Debug, Clone, Copy)]
pub struct TextBox {
    pub size: Size,
    pub padding: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
}

impl TextBox {
    /// Lay out `text` inside the box, returning positioned lines.
    pub fn layout(&self, text: &str) -> Vec<TextLine> {
        let inner_width = (self.size.width - self.padding * 2.0).max(0.0);
        let inner_height = (self.size.height - self.padding * 2.0).max(0.0);
        let line_box = self.font_size * self.line_height;
        let wrapped = wrap(text, self.font_size, inner_width);
        let block_height = line_box * wrapped.len() as f64;
        let top = self.padding + (inner_height - block_height) * self.vertical_align.factor();

        wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let width = measure(&text, self.font_size);
                let x = self.padding + (inner_width - width).max(0.0) * self.align.factor();
                TextLine {
                    origin: Point::new(x, top + i as f64 * line_box),
                    width,
                    height: line_box,
                    text,
                }
            })
            .collect()
    }
}

/// Text element primitives. Empty text shows the italic prompt instead.
pub fn render_text(content: &TextContent, size: Size) -> Vec<Primitive> {
    let text_box = TextBox {
        size,
        padding: content.padding,
        font_size: content.font_size,
        line_height: content.line_height,
        align: content.align,
        vertical_align: content.vertical_align,
    };
    let empty = content.is_empty();
    let (text, color) = if empty {
        (content.placeholder.as_str(), PLACEHOLDER_COLOR)
    } else {
        (content.text.as_str(), content.color)
    };
    vec![Primitive::Text(TextRun {
        lines: text_box.layout(text),
        font_family: content.font_family.clone(),
        font_size: content.font_size,
        color,
        bold: content.bold,
        italic: content.italic || empty,
        underline: content.underline && !empty,
    })]
}
