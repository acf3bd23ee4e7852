//! Element definitions for slides.

mod chart;
mod image;
mod placeholder;
mod shape;
mod table;
mod text;

pub use chart::{ChartContent, ChartSeries, ChartType};
pub use image::{AssetState, ImageContent, ImageFit, ImageFormat, ImageSource};
pub use placeholder::{PlaceholderContent, PlaceholderRole};
pub use shape::{ShapeContent, ShapeKind, StrokeStyle};
pub use table::{CellStyle, TableCell, TableContent, TableStyle};
pub use text::{HorizontalAlign, TextContent, VerticalAlign};

use crate::geometry::normalize_rotation;
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Multiply the alpha channel by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Position, size and rotation of an element in slide-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, stored in `[0, 360)`.
    #[serde(default, deserialize_with = "deserialize_rotation")]
    pub rotation: f64,
}

fn deserialize_rotation<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(normalize_rotation(raw))
}

impl Geometry {
    /// Create an unrotated geometry.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Set the rotation (normalized to `[0, 360)`).
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_rotation(degrees);
        self
    }

    /// The unrotated frame as a kurbo Rect.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Axis-aligned bounding box of the rotated frame.
    pub fn bounding_box(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.rect();
        }
        let center = self.center();
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let ext_x = (half_w * cos).abs() + (half_h * sin).abs();
        let ext_y = (half_w * sin).abs() + (half_h * cos).abs();
        Rect::new(center.x - ext_x, center.y - ext_y, center.x + ext_x, center.y + ext_y)
    }

    /// Convert a slide-space point into the element's unrotated local frame,
    /// relative to its center.
    pub fn to_local(&self, point: Point) -> Vec2 {
        let center = self.center();
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        Vec2::new(dx * cos - dy * sin, dx * sin + dy * cos)
    }

    /// Convert a local offset from center back into slide space.
    pub fn from_local(&self, local: Vec2) -> Point {
        let center = self.center();
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Point::new(
            center.x + local.x * cos - local.y * sin,
            center.y + local.x * sin + local.y * cos,
        )
    }

    /// Check if a slide-space point lies inside the rotated frame.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= self.width / 2.0 + tolerance && local.y.abs() <= self.height / 2.0 + tolerance
    }

    /// All components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.rotation.is_finite()
    }
}

/// Variant tag of an element, used where only the kind matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Chart,
    Table,
    Placeholder,
}

impl ElementKind {
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Shape => "shape",
            ElementKind::Chart => "chart",
            ElementKind::Table => "table",
            ElementKind::Placeholder => "placeholder",
        }
    }
}

/// Variant-specific payload. Only the render pipeline looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementContent {
    Text(TextContent),
    Image(ImageContent),
    Shape(ShapeContent),
    Chart(ChartContent),
    Table(TableContent),
    Placeholder(PlaceholderContent),
}

impl ElementContent {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::Image(_) => ElementKind::Image,
            ElementContent::Shape(_) => ElementKind::Shape,
            ElementContent::Chart(_) => ElementKind::Chart,
            ElementContent::Table(_) => ElementKind::Table,
            ElementContent::Placeholder(_) => ElementKind::Placeholder,
        }
    }
}

/// A single visual object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideElement {
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Paint order. Missing means an implicit 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub content: ElementContent,
}

impl SlideElement {
    /// Create an element with a fresh id.
    pub fn new(geometry: Geometry, content: ElementContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry: Geometry {
                rotation: normalize_rotation(geometry.rotation),
                ..geometry
            },
            z_index: None,
            opacity: None,
            content,
        }
    }

    pub fn text(geometry: Geometry, text: impl Into<String>) -> Self {
        Self::new(geometry, ElementContent::Text(TextContent::new(text)))
    }

    pub fn shape(geometry: Geometry, kind: ShapeKind) -> Self {
        Self::new(geometry, ElementContent::Shape(ShapeContent::new(kind)))
    }

    pub fn image(geometry: Geometry, source: Option<ImageSource>) -> Self {
        Self::new(geometry, ElementContent::Image(ImageContent::new(source)))
    }

    pub fn table(geometry: Geometry, rows: usize, cols: usize) -> Self {
        Self::new(geometry, ElementContent::Table(TableContent::new(rows, cols)))
    }

    pub fn chart(geometry: Geometry, chart: ChartContent) -> Self {
        Self::new(geometry, ElementContent::Chart(chart))
    }

    pub fn placeholder(geometry: Geometry, role: PlaceholderRole) -> Self {
        Self::new(geometry, ElementContent::Placeholder(PlaceholderContent::new(role)))
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// zIndex with the implicit default applied.
    pub fn effective_z(&self) -> i32 {
        self.z_index.unwrap_or(0)
    }

    /// Opacity with the default applied.
    pub fn effective_opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Give the element a new unique identifier (paste / duplicate).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Apply a partial update. Non-finite geometry values are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        if let Some(x) = finite(patch.x) {
            self.geometry.x = x;
        }
        if let Some(y) = finite(patch.y) {
            self.geometry.y = y;
        }
        if let Some(width) = finite(patch.width) {
            self.geometry.width = width;
        }
        if let Some(height) = finite(patch.height) {
            self.geometry.height = height;
        }
        if let Some(rotation) = finite(patch.rotation) {
            self.geometry.rotation = normalize_rotation(rotation);
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = Some(z_index);
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.filter(|o| o.is_finite()).map(|o| o.clamp(0.0, 1.0));
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
    }
}

/// A partial update to an element, as issued by gestures and property panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    /// `Some(None)` clears an explicit opacity.
    pub opacity: Option<Option<f64>>,
    pub content: Option<ElementContent>,
}

impl ElementPatch {
    /// A patch replacing the whole geometry.
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            rotation: Some(geometry.rotation),
            ..Default::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn content(content: ElementContent) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_element_normalizes_rotation() {
        let el = SlideElement::text(Geometry::new(0.0, 0.0, 10.0, 10.0).with_rotation(-90.0), "hi");
        assert!((el.geometry.rotation - 270.0).abs() < 1e-9);
        assert_eq!(el.kind(), ElementKind::Text);
    }

    #[test]
    fn test_patch_ignores_nan() {
        let mut el = SlideElement::shape(Geometry::new(10.0, 20.0, 30.0, 40.0), ShapeKind::Rectangle);
        el.apply_patch(&ElementPatch {
            x: Some(f64::NAN),
            y: Some(5.0),
            rotation: Some(720.0 + 45.0),
            ..Default::default()
        });
        assert!((el.geometry.x - 10.0).abs() < f64::EPSILON);
        assert!((el.geometry.y - 5.0).abs() < f64::EPSILON);
        assert!((el.geometry.rotation - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_patch_clears_opacity() {
        let mut el = SlideElement::shape(Geometry::new(0.0, 0.0, 10.0, 10.0), ShapeKind::Circle).with_opacity(0.5);
        el.apply_patch(&ElementPatch {
            opacity: Some(None),
            ..Default::default()
        });
        assert_eq!(el.opacity, None);
        assert!((el.effective_opacity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotated_contains() {
        let geom = Geometry::new(0.0, 0.0, 100.0, 10.0).with_rotation(90.0);
        // Rotated 90 degrees around (50, 5): now spans y in [-45, 55], x in [45, 55].
        assert!(geom.contains(Point::new(50.0, -40.0), 0.0));
        assert!(!geom.contains(Point::new(5.0, 5.0), 0.0));
    }

    #[test]
    fn test_bounding_box_rotated() {
        let geom = Geometry::new(0.0, 0.0, 100.0, 10.0).with_rotation(90.0);
        let bbox = geom.bounding_box();
        assert!((bbox.x0 - 45.0).abs() < 1e-9);
        assert!((bbox.x1 - 55.0).abs() < 1e-9);
        assert!((bbox.y0 + 45.0).abs() < 1e-9);
        assert!((bbox.y1 - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_json_roundtrip_keeps_kind() {
        let el = SlideElement::table(Geometry::new(1.0, 2.0, 300.0, 120.0), 2, 3).with_z_index(4);
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"type\":\"table\""));
        assert!(json.contains("\"zIndex\":4"));
        let back: SlideElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_deserialize_normalizes_rotation() {
        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","x":0,"y":0,"width":10,"height":10,"rotation":-30,
            "content":{"type":"placeholder","role":"title","prompt":"Title"}}"#;
        let el: SlideElement = serde_json::from_str(json).unwrap();
        assert!((el.geometry.rotation - 330.0).abs() < 1e-9);
    }
}
