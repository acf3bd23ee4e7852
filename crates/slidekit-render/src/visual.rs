//! Backend-neutral visual tree.
//!
//! A [`VisualTree`] is what the pipeline hands to painting backends. Node
//! frames are in surface units (slide units times the render scale) and each
//! node's primitives are in the node's local, unrotated frame.

use crate::mode::RenderMode;
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use slidekit_core::elements::{ElementId, ElementKind, ImageSource, SerializableColor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeVisual {
    pub color: SerializableColor,
    pub width: f64,
    /// Absolute dash lengths, empty for a solid stroke.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
}

impl StrokeVisual {
    pub fn solid(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }
}

/// One laid-out line of text; `origin` is the top-left of the line box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub lines: Vec<TextLine>,
    pub font_family: String,
    pub font_size: f64,
    pub color: SerializableColor,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Path {
        path: BezPath,
        fill: Option<SerializableColor>,
        stroke: Option<StrokeVisual>,
    },
    Text(TextRun),
    Image {
        source: ImageSource,
        /// Where the whole image lands; may overflow `clip` for cover fit.
        dest: Rect,
        clip: Rect,
        corner_radius: f64,
    },
}

impl Primitive {
    pub fn fill(path: BezPath, color: SerializableColor) -> Self {
        Primitive::Path {
            path,
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroke(path: BezPath, stroke: StrokeVisual) -> Self {
        Primitive::Path {
            path,
            fill: None,
            stroke: Some(stroke),
        }
    }

    /// Multiply every position and size-dependent style value by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Primitive::Path { path, fill, stroke } => Primitive::Path {
                path: Affine::scale(factor) * path,
                fill,
                stroke: stroke.map(|s| StrokeVisual {
                    color: s.color,
                    width: s.width * factor,
                    dash: s.dash.iter().map(|d| d * factor).collect(),
                }),
            },
            Primitive::Text(run) => Primitive::Text(TextRun {
                lines: run
                    .lines
                    .into_iter()
                    .map(|line| TextLine {
                        origin: (line.origin.to_vec2() * factor).to_point(),
                        width: line.width * factor,
                        height: line.height * factor,
                        text: line.text,
                    })
                    .collect(),
                font_size: run.font_size * factor,
                ..run
            }),
            Primitive::Image {
                source,
                dest,
                clip,
                corner_radius,
            } => Primitive::Image {
                source,
                dest: scale_rect(dest, factor),
                clip: scale_rect(clip, factor),
                corner_radius: corner_radius * factor,
            },
        }
    }

    /// Short tag used in logs and structural comparisons.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Path { .. } => "path",
            Primitive::Text(_) => "text",
            Primitive::Image { .. } => "image",
        }
    }
}

pub(crate) fn scale_rect(rect: Rect, factor: f64) -> Rect {
    Rect::new(rect.x0 * factor, rect.y0 * factor, rect.x1 * factor, rect.y1 * factor)
}

/// The visual for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub element_id: ElementId,
    pub kind: ElementKind,
    /// Unrotated frame in surface units.
    pub frame: Rect,
    /// Degrees clockwise around the frame center.
    pub rotation: f64,
    pub opacity: f64,
    pub interactive: bool,
    pub z_index: i32,
    pub primitives: Vec<Primitive>,
}

impl VisualNode {
    /// Local-to-surface transform for this node's primitives.
    pub fn transform(&self) -> Affine {
        let half = Vec2::new(self.frame.width() / 2.0, self.frame.height() / 2.0);
        Affine::translate(self.frame.center().to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::translate(-half)
    }

    /// The frame in local coordinates.
    pub fn local_bounds(&self) -> Rect {
        self.frame.size().to_rect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundVisual {
    Solid {
        color: SerializableColor,
    },
    Gradient {
        start: Point,
        end: Point,
        stops: Vec<(f64, SerializableColor)>,
    },
}

/// A rendered slide, or an element list, ready for a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTree {
    pub mode: RenderMode,
    pub scale: f64,
    /// Surface size covered by the slide.
    pub size: Size,
    pub background: Option<BackgroundVisual>,
    /// Nodes in paint order.
    pub nodes: Vec<VisualNode>,
}

impl VisualTree {
    pub fn node(&self, id: ElementId) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.element_id == id)
    }

    /// Kinds in paint order.
    pub fn kinds(&self) -> Vec<ElementKind> {
        self.nodes.iter().map(|n| n.kind).collect()
    }

    /// Topmost interactive node under a surface point.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.nodes
            .iter()
            .rev()
            .filter(|n| n.interactive)
            .find(|n| n.local_bounds().contains(n.transform().inverse() * point))
            .map(|n| n.element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn test_scaled_path_and_stroke() {
        let path = Rect::new(0.0, 0.0, 10.0, 20.0).to_path(0.1);
        let mut stroke = StrokeVisual::solid(SerializableColor::black(), 2.0);
        stroke.dash = vec![8.0, 4.0];
        let Primitive::Path { path, stroke, .. } = Primitive::stroke(path, stroke).scaled(0.5) else {
            panic!("expected path");
        };
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 5.0, 10.0));
        let stroke = stroke.unwrap();
        assert_eq!(stroke.width, 1.0);
        assert_eq!(stroke.dash, vec![4.0, 2.0]);
    }

    #[test]
    fn test_node_transform_rotates_about_center() {
        let node = VisualNode {
            element_id: ElementId::new_v4(),
            kind: ElementKind::Shape,
            frame: Rect::new(100.0, 100.0, 200.0, 140.0),
            rotation: 90.0,
            opacity: 1.0,
            interactive: true,
            z_index: 0,
            primitives: Vec::new(),
        };
        let center = node.transform() * Point::new(50.0, 20.0);
        assert!((center - Point::new(150.0, 120.0)).hypot() < 1e-9);
        let corner = node.transform() * Point::ZERO;
        assert!((corner - Point::new(170.0, 70.0)).hypot() < 1e-9);
    }
}
