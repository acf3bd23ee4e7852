//! Shape element payload and the fixed outline vocabulary.

use super::SerializableColor;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Primitive outline of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    /// Ellipse inscribed in the frame.
    Circle,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
    Arrow,
    /// Diagonal segment from top-left to bottom-right.
    Line,
}

const TRIANGLE: &[(f64, f64)] = &[(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)];
const DIAMOND: &[(f64, f64)] = &[(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)];
const PENTAGON: &[(f64, f64)] = &[
    (0.5, 0.0),
    (1.0, 0.382),
    (0.809, 1.0),
    (0.191, 1.0),
    (0.0, 0.382),
];
const HEXAGON: &[(f64, f64)] = &[
    (0.25, 0.0),
    (0.75, 0.0),
    (1.0, 0.5),
    (0.75, 1.0),
    (0.25, 1.0),
    (0.0, 0.5),
];
const STAR: &[(f64, f64)] = &[
    (0.5, 0.0),
    (0.618, 0.362),
    (1.0, 0.382),
    (0.691, 0.618),
    (0.809, 1.0),
    (0.5, 0.764),
    (0.191, 1.0),
    (0.309, 0.618),
    (0.0, 0.382),
    (0.382, 0.362),
];
const ARROW: &[(f64, f64)] = &[
    (0.0, 0.3),
    (0.6, 0.3),
    (0.6, 0.0),
    (1.0, 0.5),
    (0.6, 1.0),
    (0.6, 0.7),
    (0.0, 0.7),
];

impl ShapeKind {
    /// Vertices in unit coordinates (`[0, 1]` on both axes) for polygonal kinds.
    pub fn unit_points(self) -> Option<&'static [(f64, f64)]> {
        match self {
            ShapeKind::Triangle => Some(TRIANGLE),
            ShapeKind::Diamond => Some(DIAMOND),
            ShapeKind::Pentagon => Some(PENTAGON),
            ShapeKind::Hexagon => Some(HEXAGON),
            ShapeKind::Star => Some(STAR),
            ShapeKind::Arrow => Some(ARROW),
            _ => None,
        }
    }

    /// Polygon vertices scaled into a `width` x `height` box at the origin.
    pub fn points(self, width: f64, height: f64) -> Vec<Point> {
        self.unit_points()
            .map(|pts| pts.iter().map(|&(u, v)| Point::new(u * width, v * height)).collect())
            .unwrap_or_default()
    }

    /// Open outlines are stroked but never filled.
    pub fn is_open(self) -> bool {
        matches!(self, ShapeKind::Line)
    }
}

/// Dash pattern of a shape outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash lengths relative to the stroke width.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            StrokeStyle::Solid => &[],
            StrokeStyle::Dashed => &[4.0, 2.0],
            StrokeStyle::Dotted => &[1.0, 1.5],
        }
    }
}

/// Flat fill and stroke style of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeContent {
    pub shape: ShapeKind,
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no outline).
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    /// Used by rounded rectangles.
    pub corner_radius: f64,
}

impl Default for ShapeContent {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            fill: Some(SerializableColor::rgb(66, 133, 244)),
            stroke: None,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            corner_radius: 12.0,
        }
    }
}

impl ShapeContent {
    pub fn new(shape: ShapeKind) -> Self {
        let mut content = Self {
            shape,
            ..Default::default()
        };
        if shape.is_open() {
            content.fill = None;
            content.stroke = Some(SerializableColor::black());
        }
        content
    }
}
