//! Outlines for the fixed shape vocabulary.

use crate::visual::{Primitive, StrokeVisual};
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape, Size};
use slidekit_core::elements::{ShapeContent, ShapeKind};

/// Flattening tolerance for curved outlines, in slide units.
pub(crate) const TOLERANCE: f64 = 0.1;

/// Outline of a shape kind inside a box at the origin.
pub fn shape_path(kind: ShapeKind, size: Size, corner_radius: f64) -> BezPath {
    let rect = size.to_rect();
    match kind {
        ShapeKind::Rectangle => rect.to_path(TOLERANCE),
        ShapeKind::RoundedRectangle => {
            let radius = corner_radius.max(0.0).min(size.width.min(size.height) / 2.0);
            RoundedRect::from_rect(rect, radius).to_path(TOLERANCE)
        }
        ShapeKind::Circle => Ellipse::from_rect(rect).to_path(TOLERANCE),
        ShapeKind::Line => {
            let mut path = BezPath::new();
            path.move_to(Point::new(0.0, size.height / 2.0));
            path.line_to(Point::new(size.width, size.height / 2.0));
            path
        }
        polygon => polygon_path(&polygon.points(size.width, size.height)),
    }
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close_path();
    path
}

pub fn render_shape(content: &ShapeContent, size: Size) -> Vec<Primitive> {
    let path = shape_path(content.shape, size, content.corner_radius);
    let fill = if content.shape.is_open() { None } else { content.fill };
    let stroke = content
        .stroke
        .filter(|_| content.stroke_width > 0.0)
        .map(|color| StrokeVisual {
            color,
            width: content.stroke_width,
            dash: content
                .stroke_style
                .dash_pattern()
                .iter()
                .map(|d| d * content.stroke_width)
                .collect(),
        });
    if fill.is_none() && stroke.is_none() {
        return Vec::new();
    }
    vec![Primitive::Path { path, fill, stroke }]
}

/// Bounding box of the outline, for tests and debugging.
pub fn outline_bounds(content: &ShapeContent, size: Size) -> Rect {
    shape_path(content.shape, size, content.corner_radius).bounding_box()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidekit_core::elements::{SerializableColor, StrokeStyle};

    #[test]
    fn test_every_kind_fits_its_box() {
        let size = Size::new(120.0, 80.0);
        for kind in [
            ShapeKind::Rectangle,
            ShapeKind::RoundedRectangle,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
            ShapeKind::Pentagon,
            ShapeKind::Hexagon,
            ShapeKind::Star,
            ShapeKind::Arrow,
        ] {
            let bounds = outline_bounds(&ShapeContent::new(kind), size);
            assert!(bounds.x0 >= -1e-9 && bounds.y0 >= -1e-9, "{kind:?}");
            assert!(bounds.x1 <= 120.0 + 1e-9 && bounds.y1 <= 80.0 + 1e-9, "{kind:?}");
        }
    }

    #[test]
    fn test_line_is_stroke_only() {
        let mut content = ShapeContent::new(ShapeKind::Line);
        content.fill = Some(SerializableColor::white());
        let prims = render_shape(&content, Size::new(100.0, 10.0));
        let Primitive::Path { fill, stroke, .. } = &prims[0] else {
            panic!("expected path");
        };
        assert!(fill.is_none());
        assert!(stroke.is_some());
    }

    #[test]
    fn test_dash_scales_with_width() {
        let mut content = ShapeContent::new(ShapeKind::Rectangle);
        content.stroke = Some(SerializableColor::black());
        content.stroke_width = 3.0;
        content.stroke_style = StrokeStyle::Dashed;
        let prims = render_shape(&content, Size::new(10.0, 10.0));
        let Primitive::Path { stroke: Some(stroke), .. } = &prims[0] else {
            panic!("expected stroked path");
        };
        assert_eq!(stroke.dash, vec![12.0, 6.0]);
    }

    #[test]
    fn test_invisible_shape_has_no_primitives() {
        let mut content = ShapeContent::new(ShapeKind::Circle);
        content.fill = None;
        content.stroke = None;
        assert!(render_shape(&content, Size::new(10.0, 10.0)).is_empty());
    }
}
