//! Image fitting and the missing-image placeholder.

use crate::shapes::TOLERANCE;
use crate::text::TextBox;
use crate::visual::{Primitive, StrokeVisual, TextRun};
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape, Size};
use slidekit_core::elements::{HorizontalAlign, ImageContent, ImageFit, SerializableColor, VerticalAlign};

const PLACEHOLDER_FILL: SerializableColor = SerializableColor {
    r: 229,
    g: 231,
    b: 235,
    a: 255,
};
const PLACEHOLDER_INK: SerializableColor = SerializableColor {
    r: 156,
    g: 163,
    b: 175,
    a: 255,
};
const PLACEHOLDER_FONT_SIZE: f64 = 14.0;

/// Destination rectangle for an image of `intrinsic` size in a `frame`.
///
/// Without intrinsic dimensions every fit stretches to the frame.
pub fn fit_rect(fit: ImageFit, intrinsic: Option<(u32, u32)>, frame: Size) -> Rect {
    let Some((w, h)) = intrinsic.filter(|&(w, h)| w > 0 && h > 0) else {
        return frame.to_rect();
    };
    let (w, h) = (f64::from(w), f64::from(h));
    let scale = match fit {
        ImageFit::Fill => return frame.to_rect(),
        ImageFit::Contain => (frame.width / w).min(frame.height / h),
        ImageFit::Cover => (frame.width / w).max(frame.height / h),
    };
    let size = Size::new(w * scale, h * scale);
    let origin = Point::new((frame.width - size.width) / 2.0, (frame.height - size.height) / 2.0);
    Rect::from_origin_size(origin, size)
}

pub fn render_image(content: &ImageContent, size: Size) -> Vec<Primitive> {
    let frame = size.to_rect();
    let mut prims = match content.source.as_ref().filter(|_| !content.needs_placeholder()) {
        Some(source) => vec![Primitive::Image {
            source: source.clone(),
            dest: fit_rect(content.fit, content.intrinsic_size(), size),
            clip: frame,
            corner_radius: content.corner_radius.max(0.0),
        }],
        None => placeholder(content, size),
    };
    if let Some(color) = content.border_color
        && content.border_width > 0.0
    {
        let radius = content.corner_radius.max(0.0).min(size.width.min(size.height) / 2.0);
        prims.push(Primitive::stroke(
            RoundedRect::from_rect(frame, radius).to_path(TOLERANCE),
            StrokeVisual::solid(color, content.border_width),
        ));
    }
    prims
}

/// Grey box with a cross and the alt text. Depends only on the frame size
/// and the alt text, so every surface draws the same thing.
pub fn placeholder(content: &ImageContent, size: Size) -> Vec<Primitive> {
    let frame = size.to_rect();
    let mut cross = BezPath::new();
    cross.move_to(Point::ZERO);
    cross.line_to(Point::new(size.width, size.height));
    cross.move_to(Point::new(size.width, 0.0));
    cross.line_to(Point::new(0.0, size.height));

    let label = if content.alt.trim().is_empty() { "Image" } else { content.alt.as_str() };
    let text_box = TextBox {
        size,
        padding: 4.0,
        font_size: PLACEHOLDER_FONT_SIZE,
        line_height: 1.2,
        align: HorizontalAlign::Center,
        vertical_align: VerticalAlign::Middle,
    };

    vec![
        Primitive::Path {
            path: frame.to_path(TOLERANCE),
            fill: Some(PLACEHOLDER_FILL),
            stroke: Some(StrokeVisual::solid(PLACEHOLDER_INK, 1.0)),
        },
        Primitive::stroke(cross, StrokeVisual::solid(PLACEHOLDER_INK, 1.0)),
        Primitive::Text(TextRun {
            lines: text_box.layout(label),
            font_family: "Inter".to_string(),
            font_size: PLACEHOLDER_FONT_SIZE,
            color: PLACEHOLDER_INK,
            bold: false,
            italic: false,
            underline: false,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidekit_core::elements::{AssetState, ImageSource};

    fn url() -> Option<ImageSource> {
        Some(ImageSource::Url {
            url: "https://example.com/a.png".into(),
        })
    }

    #[test]
    fn test_contain_letterboxes() {
        let rect = fit_rect(ImageFit::Contain, Some((200, 100)), Size::new(100.0, 100.0));
        assert_eq!(rect, Rect::new(0.0, 25.0, 100.0, 75.0));
    }

    #[test]
    fn test_cover_overflows() {
        let rect = fit_rect(ImageFit::Cover, Some((200, 100)), Size::new(100.0, 100.0));
        assert_eq!(rect, Rect::new(-50.0, 0.0, 150.0, 100.0));
    }

    #[test]
    fn test_unknown_size_fills() {
        let rect = fit_rect(ImageFit::Contain, None, Size::new(80.0, 60.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 80.0, 60.0));
    }

    #[test]
    fn test_missing_source_is_placeholder() {
        let content = ImageContent::new(None);
        let prims = render_image(&content, Size::new(100.0, 80.0));
        assert!(prims.iter().all(|p| p.name() != "image"));
        assert_eq!(prims, render_image(&content, Size::new(100.0, 80.0)));
    }

    #[test]
    fn test_failed_load_is_placeholder() {
        let mut content = ImageContent::new(url());
        assert_eq!(render_image(&content, Size::new(10.0, 10.0))[0].name(), "image");
        content.state = AssetState::Failed;
        assert_eq!(render_image(&content, Size::new(10.0, 10.0))[0].name(), "path");
    }

    #[test]
    fn test_border_drawn_last() {
        let mut content = ImageContent::new(url());
        content.border_color = Some(SerializableColor::black());
        content.border_width = 2.0;
        let prims = render_image(&content, Size::new(10.0, 10.0));
        assert_eq!(prims.len(), 2);
        assert_eq!(prims[1].name(), "path");
    }
}
