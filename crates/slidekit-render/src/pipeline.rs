//! The render pipeline: elements, mode and scale in, visual tree out.
//!
//! Every surface (editor canvas, thumbnails, presenter, export) calls the
//! same function. Element content maps to primitives in slide units; the
//! scale is applied once at the end, and the mode only flips interactivity
//! and chart legends.

use crate::chart::{BasicChartRenderer, ChartRenderer};
use crate::image::render_image;
use crate::mode::RenderMode;
use crate::shapes::{TOLERANCE, render_shape};
use crate::table::render_table;
use crate::text::{TextBox, render_text};
use crate::visual::{BackgroundVisual, Primitive, StrokeVisual, TextRun, VisualNode, VisualTree, scale_rect};
use kurbo::{Point, Shape, Size, Vec2};
use slidekit_core::config::{SLIDE_HEIGHT, SLIDE_WIDTH};
use slidekit_core::document::{Background, Slide};
use slidekit_core::elements::{
    ElementContent, HorizontalAlign, PlaceholderContent, SerializableColor, SlideElement, VerticalAlign,
};
use slidekit_core::theme::ThemeTable;

const PLACEHOLDER_BORDER: SerializableColor = SerializableColor {
    r: 156,
    g: 163,
    b: 175,
    a: 255,
};

/// Read-only collaborators the pipeline consults.
pub struct RenderResources {
    pub themes: ThemeTable,
    pub charts: Box<dyn ChartRenderer>,
}

impl Default for RenderResources {
    fn default() -> Self {
        Self {
            themes: ThemeTable::builtin(),
            charts: Box::new(BasicChartRenderer),
        }
    }
}

impl RenderResources {
    pub fn with_themes(themes: ThemeTable) -> Self {
        Self {
            themes,
            ..Default::default()
        }
    }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        log::debug!("Invalid render scale {scale}, using 1");
        1.0
    }
}

/// Render elements with the built-in themes and chart renderer on the
/// default slide size.
pub fn render(elements: &[SlideElement], mode: RenderMode, scale: f64) -> VisualTree {
    render_with(elements, mode, scale, &RenderResources::default())
}

pub fn render_with(elements: &[SlideElement], mode: RenderMode, scale: f64, resources: &RenderResources) -> VisualTree {
    let scale = sanitize_scale(scale);
    let mut ordered: Vec<&SlideElement> = elements.iter().collect();
    // Stable, so equal zIndex keeps document order.
    ordered.sort_by_key(|e| e.effective_z());

    VisualTree {
        mode,
        scale,
        size: Size::new(SLIDE_WIDTH * scale, SLIDE_HEIGHT * scale),
        background: None,
        nodes: ordered
            .into_iter()
            .map(|element| render_element(element, mode, scale, resources))
            .collect(),
    }
}

/// Render a whole slide, background included.
pub fn render_slide(
    slide: &Slide,
    slide_size: Size,
    mode: RenderMode,
    scale: f64,
    resources: &RenderResources,
) -> VisualTree {
    let mut tree = render_with(&slide.elements, mode, scale, resources);
    tree.size = Size::new(slide_size.width * tree.scale, slide_size.height * tree.scale);
    tree.background = Some(render_background(&slide.background, tree.size));
    tree
}

pub fn render_background(background: &Background, size: Size) -> BackgroundVisual {
    match background {
        Background::Solid { color } => BackgroundVisual::Solid { color: *color },
        Background::Gradient { angle, stops } => {
            // Gradient line through the center, long enough to cover the box.
            let dir = Vec2::from_angle(angle.to_radians());
            let half = (size.width * dir.x.abs() + size.height * dir.y.abs()) / 2.0;
            let center = size.to_rect().center();
            BackgroundVisual::Gradient {
                start: center - dir * half,
                end: center + dir * half,
                stops: stops.iter().map(|s| (s.offset.clamp(0.0, 1.0), s.color)).collect(),
            }
        }
    }
}

fn render_element(element: &SlideElement, mode: RenderMode, scale: f64, resources: &RenderResources) -> VisualNode {
    let geometry = element.geometry;
    let size = geometry.size();
    let primitives: Vec<Primitive> = match &element.content {
        ElementContent::Text(text) => render_text(text, size),
        ElementContent::Shape(shape) => render_shape(shape, size),
        ElementContent::Image(image) => render_image(image, size),
        ElementContent::Table(table) => render_table(table, size, &resources.themes),
        ElementContent::Placeholder(placeholder) => render_placeholder(placeholder, size),
        ElementContent::Chart(chart) => {
            let theme = resources.themes.resolve(chart.theme.as_deref());
            let show_legend = mode.shows_legend() && chart.show_legend;
            // Chart renderers apply the scale themselves.
            return node(element, mode, scale, resources.charts.render_chart(chart, size, scale, show_legend, &theme));
        }
    };
    let primitives = primitives.into_iter().map(|p| p.scaled(scale)).collect();
    node(element, mode, scale, primitives)
}

fn node(element: &SlideElement, mode: RenderMode, scale: f64, primitives: Vec<Primitive>) -> VisualNode {
    VisualNode {
        element_id: element.id(),
        kind: element.kind(),
        frame: scale_rect(element.geometry.rect(), scale),
        rotation: element.geometry.rotation,
        opacity: element.effective_opacity(),
        interactive: mode.is_interactive(),
        z_index: element.effective_z(),
        primitives,
    }
}

/// Dashed box with the role prompt centred in it.
fn render_placeholder(content: &PlaceholderContent, size: Size) -> Vec<Primitive> {
    let font_size = (size.height * 0.4).clamp(10.0, 28.0);
    let text_box = TextBox {
        size,
        padding: 8.0,
        font_size,
        line_height: 1.2,
        align: HorizontalAlign::Center,
        vertical_align: VerticalAlign::Middle,
    };
    let prompt = if content.prompt.is_empty() {
        content.role.default_prompt()
    } else {
        content.prompt.as_str()
    };
    vec![
        Primitive::stroke(
            size.to_rect().to_path(TOLERANCE),
            StrokeVisual {
                color: PLACEHOLDER_BORDER,
                width: 1.0,
                dash: vec![4.0, 3.0],
            },
        ),
        Primitive::Text(TextRun {
            lines: text_box.layout(prompt),
            font_family: "Inter".to_string(),
            font_size,
            color: PLACEHOLDER_BORDER,
            bold: false,
            italic: true,
            underline: false,
        }),
    ]
}

/// Scale factor fitting a slide into a surface, as used by the presenter.
pub fn fit_scale(slide_size: Size, surface: Size) -> f64 {
    if slide_size.width <= 0.0 || slide_size.height <= 0.0 {
        return 1.0;
    }
    sanitize_scale((surface.width / slide_size.width).min(surface.height / slide_size.height))
}

/// Top-left of a slide of `slide_size` letterboxed into `surface`.
pub fn fit_origin(slide_size: Size, surface: Size) -> Point {
    let scale = fit_scale(slide_size, surface);
    Point::new(
        (surface.width - slide_size.width * scale) / 2.0,
        (surface.height - slide_size.height * scale) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidekit_core::document::GradientStop;
    use slidekit_core::elements::{
        ChartContent, ChartSeries, ChartType, Geometry, ImageSource, PlaceholderRole, ShapeKind,
    };

    fn sample() -> Vec<SlideElement> {
        let mut table = SlideElement::table(Geometry::new(500.0, 300.0, 300.0, 120.0), 3, 2);
        if let ElementContent::Table(t) = &mut table.content {
            t.set_cell(0, 0, "Name");
            t.set_cell(1, 0, "A somewhat longer cell value");
        }
        let chart = ChartContent::new(ChartType::Line)
            .with_labels(["a", "b", "c"])
            .with_series(ChartSeries::new("s", vec![1.0, 3.0, 2.0]));
        vec![
            SlideElement::text(Geometry::new(100.0, 100.0, 200.0, 50.0).with_rotation(15.0), "Quarterly results and outlook")
                .with_z_index(2),
            SlideElement::shape(Geometry::new(50.0, 50.0, 120.0, 80.0), ShapeKind::Star).with_z_index(1),
            SlideElement::image(
                Geometry::new(400.0, 40.0, 160.0, 90.0),
                Some(ImageSource::Url {
                    url: "https://example.com/p.png".into(),
                }),
            )
            .with_z_index(1),
            table.with_z_index(0),
            SlideElement::chart(Geometry::new(40.0, 250.0, 400.0, 250.0), chart).with_z_index(3),
            SlideElement::placeholder(Geometry::new(100.0, 460.0, 600.0, 60.0), PlaceholderRole::Footer)
                .with_z_index(3),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_paint_order_is_z_then_document_order() {
        let elements = sample();
        let tree = render(&elements, RenderMode::Editor, 1.0);
        let ids: Vec<_> = tree.nodes.iter().map(|n| n.element_id).collect();
        let expected = vec![
            elements[3].id(),
            elements[1].id(),
            elements[2].id(),
            elements[0].id(),
            elements[4].id(),
            elements[5].id(),
        ];
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_missing_z_is_zero() {
        let a = SlideElement::shape(Geometry::new(0.0, 0.0, 10.0, 10.0), ShapeKind::Rectangle).with_z_index(1);
        let b = SlideElement::shape(Geometry::new(0.0, 0.0, 10.0, 10.0), ShapeKind::Rectangle);
        let tree = render(&[a.clone(), b.clone()], RenderMode::Export, 1.0);
        assert_eq!(tree.nodes[0].element_id, b.id());
        assert_eq!(tree.nodes[1].element_id, a.id());
    }

    #[test]
    fn test_thumbnail_matches_editor_layout() {
        let elements = sample();
        let editor = render(&elements, RenderMode::Editor, 1.0);
        let thumb = render(&elements, RenderMode::Thumbnail, 0.2);

        assert_eq!(editor.kinds(), thumb.kinds());
        for (big, small) in editor.nodes.iter().zip(&thumb.nodes) {
            assert_eq!(big.element_id, small.element_id);
            assert!(approx(big.frame.x0 * 0.2, small.frame.x0));
            assert!(approx(big.frame.width() * 0.2, small.frame.width()));
            assert_eq!(big.rotation, small.rotation);
            assert!(big.interactive);
            assert!(!small.interactive);

            // Same primitive structure; charts may drop only their legend.
            let big_names: Vec<_> = big.primitives.iter().map(Primitive::name).collect();
            let small_names: Vec<_> = small.primitives.iter().map(Primitive::name).collect();
            if big.kind == slidekit_core::elements::ElementKind::Chart {
                assert!(small_names.len() <= big_names.len());
                continue;
            }
            assert_eq!(big_names, small_names);
            for (p, q) in big.primitives.iter().zip(&small.primitives) {
                match (p, q) {
                    (Primitive::Text(a), Primitive::Text(b)) => {
                        assert!(approx(a.font_size * 0.2, b.font_size));
                        let a_lines: Vec<_> = a.lines.iter().map(|l| &l.text).collect();
                        let b_lines: Vec<_> = b.lines.iter().map(|l| &l.text).collect();
                        assert_eq!(a_lines, b_lines);
                    }
                    (Primitive::Path { stroke: Some(a), .. }, Primitive::Path { stroke: Some(b), .. }) => {
                        assert!(approx(a.width * 0.2, b.width));
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_modes_share_mapping() {
        let elements = sample();
        let reference = render(&elements, RenderMode::Export, 0.5);
        for mode in [RenderMode::Editor, RenderMode::Presentation] {
            let tree = render(&elements, mode, 0.5);
            let a: Vec<_> = tree.nodes.iter().map(|n| &n.primitives).collect();
            let b: Vec<_> = reference.nodes.iter().map(|n| &n.primitives).collect();
            assert_eq!(a, b, "{mode}");
        }
    }

    #[test]
    fn test_thumbnail_hides_legend() {
        let chart = ChartContent::new(ChartType::Bar).with_series(ChartSeries::new("s", vec![1.0]));
        let elements = vec![SlideElement::chart(Geometry::new(0.0, 0.0, 300.0, 200.0), chart)];
        let full = render(&elements, RenderMode::Presentation, 1.0);
        let thumb = render(&elements, RenderMode::Thumbnail, 1.0);
        assert!(thumb.nodes[0].primitives.len() < full.nodes[0].primitives.len());
    }

    #[test]
    fn test_opacity_and_invalid_scale() {
        let el = SlideElement::shape(Geometry::new(0.0, 0.0, 10.0, 10.0), ShapeKind::Circle).with_opacity(0.4);
        let tree = render(std::slice::from_ref(&el), RenderMode::Export, f64::NAN);
        assert_eq!(tree.scale, 1.0);
        assert_eq!(tree.nodes[0].opacity, 0.4);
    }

    #[test]
    fn test_render_slide_background() {
        let mut slide = Slide::new();
        slide.background = Background::Gradient {
            angle: 0.0,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: SerializableColor::white(),
                },
                GradientStop {
                    offset: 1.0,
                    color: SerializableColor::black(),
                },
            ],
        };
        let tree = render_slide(&slide, Size::new(960.0, 540.0), RenderMode::Thumbnail, 0.25, &RenderResources::default());
        assert_eq!(tree.size, Size::new(240.0, 135.0));
        let Some(BackgroundVisual::Gradient { start, end, .. }) = tree.background else {
            panic!("expected gradient");
        };
        assert!((start - Point::new(0.0, 67.5)).hypot() < 1e-9);
        assert!((end - Point::new(240.0, 67.5)).hypot() < 1e-9);
    }

    #[test]
    fn test_editor_hit_test_respects_rotation() {
        let el = SlideElement::shape(Geometry::new(100.0, 100.0, 200.0, 20.0).with_rotation(90.0), ShapeKind::Rectangle);
        let tree = render(std::slice::from_ref(&el), RenderMode::Editor, 1.0);
        assert_eq!(tree.hit_test(Point::new(200.0, 30.0)), Some(el.id()));
        assert_eq!(tree.hit_test(Point::new(110.0, 110.0)), None);
        let export = render(std::slice::from_ref(&el), RenderMode::Export, 1.0);
        assert_eq!(export.hit_test(Point::new(200.0, 110.0)), None);
    }

    #[test]
    fn test_tree_serializes_for_hosts() {
        let tree = render(&sample(), RenderMode::Thumbnail, 0.2);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["mode"], "thumbnail");
        assert_eq!(json["nodes"].as_array().map(Vec::len), Some(6));
        assert_eq!(json["nodes"][0]["interactive"], false);
    }

    #[test]
    fn test_fit_scale() {
        let slide = Size::new(960.0, 540.0);
        assert_eq!(fit_scale(slide, Size::new(1920.0, 1200.0)), 2.0);
        assert_eq!(fit_origin(slide, Size::new(1920.0, 1200.0)), Point::new(0.0, 60.0));
    }
}
