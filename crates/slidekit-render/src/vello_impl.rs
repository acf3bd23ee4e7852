//! Vello-based renderer implementation.

use crate::assets;
use crate::renderer::{RenderResult, Renderer, check_surface};
use crate::visual::{BackgroundVisual, Primitive, StrokeVisual, TextRun, VisualNode, VisualTree};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, ColorStop, Fill, Gradient};
use slidekit_core::elements::{ElementId, ImageSource, SerializableColor};
use std::collections::HashMap;
use std::sync::Arc;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated slide painting.
pub struct VelloRenderer {
    scene: Scene,
    /// Font context for text rendering (cached to avoid re-registering fonts).
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    /// Decoded images keyed by element, along with the source they came from.
    image_cache: HashMap<ElementId, (ImageSource, Option<peniko::ImageData>)>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            image_cache: HashMap::new(),
        }
    }

    /// Register an additional font face from raw TTF/OTF bytes.
    pub fn register_font(&mut self, bytes: Vec<u8>) {
        let families = self
            .font_cx
            .collection
            .register_fonts(vello::peniko::Blob::new(Arc::new(bytes)), None);
        log::debug!("Registered {} font families", families.len());
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Drop cached images for elements no longer present.
    pub fn retain_images(&mut self, keep: impl Fn(ElementId) -> bool) {
        self.image_cache.retain(|id, _| keep(*id));
    }

    fn render_background(&mut self, tree: &VisualTree) {
        let surface = Rect::from_origin_size(Point::ZERO, tree.size);
        match &tree.background {
            Some(BackgroundVisual::Solid { color }) => {
                self.scene
                    .fill(Fill::NonZero, Affine::IDENTITY, Color::from(*color), None, &surface);
            }
            Some(BackgroundVisual::Gradient { start, end, stops }) => {
                let stops: Vec<ColorStop> = stops
                    .iter()
                    .map(|(offset, color)| ColorStop::from((*offset as f32, Color::from(*color))))
                    .collect();
                let gradient = Gradient::new_linear(*start, *end).with_stops(stops.as_slice());
                self.scene
                    .fill(Fill::NonZero, Affine::IDENTITY, &gradient, None, &surface);
            }
            None => {}
        }
    }

    fn render_node(&mut self, node: &VisualNode) {
        let transform = node.transform();
        let alpha = node.opacity.clamp(0.0, 1.0) as f32;
        for primitive in &node.primitives {
            match primitive {
                Primitive::Path { path, fill, stroke } => {
                    if let Some(fill) = fill {
                        self.scene
                            .fill(Fill::NonZero, transform, tint(*fill, alpha), None, path);
                    }
                    if let Some(stroke) = stroke {
                        self.render_stroke(path, stroke, transform, alpha);
                    }
                }
                Primitive::Text(run) => self.render_text(run, transform, alpha),
                Primitive::Image {
                    source,
                    dest,
                    clip,
                    corner_radius,
                } => {
                    let clip = RoundedRect::from_rect(*clip, *corner_radius);
                    self.render_image(node.element_id, source, *dest, &clip, transform, alpha);
                }
            }
        }
    }

    fn render_stroke(&mut self, path: &BezPath, style: &StrokeVisual, transform: Affine, alpha: f32) {
        let mut stroke = Stroke::new(style.width);
        if !style.dash.is_empty() {
            stroke = stroke.with_dashes(0.0, style.dash.iter().copied());
        }
        self.scene
            .stroke(&stroke, transform, tint(style.color, alpha), None, path);
    }

    /// Render a text run using Parley, one layout per pre-wrapped line.
    fn render_text(&mut self, run: &TextRun, transform: Affine, alpha: f32) {
        let brush = Brush::Solid(tint(run.color, alpha));
        let weight = if run.bold {
            parley::FontWeight::BOLD
        } else {
            parley::FontWeight::NORMAL
        };
        let style = if run.italic {
            parley::FontStyle::Italic
        } else {
            parley::FontStyle::Normal
        };

        let mut glyph_count = 0;
        for line in &run.lines {
            let mut builder = self
                .layout_cx
                .ranged_builder(&mut self.font_cx, &line.text, 1.0, false);
            builder.push_default(StyleProperty::FontSize(run.font_size as f32));
            builder.push_default(StyleProperty::Brush(brush.clone()));
            builder.push_default(StyleProperty::FontWeight(weight));
            builder.push_default(StyleProperty::FontStyle(style));
            builder.push_default(StyleProperty::Underline(run.underline));
            builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
                parley::FontFamily::Named(run.font_family.as_str().into()),
            )));
            let mut layout = builder.build(&line.text);
            layout.break_all_lines(None);
            layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

            // Center the parley line box inside the laid-out line.
            let dy = (line.height - layout.height() as f64) / 2.0;
            let line_transform = transform * Affine::translate((line.origin.x, line.origin.y + dy));

            for layout_line in layout.lines() {
                for item in layout_line.items() {
                    let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                        continue;
                    };
                    let mut x = glyph_run.offset();
                    let y = glyph_run.baseline();
                    let glyph_run_data = glyph_run.run();
                    let font = glyph_run_data.font();
                    let font_size = glyph_run_data.font_size();
                    let glyph_xform = glyph_run_data
                        .synthesis()
                        .skew()
                        .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                    let glyphs: Vec<vello::Glyph> = glyph_run
                        .glyphs()
                        .map(|glyph| {
                            let gx = x + glyph.x;
                            let gy = y - glyph.y;
                            x += glyph.advance;
                            vello::Glyph {
                                id: glyph.id,
                                x: gx,
                                y: gy,
                            }
                        })
                        .collect();
                    glyph_count += glyphs.len();

                    if !glyphs.is_empty() {
                        self.scene
                            .draw_glyphs(font)
                            .brush(&brush)
                            .hint(true)
                            .transform(line_transform)
                            .glyph_transform(glyph_xform)
                            .font_size(font_size)
                            .normalized_coords(glyph_run_data.normalized_coords())
                            .draw(Fill::NonZero, glyphs.into_iter());
                    }
                }
            }
        }

        // No font matched: mark where the text would be.
        if glyph_count == 0 {
            for line in run.lines.iter().filter(|l| !l.text.is_empty()) {
                let rect = Rect::from_origin_size(line.origin, (line.width.max(2.0), line.height));
                self.scene.fill(
                    Fill::NonZero,
                    transform,
                    Color::from_rgba8(255, 100, 100, 100).multiply_alpha(alpha),
                    None,
                    &rect,
                );
            }
        }
    }

    fn image_data(&mut self, id: ElementId, source: &ImageSource) -> Option<peniko::ImageData> {
        if let Some((cached_source, data)) = self.image_cache.get(&id)
            && cached_source == source
        {
            return data.clone();
        }
        let data = match assets::decode_rgba(source) {
            Ok(rgba) => {
                let (width, height) = rgba.dimensions();
                Some(peniko::ImageData {
                    data: peniko::Blob::new(Arc::new(rgba.into_vec())),
                    format: peniko::ImageFormat::Rgba8,
                    width,
                    height,
                    alpha_type: peniko::ImageAlphaType::Alpha,
                })
            }
            Err(err) => {
                log::warn!("Could not decode image for element {id}: {err}");
                None
            }
        };
        self.image_cache.insert(id, (source.clone(), data.clone()));
        data
    }

    fn render_image(
        &mut self,
        id: ElementId,
        source: &ImageSource,
        dest: Rect,
        clip: &RoundedRect,
        transform: Affine,
        alpha: f32,
    ) {
        let Some(data) = self.image_data(id, source) else {
            self.render_image_placeholder(clip.rect(), transform, alpha);
            return;
        };
        let brush_transform = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(
                dest.width() / f64::from(data.width.max(1)),
                dest.height() / f64::from(data.height.max(1)),
            );
        let brush = Brush::Image(data.into()).multiply_alpha(alpha);
        self.scene
            .fill(Fill::NonZero, transform, &brush, Some(brush_transform), clip);
    }

    /// Gray box with an X for images that could not be decoded.
    fn render_image_placeholder(&mut self, bounds: Rect, transform: Affine, alpha: f32) {
        let rect_path = bounds.to_path(0.1);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(200, 200, 200, 255).multiply_alpha(alpha),
            None,
            &rect_path,
        );

        let stroke = Stroke::new(2.0);
        let mut x_path = BezPath::new();
        x_path.move_to(Point::new(bounds.x0, bounds.y0));
        x_path.line_to(Point::new(bounds.x1, bounds.y1));
        x_path.move_to(Point::new(bounds.x1, bounds.y0));
        x_path.line_to(Point::new(bounds.x0, bounds.y1));
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(150, 150, 150, 255).multiply_alpha(alpha),
            None,
            &x_path,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, tree: &VisualTree) -> RenderResult<()> {
        check_surface(tree)?;
        self.scene.reset();
        self.render_background(tree);
        for node in &tree.nodes {
            self.render_node(node);
        }
        Ok(())
    }
}

fn tint(color: SerializableColor, alpha: f32) -> Color {
    Color::from(color).multiply_alpha(alpha)
}
