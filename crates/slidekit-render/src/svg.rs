//! SVG backend for static export.

use crate::renderer::{RenderResult, Renderer, check_surface};
use crate::visual::{BackgroundVisual, Primitive, StrokeVisual, TextRun, VisualNode, VisualTree};
use slidekit_core::elements::{ImageSource, SerializableColor};
use std::fmt::Write;

/// Writes a visual tree as a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    svg: String,
    clip_count: usize,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last document built.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Take the last document, leaving the renderer empty.
    pub fn take_svg(&mut self) -> String {
        std::mem::take(&mut self.svg)
    }

    /// Build and return the document for `tree`.
    pub fn render_to_string(&mut self, tree: &VisualTree) -> RenderResult<String> {
        self.build_scene(tree)?;
        Ok(self.take_svg())
    }

    fn background(&mut self, background: &BackgroundVisual) {
        match background {
            BackgroundVisual::Solid { color } => {
                let _ = write!(self.svg, "<rect width=\"100%\" height=\"100%\" {}/>", paint("fill", *color));
            }
            BackgroundVisual::Gradient { start, end, stops } => {
                let _ = write!(
                    self.svg,
                    "<defs><linearGradient id=\"bg\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
                    start.x, start.y, end.x, end.y
                );
                for (offset, color) in stops {
                    let _ = write!(
                        self.svg,
                        "<stop offset=\"{offset}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
                        rgb(*color),
                        alpha(*color)
                    );
                }
                self.svg
                    .push_str("</linearGradient></defs><rect width=\"100%\" height=\"100%\" fill=\"url(#bg)\"/>");
            }
        }
    }

    fn node(&mut self, node: &VisualNode) {
        let [a, b, c, d, e, f] = node.transform().as_coeffs();
        let _ = write!(self.svg, "<g transform=\"matrix({a} {b} {c} {d} {e} {f})\"");
        if node.opacity < 1.0 {
            let _ = write!(self.svg, " opacity=\"{}\"", node.opacity);
        }
        self.svg.push('>');
        for primitive in &node.primitives {
            self.primitive(primitive);
        }
        self.svg.push_str("</g>");
    }

    fn primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Path { path, fill, stroke } => {
                let fill = fill.map_or_else(|| "fill=\"none\"".to_string(), |c| paint("fill", c));
                let _ = write!(self.svg, "<path d=\"{}\" {fill}", path.to_svg());
                if let Some(stroke) = stroke {
                    self.stroke_attrs(stroke);
                }
                self.svg.push_str("/>");
            }
            Primitive::Text(run) => self.text(run),
            Primitive::Image {
                source,
                dest,
                clip,
                corner_radius,
            } => {
                self.clip_count += 1;
                let id = self.clip_count;
                let _ = write!(
                    self.svg,
                    "<clipPath id=\"clip{id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{corner_radius}\"/></clipPath>",
                    clip.x0,
                    clip.y0,
                    clip.width(),
                    clip.height()
                );
                let _ = write!(
                    self.svg,
                    "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" clip-path=\"url(#clip{id})\" href=\"{}\"/>",
                    dest.x0,
                    dest.y0,
                    dest.width(),
                    dest.height(),
                    escape_xml(&href(source))
                );
            }
        }
    }

    fn stroke_attrs(&mut self, stroke: &StrokeVisual) {
        let _ = write!(self.svg, " {} stroke-width=\"{}\"", paint("stroke", stroke.color), stroke.width);
        if !stroke.dash.is_empty() {
            let dash: Vec<String> = stroke.dash.iter().map(f64::to_string).collect();
            let _ = write!(self.svg, " stroke-dasharray=\"{}\"", dash.join(" "));
        }
    }

    fn text(&mut self, run: &TextRun) {
        let weight = if run.bold { "bold" } else { "normal" };
        let style = if run.italic { "italic" } else { "normal" };
        for line in &run.lines {
            // Baseline sits about 80% down the glyph box.
            let baseline = line.origin.y + (line.height - run.font_size) / 2.0 + run.font_size * 0.8;
            let _ = write!(
                self.svg,
                "<text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" font-family=\"{}\" font-weight=\"{weight}\" font-style=\"{style}\" {}",
                line.origin.x,
                run.font_size,
                escape_xml(&run.font_family),
                paint("fill", run.color)
            );
            if run.underline {
                self.svg.push_str(" text-decoration=\"underline\"");
            }
            let _ = write!(self.svg, ">{}</text>", escape_xml(&line.text));
        }
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, tree: &VisualTree) -> RenderResult<()> {
        check_surface(tree)?;
        self.svg.clear();
        self.clip_count = 0;
        let (w, h) = (tree.size.width, tree.size.height);
        let _ = write!(
            self.svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        if let Some(background) = &tree.background {
            self.background(background);
        }
        for node in &tree.nodes {
            self.node(node);
        }
        self.svg.push_str("</svg>");
        log::debug!("Built {} SVG for {} nodes ({} bytes)", tree.mode, tree.nodes.len(), self.svg.len());
        Ok(())
    }
}

fn rgb(color: SerializableColor) -> String {
    format!("rgb({},{},{})", color.r, color.g, color.b)
}

fn alpha(color: SerializableColor) -> f64 {
    f64::from(color.a) / 255.0
}

/// `fill="rgb(..)"` plus an opacity attribute when translucent.
fn paint(attr: &str, color: SerializableColor) -> String {
    if color.a == 255 {
        format!("{attr}=\"{}\"", rgb(color))
    } else {
        format!("{attr}=\"{}\" {attr}-opacity=\"{}\"", rgb(color), alpha(color))
    }
}

fn href(source: &ImageSource) -> String {
    match source {
        ImageSource::Url { url } => url.clone(),
        ImageSource::Data { format, data_base64 } => format!("data:{};base64,{data_base64}", format.mime_type()),
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
