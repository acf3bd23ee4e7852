//! Slidekit Render Library
//!
//! Turns slide elements into a backend-neutral [`VisualTree`] and paints
//! trees through pluggable backends. The SVG backend is always available;
//! the Vello backend sits behind the `vello-renderer` feature.

pub mod assets;
pub mod chart;
pub mod image;
pub mod mode;
pub mod pipeline;
mod renderer;
pub mod shapes;
pub mod svg;
pub mod table;
pub mod text;
pub mod visual;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use assets::{AssetError, image_dimensions, load_dimensions};
pub use chart::{BasicChartRenderer, ChartRenderer};
pub use mode::{RenderMode, UnknownMode};
pub use pipeline::{RenderResources, fit_origin, fit_scale, render, render_slide, render_with};
pub use renderer::{RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;
pub use visual::{BackgroundVisual, Primitive, StrokeVisual, TextLine, TextRun, VisualNode, VisualTree};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
