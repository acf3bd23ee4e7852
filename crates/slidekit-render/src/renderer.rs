//! Renderer trait abstraction.

use crate::visual::{BackgroundVisual, VisualTree};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Trait for painting backends.
///
/// Backends consume a finished [`VisualTree`]; they never look at the
/// document model.
pub trait Renderer {
    /// Build the backend's scene or command buffer for one tree.
    fn build_scene(&mut self, tree: &VisualTree) -> RenderResult<()>;

    /// Colour to clear the surface with before painting.
    fn background_color(&self, tree: &VisualTree) -> Color {
        match &tree.background {
            Some(BackgroundVisual::Solid { color }) => (*color).into(),
            Some(BackgroundVisual::Gradient { stops, .. }) => stops.first().map_or(Color::WHITE, |(_, c)| (*c).into()),
            None => Color::WHITE,
        }
    }
}

/// Reject trees no backend can paint.
pub(crate) fn check_surface(tree: &VisualTree) -> RenderResult<()> {
    let size = tree.size;
    if !(size.width.is_finite() && size.height.is_finite()) || size.width <= 0.0 || size.height <= 0.0 {
        return Err(RendererError::Surface(format!(
            "invalid surface size {}x{}",
            size.width, size.height
        )));
    }
    Ok(())
}
