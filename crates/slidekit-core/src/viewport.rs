//! Mapping between slide space and a rendering surface.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Uniform scale plus offset from slide units to surface pixels.
///
/// Every surface derives its pixel geometry from one of these; there is no
/// per-surface layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface position of the slide origin.
    pub offset: Vec2,
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.05,
            max_scale: 8.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewport with a fixed scale and no offset (thumbnails, export).
    pub fn with_scale(scale: f64) -> Self {
        let mut viewport = Self::default();
        viewport.scale = viewport.clamp_scale(scale);
        viewport
    }

    /// Letterbox the slide into `surface`, centered, with `padding` on all sides.
    pub fn fit(slide: Size, surface: Size, padding: f64) -> Self {
        let mut viewport = Self::default();
        viewport.fit_to(slide, surface, padding);
        viewport
    }

    /// Slide-to-surface transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Surface-to-slide transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    pub fn screen_to_slide(&self, point: Point) -> Point {
        self.inverse_transform() * point
    }

    pub fn slide_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Convert a screen-pixel distance to slide units.
    pub fn screen_distance(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_scale = self.clamp_scale(self.scale * factor);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        let slide_point = self.screen_to_slide(screen_point);
        self.scale = new_scale;
        let moved = self.slide_to_screen(slide_point);
        self.offset += screen_point - moved;
    }

    /// Fit the slide rectangle into `surface`, centered.
    pub fn fit_to(&mut self, slide: Size, surface: Size, padding: f64) {
        if slide.width <= 0.0 || slide.height <= 0.0 {
            *self = Self::default();
            return;
        }
        let available = Size::new(
            (surface.width - padding * 2.0).max(1.0),
            (surface.height - padding * 2.0).max(1.0),
        );
        let scale = (available.width / slide.width).min(available.height / slide.height);
        self.scale = self.clamp_scale(scale);
        self.offset = Vec2::new(
            (surface.width - slide.width * self.scale) / 2.0,
            (surface.height - slide.height * self.scale) / 2.0,
        );
    }

    /// Surface rectangle covered by the slide.
    pub fn slide_rect(&self, slide: Size) -> Rect {
        self.transform().transform_rect_bbox(slide.to_rect())
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_finite() {
            scale.clamp(self.min_scale, self.max_scale)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let viewport = Viewport::new();
        let p = Point::new(100.0, 200.0);
        assert_eq!(viewport.screen_to_slide(p), p);
    }

    #[test]
    fn test_fit_letterboxes_wide_surface() {
        let viewport = Viewport::fit(Size::new(960.0, 540.0), Size::new(1920.0, 1200.0), 0.0);
        assert!((viewport.scale - 2.0).abs() < 1e-12);
        assert!((viewport.offset.x - 0.0).abs() < 1e-12);
        assert!((viewport.offset.y - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_pillarboxes_tall_surface() {
        let viewport = Viewport::fit(Size::new(960.0, 540.0), Size::new(800.0, 800.0), 0.0);
        let rect = viewport.slide_rect(Size::new(960.0, 540.0));
        assert!((rect.width() - 800.0).abs() < 1e-9);
        assert!((rect.center().y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.scale = 1.5;
        let original = Point::new(123.0, 456.0);
        let back = viewport.slide_to_screen(viewport.screen_to_slide(original));
        assert!((back - original).hypot() < 1e-10);
    }

    #[test]
    fn test_zoom_at_keeps_point() {
        let mut viewport = Viewport::new();
        let anchor = Point::new(200.0, 100.0);
        let before = viewport.screen_to_slide(anchor);
        viewport.zoom_at(anchor, 2.0);
        let after = viewport.screen_to_slide(anchor);
        assert!((before - after).hypot() < 1e-10);
        assert!((viewport.scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_distance() {
        let viewport = Viewport::with_scale(2.0);
        assert!((viewport.screen_distance(8.0) - 4.0).abs() < f64::EPSILON);
    }
}
