//! Selection handles and hit-testing.

use crate::elements::Geometry;
use crate::geometry::ResizeHandle;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// Resize handle at a corner or edge midpoint.
    Resize(ResizeHandle),
    /// Rotation handle (positioned above the top edge).
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in slide coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in slide coordinates) hits this handle.
    /// `tolerance` should already be divided by the view scale.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Eight resize handles plus a rotate handle, in the element's rotated frame.
///
/// The rotate handle comes first, then corners, then edges; hit-testing
/// walks the list in this order.
pub fn get_handles(geometry: &Geometry, rotate_offset: f64) -> Vec<Handle> {
    let half_w = geometry.width / 2.0;
    let half_h = geometry.height / 2.0;
    let at = |u: f64, v: f64| geometry.from_local(Vec2::new((u - 0.5) * 2.0 * half_w, (v - 0.5) * 2.0 * half_h));

    let mut handles = Vec::with_capacity(9);
    handles.push(Handle::new(
        geometry.from_local(Vec2::new(0.0, -half_h - rotate_offset)),
        HandleKind::Rotate,
    ));
    let (corners, edges): (Vec<_>, Vec<_>) = ResizeHandle::ALL.into_iter().partition(|h| h.is_corner());
    for handle in corners.into_iter().chain(edges) {
        let (u, v) = handle.unit_position();
        handles.push(Handle::new(at(u, v), HandleKind::Resize(handle)));
    }
    handles
}

/// Find the handle under `point`, if any.
pub fn hit_test_handles(geometry: &Geometry, point: Point, tolerance: f64, rotate_offset: f64) -> Option<HandleKind> {
    get_handles(geometry, rotate_offset)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_unrotated() {
        let geom = Geometry::new(0.0, 0.0, 100.0, 50.0);
        let handles = get_handles(&geom, 25.0);
        assert_eq!(handles.len(), 9);
        assert_eq!(handles[0].kind, HandleKind::Rotate);
        assert!((handles[0].position - Point::new(50.0, -25.0)).hypot() < 1e-9);
        let se = handles
            .iter()
            .find(|h| h.kind == HandleKind::Resize(ResizeHandle::Se))
            .unwrap();
        assert!((se.position - Point::new(100.0, 50.0)).hypot() < 1e-9);
        let w = handles
            .iter()
            .find(|h| h.kind == HandleKind::Resize(ResizeHandle::W))
            .unwrap();
        assert!((w.position - Point::new(0.0, 25.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_handles_follow_rotation() {
        let geom = Geometry::new(0.0, 0.0, 100.0, 50.0).with_rotation(180.0);
        let handles = get_handles(&geom, 25.0);
        // Rotated half a turn: the rotate handle sits below the element.
        assert!((handles[0].position - Point::new(50.0, 75.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_hit_test_handles() {
        let geom = Geometry::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            hit_test_handles(&geom, Point::new(103.0, 52.0), 8.0, 25.0),
            Some(HandleKind::Resize(ResizeHandle::Se))
        );
        assert_eq!(
            hit_test_handles(&geom, Point::new(50.0, -22.0), 8.0, 25.0),
            Some(HandleKind::Rotate)
        );
        assert_eq!(hit_test_handles(&geom, Point::new(50.0, 25.0), 8.0, 25.0), None);
    }

    #[test]
    fn test_corners_win_over_edges_on_small_elements() {
        let geom = Geometry::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            hit_test_handles(&geom, Point::new(0.0, 0.0), 8.0, 25.0),
            Some(HandleKind::Resize(ResizeHandle::Nw))
        );
    }
}
