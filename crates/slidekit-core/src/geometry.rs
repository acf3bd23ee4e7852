//! Pure geometry functions for move, resize and rotate gestures.
//!
//! Every function takes the geometry captured at gesture start plus the
//! cumulative pointer delta since then. Non-finite input yields the start
//! geometry unchanged.

use crate::config::EditorConfig;
use crate::elements::Geometry;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Normalize degrees to `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize degrees to `(-180, 180]`.
pub fn normalize_signed(degrees: f64) -> f64 {
    let r = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if r <= -180.0 { r + 360.0 } else { r }
}

/// Snap an angle to the nearest multiple of `increment`, in `[0, 360)`.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    normalize_rotation((angle_degrees / increment).round() * increment)
}

/// Angle in degrees of the vector from `center` to `pointer`.
///
/// Returns `None` for a zero-length vector, where the angle is undefined.
pub fn pointer_angle(center: Point, pointer: Point) -> Option<f64> {
    let v = pointer - center;
    if !v.x.is_finite() || !v.y.is_finite() || v.hypot2() < 1e-12 {
        return None;
    }
    Some(v.y.atan2(v.x).to_degrees())
}

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::Ne | ResizeHandle::Nw | ResizeHandle::Se | ResizeHandle::Sw
        )
    }

    /// Position of the handle in unit coordinates of the frame.
    pub fn unit_position(self) -> (f64, f64) {
        let u = if self.moves_left() {
            0.0
        } else if self.moves_right() {
            1.0
        } else {
            0.5
        };
        let v = if self.moves_top() {
            0.0
        } else if self.moves_bottom() {
            1.0
        } else {
            0.5
        };
        (u, v)
    }
}

/// Minimum element size enforced on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeFloor {
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for SizeFloor {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for SizeFloor {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min_width: config.min_width,
            min_height: config.min_height,
        }
    }
}

/// Rotation snap policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSnap {
    pub step: f64,
    pub epsilon: f64,
    pub fine_step: f64,
}

impl Default for RotationSnap {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for RotationSnap {
    fn from(config: &EditorConfig) -> Self {
        Self {
            step: config.rotation_snap_step,
            epsilon: config.rotation_snap_epsilon,
            fine_step: config.fine_rotation_step,
        }
    }
}

/// Translate by the cumulative delta, clamping each axis independently to
/// `lower_bound` if one is given.
pub fn move_element(start: &Geometry, dx: f64, dy: f64, lower_bound: Option<Point>) -> Geometry {
    if !dx.is_finite() || !dy.is_finite() || !start.is_finite() {
        return *start;
    }
    let mut x = start.x + dx;
    let mut y = start.y + dy;
    if let Some(bound) = lower_bound {
        x = x.max(bound.x);
        y = y.max(bound.y);
    }
    Geometry { x, y, ..*start }
}

/// Resize from `handle` by the cumulative delta `(dx, dy)` in slide space.
///
/// Edges not controlled by the handle stay fixed. Width and height never go
/// below `floor`; a clamped dimension pins the dragged edge so the opposite
/// edge does not move. With `aspect_lock` the start aspect ratio is kept.
/// Rotated elements are resized in their local frame and re-positioned so
/// the opposite edge stays put in slide space.
pub fn resize(
    start: &Geometry,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    aspect_lock: bool,
    floor: SizeFloor,
) -> Geometry {
    if !dx.is_finite() || !dy.is_finite() || !start.is_finite() {
        return *start;
    }
    if dx == 0.0 && dy == 0.0 {
        return *start;
    }

    let local = if start.rotation == 0.0 {
        Vec2::new(dx, dy)
    } else {
        let (sin, cos) = (-start.rotation).to_radians().sin_cos();
        Vec2::new(dx * cos - dy * sin, dx * sin + dy * cos)
    };

    let (left, top, right, bottom) = resize_edges(start, handle, local, aspect_lock, floor);
    let width = right - left;
    let height = bottom - top;

    if start.rotation == 0.0 {
        return Geometry {
            x: start.x + left,
            y: start.y + top,
            width,
            height,
            rotation: start.rotation,
        };
    }

    // Shift of the frame center in local space, mapped back to slide space.
    let offset = Vec2::new(
        (left + right - start.width) / 2.0,
        (top + bottom - start.height) / 2.0,
    );
    let center = start.from_local(offset);
    Geometry {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        rotation: start.rotation,
    }
}

/// New edges relative to the start frame's top-left corner, in local space.
fn resize_edges(
    start: &Geometry,
    handle: ResizeHandle,
    delta: Vec2,
    aspect_lock: bool,
    floor: SizeFloor,
) -> (f64, f64, f64, f64) {
    let (w, h) = (start.width, start.height);

    let mut width = if handle.moves_right() {
        w + delta.x
    } else if handle.moves_left() {
        w - delta.x
    } else {
        w
    };
    let mut height = if handle.moves_bottom() {
        h + delta.y
    } else if handle.moves_top() {
        h - delta.y
    } else {
        h
    };

    let ratio = w / h;
    let lockable = aspect_lock && ratio.is_finite() && ratio > 0.0;
    if lockable {
        let width_primary = if handle.is_corner() {
            ((width / w) - 1.0).abs() >= ((height / h) - 1.0).abs()
        } else {
            handle.moves_left() || handle.moves_right()
        };
        if width_primary {
            height = width / ratio;
        } else {
            width = height * ratio;
        }
        // Scale up uniformly until both dimensions clear the floor.
        width = width.max(floor.min_width).max(floor.min_height * ratio);
        height = width / ratio;
    } else {
        width = width.max(floor.min_width);
        height = height.max(floor.min_height);
    }

    let (left, right) = if handle.moves_left() {
        (w - width, w)
    } else if handle.moves_right() {
        (0.0, width)
    } else {
        // n/s handles under aspect lock grow horizontally around the center.
        let cx = w / 2.0;
        (cx - width / 2.0, cx + width / 2.0)
    };
    let (top, bottom) = if handle.moves_top() {
        (h - height, h)
    } else if handle.moves_bottom() {
        (0.0, height)
    } else {
        let cy = h / 2.0;
        (cy - height / 2.0, cy + height / 2.0)
    };
    (left, top, right, bottom)
}

/// Compute the rotation for a rotate gesture, in `[0, 360)`.
///
/// `start_angle` and `current_angle` are pointer angles around the element
/// center in degrees. Fine snapping replaces coarse snapping when active.
/// Outside the coarse snap epsilon the raw angle is kept exactly.
pub fn rotate(
    start_rotation: f64,
    start_angle: f64,
    current_angle: f64,
    fine: bool,
    snap: RotationSnap,
) -> f64 {
    if !start_rotation.is_finite() || !start_angle.is_finite() || !current_angle.is_finite() {
        return normalize_rotation(start_rotation);
    }
    let raw = start_rotation + (current_angle - start_angle);
    let signed = normalize_signed(raw);

    if fine {
        return snap_angle(signed, snap.fine_step);
    }
    let nearest = (signed / snap.step).round() * snap.step;
    if (signed - nearest).abs() <= snap.epsilon {
        normalize_rotation(nearest)
    } else {
        normalize_rotation(raw)
    }
}

/// Rotate gesture expressed with pointer positions around the element center.
pub fn rotate_around(
    start: &Geometry,
    center: Point,
    pointer_start: Point,
    pointer_now: Point,
    fine: bool,
    snap: RotationSnap,
) -> Geometry {
    let (Some(start_angle), Some(current_angle)) =
        (pointer_angle(center, pointer_start), pointer_angle(center, pointer_now))
    else {
        return *start;
    };
    Geometry {
        rotation: rotate(start.rotation, start_angle, current_angle, fine, snap),
        ..*start
    }
}
