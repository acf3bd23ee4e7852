//! Gesture state machine for move, resize and rotate.
//!
//! `Idle -> Dragging | Resizing | Rotating -> Idle`. Only one gesture runs at
//! a time. While active, every pointer move produces a live patch that is
//! shown but never written to the document; release turns the last patch
//! into a single commit and cancel throws it away.

use crate::config::EditorConfig;
use crate::elements::{ElementId, Geometry};
use crate::error::{EditError, EditResult};
use crate::geometry::{self, ResizeHandle, RotationSnap, SizeFloor};
use crate::history::ActionKind;
use crate::input::{ClickTracker, Modifiers};
use crate::snap::{self, Guide};
use crate::widget::WidgetManager;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Data captured when a gesture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub element_id: ElementId,
    /// Geometry at gesture start.
    pub start: Geometry,
    /// Pointer position at gesture start, in slide units.
    pub origin: Point,
}

/// State of the interaction session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        gesture: Gesture,
        /// Snap candidates, collected once at gesture start.
        guides: Vec<Guide>,
    },
    Resizing {
        gesture: Gesture,
        handle: ResizeHandle,
    },
    Rotating {
        gesture: Gesture,
        /// Rotation center in slide units.
        center: Point,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { gesture, .. }
            | GestureState::Resizing { gesture, .. }
            | GestureState::Rotating { gesture, .. } => Some(gesture),
        }
    }

    /// History action recorded when this gesture commits.
    pub fn action_kind(&self) -> Option<ActionKind> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { .. } => Some(ActionKind::Move),
            GestureState::Resizing { .. } => Some(ActionKind::Resize),
            GestureState::Rotating { .. } => Some(ActionKind::Rotate),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging { .. } => "dragging",
            GestureState::Resizing { .. } => "resizing",
            GestureState::Rotating { .. } => "rotating",
        }
    }
}

/// An uncommitted, visual-only geometry override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePatch {
    pub element_id: ElementId,
    pub geometry: Geometry,
    /// Guides to draw while dragging.
    pub guides: Vec<Guide>,
}

/// Notification sent to live-patch subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum LivePatchEvent {
    Updated(LivePatch),
    /// The live patch is gone (committed or cancelled).
    Cleared,
}

/// Result of releasing a gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureOutcome {
    pub element_id: ElementId,
    pub kind: ActionKind,
    pub start: Geometry,
    pub end: Geometry,
}

impl GestureOutcome {
    /// Whether the release changed anything worth recording.
    pub fn changed(&self) -> bool {
        self.start != self.end
    }
}

/// The single interaction/editing session of an editor surface.
///
/// Owns the gesture state, the live patch, and the widget manager holding
/// selection, hover and the focused text element.
#[derive(Debug, Clone, Default)]
pub struct InteractionSession {
    state: GestureState,
    live: Option<LivePatch>,
    widgets: WidgetManager,
    clicks: ClickTracker,
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    /// Element under the active gesture.
    pub fn active_element(&self) -> Option<ElementId> {
        self.state.gesture().map(|g| g.element_id)
    }

    pub fn live_patch(&self) -> Option<&LivePatch> {
        self.live.as_ref()
    }

    pub fn widgets(&self) -> &WidgetManager {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetManager {
        &mut self.widgets
    }

    pub(crate) fn clicks_mut(&mut self) -> &mut ClickTracker {
        &mut self.clicks
    }

    fn enter(&mut self, state: GestureState) -> EditResult<()> {
        if self.is_active() {
            log::debug!("Rejected {} gesture: {} in progress", state.name(), self.state.name());
            return Err(EditError::GestureActive);
        }
        log::debug!("Gesture {} started", state.name());
        self.state = state;
        self.live = None;
        Ok(())
    }

    pub fn begin_drag(&mut self, element_id: ElementId, start: Geometry, origin: Point, guides: Vec<Guide>) -> EditResult<()> {
        self.enter(GestureState::Dragging {
            gesture: Gesture {
                element_id,
                start,
                origin,
            },
            guides,
        })
    }

    pub fn begin_resize(
        &mut self,
        element_id: ElementId,
        start: Geometry,
        handle: ResizeHandle,
        origin: Point,
    ) -> EditResult<()> {
        self.enter(GestureState::Resizing {
            gesture: Gesture {
                element_id,
                start,
                origin,
            },
            handle,
        })
    }

    pub fn begin_rotate(&mut self, element_id: ElementId, start: Geometry, origin: Point) -> EditResult<()> {
        let center = start.center();
        self.enter(GestureState::Rotating {
            gesture: Gesture {
                element_id,
                start,
                origin,
            },
            center,
        })
    }

    /// Recompute the live patch for a pointer position (slide units).
    ///
    /// `view_scale` converts the snap threshold from screen pixels. Returns
    /// `None` when idle.
    pub fn update(
        &mut self,
        pointer: Point,
        modifiers: Modifiers,
        config: &EditorConfig,
        view_scale: f64,
    ) -> Option<&LivePatch> {
        let (element_id, geometry, guides) = match &self.state {
            GestureState::Idle => return None,
            GestureState::Dragging { gesture, guides } => {
                let delta = pointer - gesture.origin;
                let bound = config.clamp_to_canvas.then_some(Point::ZERO);
                let mut moved = geometry::move_element(&gesture.start, delta.x, delta.y, bound);
                let mut active_guides = Vec::new();
                if config.snapping_enabled && !modifiers.alt {
                    let threshold = snap::threshold_in_slide_units(config.snap_threshold, view_scale);
                    let snapped = snap::snap_geometry(&moved, guides, threshold);
                    active_guides = snapped.active_guides();
                    moved = snapped.geometry;
                    if let Some(bound) = bound {
                        moved.x = moved.x.max(bound.x);
                        moved.y = moved.y.max(bound.y);
                    }
                }
                (gesture.element_id, moved, active_guides)
            }
            GestureState::Resizing { gesture, handle } => {
                let delta = pointer - gesture.origin;
                let resized = geometry::resize(
                    &gesture.start,
                    *handle,
                    delta.x,
                    delta.y,
                    modifiers.shift,
                    SizeFloor::from(config),
                );
                (gesture.element_id, resized, Vec::new())
            }
            GestureState::Rotating { gesture, center } => {
                let rotated = geometry::rotate_around(
                    &gesture.start,
                    *center,
                    gesture.origin,
                    pointer,
                    modifiers.shift,
                    RotationSnap::from(config),
                );
                (gesture.element_id, rotated, Vec::new())
            }
        };

        self.live = Some(LivePatch {
            element_id,
            geometry,
            guides,
        });
        self.live.as_ref()
    }

    /// End the gesture. The outcome carries the final geometry to commit.
    pub fn finish(&mut self) -> EditResult<GestureOutcome> {
        let state = std::mem::take(&mut self.state);
        let live = self.live.take();
        let kind = state.action_kind().ok_or(EditError::NoActiveGesture)?;
        let Some(gesture) = state.gesture() else {
            return Err(EditError::NoActiveGesture);
        };
        let end = live.map_or(gesture.start, |p| p.geometry);
        log::debug!("Gesture {} finished", state.name());
        Ok(GestureOutcome {
            element_id: gesture.element_id,
            kind,
            start: gesture.start,
            end,
        })
    }

    /// Abandon the gesture, returning the element and its pre-gesture geometry.
    /// Safe to call at any time.
    pub fn cancel(&mut self) -> Option<(ElementId, Geometry)> {
        let state = std::mem::take(&mut self.state);
        self.live = None;
        let gesture = state.gesture()?;
        log::debug!("Gesture {} cancelled", state.name());
        Some((gesture.element_id, gesture.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::collect_guides;
    use uuid::Uuid;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    #[test]
    fn test_second_gesture_rejected() {
        let mut session = InteractionSession::new();
        let geom = Geometry::new(0.0, 0.0, 50.0, 50.0);
        session.begin_drag(Uuid::new_v4(), geom, Point::ZERO, Vec::new()).unwrap();
        let err = session.begin_rotate(Uuid::new_v4(), geom, Point::ZERO).unwrap_err();
        assert!(matches!(err, EditError::GestureActive));
        assert!(matches!(session.state(), GestureState::Dragging { .. }));
    }

    #[test]
    fn test_drag_snaps_to_sibling() {
        let mut session = InteractionSession::new();
        let id = Uuid::new_v4();
        let start = Geometry::new(100.0, 100.0, 200.0, 50.0);
        let sibling = Geometry::new(150.0, 300.0, 80.0, 80.0);
        let guides = collect_guides(config().slide_size(), [(Uuid::new_v4(), &sibling)]);
        session.begin_drag(id, start, Point::new(120.0, 110.0), guides).unwrap();
        let patch = session
            .update(Point::new(167.0, 110.0), Modifiers::NONE, &config(), 1.0)
            .unwrap();
        assert_eq!(patch.geometry.x, 150.0);
        assert_eq!(patch.guides.len(), 1);

        let outcome = session.finish().unwrap();
        assert_eq!(outcome.kind, ActionKind::Move);
        assert_eq!(outcome.end.x, 150.0);
        assert!(session.live_patch().is_none());
        assert!(session.state().is_idle());
    }

    #[test]
    fn test_alt_disables_snapping() {
        let mut session = InteractionSession::new();
        let start = Geometry::new(100.0, 100.0, 200.0, 50.0);
        let guides = collect_guides(config().slide_size(), std::iter::empty());
        session.begin_drag(Uuid::new_v4(), start, Point::ZERO, guides).unwrap();
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        let patch = session.update(Point::new(-97.0, 0.0), alt, &config(), 1.0).unwrap();
        assert_eq!(patch.geometry.x, 3.0);
    }

    #[test]
    fn test_snap_threshold_scales_with_view() {
        let mut session = InteractionSession::new();
        let start = Geometry::new(100.0, 100.0, 200.0, 50.0);
        let guides = collect_guides(config().slide_size(), std::iter::empty());
        session.begin_drag(Uuid::new_v4(), start, Point::ZERO, guides).unwrap();
        // 6 units from the canvas edge: within 8px at scale 1, outside at scale 2.
        let patch = session.update(Point::new(-94.0, 0.0), Modifiers::NONE, &config(), 2.0).unwrap();
        assert_eq!(patch.geometry.x, 6.0);
        let patch = session.update(Point::new(-94.0, 0.0), Modifiers::NONE, &config(), 1.0).unwrap();
        assert_eq!(patch.geometry.x, 0.0);
    }

    #[test]
    fn test_rotate_commits_snapped_angle() {
        let mut session = InteractionSession::new();
        let start = Geometry::new(0.0, 0.0, 100.0, 100.0);
        session.begin_rotate(Uuid::new_v4(), start, Point::new(100.0, 50.0)).unwrap();
        let a = 43.0_f64.to_radians();
        let pointer = Point::new(50.0 + 50.0 * a.cos(), 50.0 + 50.0 * a.sin());
        session.update(pointer, Modifiers::NONE, &config(), 1.0);
        let outcome = session.finish().unwrap();
        assert_eq!(outcome.kind, ActionKind::Rotate);
        assert!((outcome.end.rotation - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_shift_locks_aspect() {
        let mut session = InteractionSession::new();
        let start = Geometry::new(0.0, 0.0, 200.0, 100.0);
        session
            .begin_resize(Uuid::new_v4(), start, ResizeHandle::Se, Point::new(200.0, 100.0))
            .unwrap();
        let patch = session
            .update(Point::new(400.0, 110.0), Modifiers::SHIFT, &config(), 1.0)
            .unwrap();
        assert!((patch.geometry.width - 400.0).abs() < 1e-9);
        assert!((patch.geometry.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_restores_start() {
        let mut session = InteractionSession::new();
        let id = Uuid::new_v4();
        let start = Geometry::new(10.0, 10.0, 50.0, 50.0);
        session.begin_drag(id, start, Point::ZERO, Vec::new()).unwrap();
        session.update(Point::new(30.0, 30.0), Modifiers::NONE, &config(), 1.0);
        assert_eq!(session.cancel(), Some((id, start)));
        assert!(session.live_patch().is_none());
        assert_eq!(session.cancel(), None);
    }

    #[test]
    fn test_finish_without_move_is_unchanged() {
        let mut session = InteractionSession::new();
        let start = Geometry::new(10.0, 10.0, 50.0, 50.0);
        session.begin_drag(Uuid::new_v4(), start, Point::ZERO, Vec::new()).unwrap();
        let outcome = session.finish().unwrap();
        assert!(!outcome.changed());
    }

    #[test]
    fn test_finish_when_idle() {
        let mut session = InteractionSession::new();
        assert!(matches!(session.finish(), Err(EditError::NoActiveGesture)));
        assert!(session.update(Point::ZERO, Modifiers::NONE, &config(), 1.0).is_none());
    }
}
