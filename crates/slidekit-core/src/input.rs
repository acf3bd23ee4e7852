//! Pointer and keyboard input delivered by the host UI layer.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Scroll { position, .. } => position,
        }
    }
}

/// Keyboard event type. Keys use their DOM `key` names ("Escape", "Delete").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Anything the host can feed into the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// The editor surface lost focus.
    Blur,
}

impl InputEvent {
    fn is_move(&self) -> bool {
        matches!(self, InputEvent::Pointer(PointerEvent::Move { .. }))
    }
}

/// Per-frame input queue.
///
/// A pointer-move replaces a pointer-move queued directly before it, so at
/// most one recomputation happens per run of moves. Other events are kept in
/// arrival order.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    coalesced: usize,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        if event.is_move()
            && let Some(last) = self.events.back_mut()
            && last.is_move()
        {
            *last = event;
            self.coalesced += 1;
            return;
        }
        self.events.push_back(event);
    }

    /// Take every queued event for this frame.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        if self.coalesced > 0 {
            log::trace!("Coalesced {} pointer moves this frame", self.coalesced);
            self.coalesced = 0;
        }
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double presses of the left button.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press; returns true if it completes a double press.
    pub fn register(&mut self, position: Point) -> bool {
        self.register_at(position, Instant::now())
    }

    pub fn register_at(&mut self, position: Point, now: Instant) -> bool {
        if let Some((last_time, last_pos)) = self.last_click
            && now.saturating_duration_since(last_time) < DOUBLE_CLICK_TIME
            && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE
        {
            // Reset so a triple press is not another double press.
            self.last_click = None;
            return true;
        }
        self.last_click = Some((now, position));
        false
    }

    pub fn reset(&mut self) {
        self.last_click = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(x: f64) -> InputEvent {
        InputEvent::Pointer(PointerEvent::Move {
            position: Point::new(x, 0.0),
            modifiers: Modifiers::NONE,
        })
    }

    fn down(x: f64) -> InputEvent {
        InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(x, 0.0),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        })
    }

    #[test]
    fn test_moves_coalesce_to_latest() {
        let mut queue = InputQueue::new();
        queue.push(mv(1.0));
        queue.push(mv(2.0));
        queue.push(mv(3.0));
        assert_eq!(queue.drain(), vec![mv(3.0)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_press_is_never_dropped() {
        let mut queue = InputQueue::new();
        queue.push(mv(1.0));
        queue.push(down(1.0));
        queue.push(mv(2.0));
        queue.push(mv(5.0));
        queue.push(InputEvent::Key(KeyEvent::Pressed("Escape".into())));
        queue.push(mv(6.0));
        assert_eq!(
            queue.drain(),
            vec![
                mv(1.0),
                down(1.0),
                mv(5.0),
                InputEvent::Key(KeyEvent::Pressed("Escape".into())),
                mv(6.0)
            ]
        );
    }

    #[test]
    fn test_double_click() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!clicks.register_at(Point::new(10.0, 10.0), t0));
        assert!(clicks.register_at(Point::new(11.0, 10.0), t0 + Duration::from_millis(200)));
        // Third press starts over.
        assert!(!clicks.register_at(Point::new(11.0, 10.0), t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_slow_or_far_click_is_single() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        clicks.register_at(Point::new(10.0, 10.0), t0);
        assert!(!clicks.register_at(Point::new(10.0, 10.0), t0 + Duration::from_millis(800)));
        assert!(!clicks.register_at(Point::new(40.0, 10.0), t0 + Duration::from_millis(900)));
    }
}
