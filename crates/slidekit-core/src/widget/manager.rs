//! Widget manager for tracking UI state of elements.

use super::state::{EditingKind, WidgetState};
use crate::config::EditorConfig;
use crate::elements::{ElementId, Geometry};
use crate::selection::{Handle, get_handles};
use std::collections::{HashMap, HashSet};

/// Selection, hover and editing focus for the elements of the active slide.
///
/// The focused element is the one receiving keyboard input while editing
/// text. It is owned here rather than living in a global so the session can
/// restore it after undo or slide changes.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    states: HashMap<ElementId, WidgetState>,
    selected: HashSet<ElementId>,
    focused: Option<ElementId>,
    hovered: Option<ElementId>,
}

impl WidgetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of an element.
    pub fn state(&self, id: ElementId) -> WidgetState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// Set the state of an element.
    pub fn set_state(&mut self, id: ElementId, state: WidgetState) {
        if state.is_selected() {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }

        if state.is_editing() {
            self.focused = Some(id);
        } else if self.focused == Some(id) {
            self.focused = None;
        }

        if state == WidgetState::Normal {
            self.states.remove(&id);
        } else {
            self.states.insert(id, state);
        }
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> &HashSet<ElementId> {
        &self.selected
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// The element with keyboard focus, if any.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// What is being edited in the focused element.
    pub fn editing_kind(&self) -> Option<EditingKind> {
        match self.focused.map(|id| self.state(id)) {
            Some(WidgetState::Editing(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Set the hovered element.
    pub fn set_hovered(&mut self, id: Option<ElementId>) {
        if let Some(old_id) = self.hovered
            && Some(old_id) != id
            && self.state(old_id) == WidgetState::Hovered
        {
            self.states.remove(&old_id);
        }

        if let Some(new_id) = id
            && self.state(new_id) == WidgetState::Normal
        {
            self.states.insert(new_id, WidgetState::Hovered);
        }

        self.hovered = id;
    }

    /// Select a single element (clears other selections).
    pub fn select(&mut self, id: ElementId) {
        if self.selected.len() == 1 && self.is_selected(id) {
            return;
        }
        self.clear_selection();
        self.add_to_selection(id);
    }

    pub fn add_to_selection(&mut self, id: ElementId) {
        if !self.is_selected(id) {
            self.set_state(id, WidgetState::Selected);
        }
    }

    /// Add or remove an element (shift-click).
    pub fn toggle_selection(&mut self, id: ElementId) {
        if self.is_selected(id) {
            self.deselect(id);
        } else {
            self.add_to_selection(id);
        }
    }

    pub fn deselect(&mut self, id: ElementId) {
        if self.selected.contains(&id) {
            self.set_state(id, WidgetState::Normal);
        }
    }

    pub fn clear_selection(&mut self) {
        let selected: Vec<_> = self.selected.iter().copied().collect();
        for id in selected {
            self.set_state(id, WidgetState::Normal);
        }
    }

    /// Enter editing mode for an element. Any other element loses focus.
    pub fn enter_editing(&mut self, id: ElementId, kind: EditingKind) {
        if let Some(old_id) = self.focused
            && old_id != id
        {
            self.exit_editing();
        }
        self.set_state(id, WidgetState::Editing(kind));
    }

    /// Exit editing mode, leaving the element selected.
    pub fn exit_editing(&mut self) {
        if let Some(id) = self.focused {
            self.set_state(id, WidgetState::Selected);
        }
    }

    pub fn is_editing(&self) -> bool {
        self.focused.is_some()
    }

    pub fn is_editing_element(&self, id: ElementId) -> bool {
        self.focused == Some(id)
    }

    /// Remove state for a deleted element.
    pub fn remove(&mut self, id: ElementId) {
        self.states.remove(&id);
        self.selected.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    /// Drop state for elements that no longer exist (after undo or slide switch).
    pub fn retain(&mut self, mut exists: impl FnMut(ElementId) -> bool) {
        let stale: Vec<_> = self
            .states
            .keys()
            .chain(self.selected.iter())
            .chain(self.focused.iter())
            .chain(self.hovered.iter())
            .copied()
            .filter(|id| !exists(*id))
            .collect();
        for id in stale {
            self.remove(id);
        }
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Handles for an element, empty unless it is the only selected element.
    pub fn handles_for(&self, id: ElementId, geometry: &Geometry, config: &EditorConfig) -> Vec<Handle> {
        if self.selected.len() != 1 || !self.is_selected(id) {
            return Vec::new();
        }
        get_handles(geometry, config.rotate_handle_offset)
    }
}
