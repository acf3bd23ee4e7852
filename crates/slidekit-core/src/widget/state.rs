//! Widget state definitions.

/// The UI state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Normal display state - no interaction.
    #[default]
    Normal,
    /// Pointer is hovering over the element.
    Hovered,
    /// Element is selected (shows handles, can be moved/resized).
    Selected,
    /// Element has keyboard focus for content editing.
    Editing(EditingKind),
}

impl WidgetState {
    /// Check if the element is selected (either just selected or editing).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing(_))
    }

    /// Check if the element is in editing mode.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

/// Kind of editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingKind {
    /// Editing the text of a text element.
    Text,
    /// Editing a single table cell.
    TableCell { row: usize, col: usize },
}
