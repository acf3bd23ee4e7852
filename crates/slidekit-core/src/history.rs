//! Branching undo/redo log of whole-document snapshots.
//!
//! The log is a flat list plus a cursor. `None` means "before the first
//! entry", in which case the baseline snapshot is current. Committing after
//! an undo drops every entry past the cursor.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Semantic type of a recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    Move,
    Resize,
    Rotate,
    Reorder,
    Slide,
    Asset,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Create => "Create",
            ActionKind::Update => "Update",
            ActionKind::Delete => "Delete",
            ActionKind::Move => "Move",
            ActionKind::Resize => "Resize",
            ActionKind::Rotate => "Rotate",
            ActionKind::Reorder => "Reorder",
            ActionKind::Slide => "Slide",
            ActionKind::Asset => "Asset",
        }
    }
}

/// One recorded action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry<S> {
    pub id: Uuid,
    pub kind: ActionKind,
    pub description: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Document state after the action.
    pub snapshot: S,
    /// Slide that was active after the action.
    pub active_slide: usize,
}

/// Lightweight view of an entry for a history browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub id: Uuid,
    pub kind: ActionKind,
    pub description: String,
    pub timestamp: u64,
    pub is_current: bool,
}

/// Bounded undo/redo log.
#[derive(Debug, Clone)]
pub struct History<S> {
    baseline: S,
    baseline_slide: usize,
    entries: VecDeque<HistoryEntry<S>>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<S: Clone> History<S> {
    /// Create an empty log whose pre-history state is `baseline`.
    pub fn new(baseline: S, active_slide: usize, capacity: usize) -> Self {
        Self {
            baseline,
            baseline_slide: active_slide,
            entries: VecDeque::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Record an action. Redo entries are discarded and the oldest entry is
    /// evicted once capacity is exceeded.
    pub fn commit(&mut self, kind: ActionKind, description: impl Into<String>, snapshot: S, active_slide: usize) -> Uuid {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            log::debug!("Discarding {} redo entries", self.entries.len() - keep);
            self.entries.truncate(keep);
        }

        let id = Uuid::new_v4();
        self.entries.push_back(HistoryEntry {
            id,
            kind,
            description: description.into(),
            timestamp: now_millis(),
            snapshot,
            active_slide,
        });

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                self.baseline = evicted.snapshot;
                self.baseline_slide = evicted.active_slide;
            }
        }
        self.cursor = Some(self.entries.len() - 1);
        id
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(c) => c + 1 < self.entries.len(),
            None => !self.entries.is_empty(),
        }
    }

    /// Move the cursor back one entry. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.cursor {
            Some(0) => self.cursor = None,
            Some(c) => self.cursor = Some(c - 1),
            None => return false,
        }
        true
    }

    /// Move the cursor forward one entry. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor = Some(self.cursor.map_or(0, |c| c + 1));
        true
    }

    /// Snapshot and active slide at the cursor.
    pub fn current(&self) -> (&S, usize) {
        match self.cursor.and_then(|c| self.entries.get(c)) {
            Some(entry) => (&entry.snapshot, entry.active_slide),
            None => (&self.baseline, self.baseline_slide),
        }
    }

    /// Index of the current entry, `None` before the first entry.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entry(&self, index: usize) -> Option<&HistoryEntry<S>> {
        self.entries.get(index)
    }

    /// Description of the action `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .map(|e| e.description.as_str())
    }

    /// Description of the action `redo` would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.entries.get(next).map(|e| e.description.as_str())
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<HistorySummary> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, e)| HistorySummary {
                id: e.id,
                kind: e.kind,
                description: e.description.clone(),
                timestamp: e.timestamp,
                is_current: self.cursor == Some(i),
            })
            .collect()
    }

    /// Drop every entry and start over from `baseline`.
    pub fn reset(&mut self, baseline: S, active_slide: usize) {
        self.baseline = baseline;
        self.baseline_slide = active_slide;
        self.entries.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(n: usize, capacity: usize) -> History<Vec<i32>> {
        let mut history = History::new(Vec::new(), 0, capacity);
        let mut doc = Vec::new();
        for i in 0..n {
            doc.push(i as i32);
            history.commit(ActionKind::Update, format!("edit {i}"), doc.clone(), 0);
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let mut history: History<i32> = History::new(7, 0, 10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(history.current(), (&7, 0));
    }

    #[test]
    fn test_undo_to_baseline() {
        let mut history = history_with(2, 10);
        assert!(history.undo());
        assert!(history.undo());
        assert_eq!(history.cursor(), None);
        assert_eq!(history.current().0, &Vec::<i32>::new());
        assert!(history.can_redo());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_round_trip_law() {
        let n = 6;
        let mut history = history_with(n, 50);
        let after_n = history.current().0.clone();
        for _ in 0..n {
            assert!(history.undo());
        }
        for _ in 0..n {
            assert!(history.redo());
        }
        assert_eq!(history.current().0, &after_n);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_branch_truncation() {
        let mut history = history_with(5, 50);
        for _ in 0..3 {
            history.undo();
        }
        history.commit(ActionKind::Create, "new edit", vec![42], 0);
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), Some("new edit"));
        assert_eq!(history.entry(1).map(|e| e.description.as_str()), Some("edit 1"));
    }

    #[test]
    fn test_capacity_eviction_moves_baseline() {
        let mut history = history_with(5, 3);
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        for _ in 0..3 {
            assert!(history.undo());
        }
        assert!(!history.undo());
        // Baseline is the snapshot of the last evicted entry.
        assert_eq!(history.current().0, &vec![0, 1]);
    }

    #[test]
    fn test_descriptions() {
        let mut history = history_with(2, 10);
        assert_eq!(history.undo_description(), Some("edit 1"));
        assert_eq!(history.redo_description(), None);
        history.undo();
        assert_eq!(history.undo_description(), Some("edit 0"));
        assert_eq!(history.redo_description(), Some("edit 1"));
    }

    #[test]
    fn test_recent_limit() {
        let mut history = history_with(5, 50);
        history.undo();
        let recent = history.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].description, "edit 2");
        assert!(recent[1].is_current);
        assert!(!recent[2].is_current);
    }
}
