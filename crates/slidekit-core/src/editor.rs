//! The editor: deck, history and interaction session behind one facade.
//!
//! Every mutation, whether it comes from a gesture, a property panel or an
//! async completion, goes through [`Editor::commit`] and becomes one history
//! entry.

use crate::config::EditorConfig;
use crate::document::{Background, Deck, Slide};
use crate::elements::{AssetState, ElementContent, ElementId, ElementKind, ElementPatch, Geometry, SlideElement};
use crate::error::{EditError, EditResult};
use crate::geometry::ResizeHandle;
use crate::history::{ActionKind, History, HistorySummary};
use crate::input::{InputEvent, InputQueue, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::interaction::{InteractionSession, LivePatch, LivePatchEvent};
use crate::selection::{HandleKind, hit_test_handles};
use crate::snap::collect_guides;
use crate::theme::ThemeTable;
use crate::viewport::Viewport;
use crate::widget::{EditingKind, WidgetManager};
use kurbo::{Point, Vec2};

/// Handle returned by [`Editor::subscribe_live`].
pub type SubscriptionId = u64;

type LiveCallback = Box<dyn FnMut(&LivePatchEvent)>;

/// Outcome of an asynchronous asset load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetLoad {
    Loaded { width: u32, height: u32 },
    Failed,
}

/// Offset applied to duplicated elements.
const DUPLICATE_OFFSET: f64 = 10.0;

pub struct Editor {
    config: EditorConfig,
    deck: Deck,
    active_slide: usize,
    history: History<Deck>,
    session: InteractionSession,
    viewport: Viewport,
    input: InputQueue,
    themes: ThemeTable,
    subscribers: Vec<(SubscriptionId, LiveCallback)>,
    next_subscription: SubscriptionId,
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty single-slide deck.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_deck(Deck::default(), config)
    }

    pub fn with_deck(mut deck: Deck, config: EditorConfig) -> Self {
        normalize(&mut deck);
        let history = History::new(deck.clone(), 0, config.history_capacity);
        Self {
            config,
            deck,
            active_slide: 0,
            history,
            session: InteractionSession::new(),
            viewport: Viewport::default(),
            input: InputQueue::new(),
            themes: ThemeTable::builtin(),
            subscribers: Vec::new(),
            next_subscription: 0,
            revision: 0,
        }
    }

    /// Replace the document, discarding history and session state.
    pub fn load_deck(&mut self, mut deck: Deck) {
        normalize(&mut deck);
        self.cancel_gesture();
        self.session.widgets_mut().reset();
        self.deck = deck;
        self.active_slide = 0;
        self.history.reset(self.deck.clone(), 0);
        self.revision += 1;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn active_slide_index(&self) -> usize {
        self.active_slide
    }

    pub fn active_slide(&self) -> &Slide {
        // Decks are normalized on entry and the last slide cannot be removed.
        let index = self.active_slide.min(self.deck.len().saturating_sub(1));
        &self.deck.slides[index]
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn widgets(&self) -> &WidgetManager {
        self.session.widgets()
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetManager {
        self.session.widgets_mut()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn themes(&self) -> &ThemeTable {
        &self.themes
    }

    pub fn set_themes(&mut self, themes: ThemeTable) {
        self.themes = themes;
    }

    /// Bumped on every commit, undo and redo.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn element(&self, id: ElementId) -> Option<&SlideElement> {
        self.active_slide().element(id)
    }

    /// Slide index holding `id`, checking the active slide first.
    fn locate(&self, id: ElementId) -> Option<usize> {
        if self.active_slide().contains(id) {
            return Some(self.active_slide);
        }
        self.deck.slides.iter().position(|s| s.contains(id))
    }

    fn commit(&mut self, kind: ActionKind, description: String) {
        self.deck.touch();
        log::info!("{description}");
        self.history
            .commit(kind, description, self.deck.clone(), self.active_slide);
        self.revision += 1;
    }

    // --- element mutations ---

    /// Insert a new element on the active slide above everything else.
    pub fn add_element(&mut self, mut element: SlideElement) -> EditResult<ElementId> {
        let index = self.active_slide;
        let len = self.deck.len();
        let slide = self
            .deck
            .slide_mut(index)
            .ok_or(EditError::SlideOutOfRange { index, len })?;
        element.z_index = Some(slide.next_z_index());
        let id = element.id();
        let kind = element.kind();
        slide.insert(element)?;
        self.commit(ActionKind::Create, format!("Add {}", kind.name()));
        Ok(id)
    }

    /// Insert a copy of `element` with a fresh id.
    pub fn paste_element(&mut self, mut element: SlideElement) -> EditResult<ElementId> {
        element.regenerate_id();
        self.add_element(element)
    }

    /// Copy an element of the active slide, slightly offset.
    pub fn duplicate_element(&mut self, id: ElementId) -> EditResult<Option<ElementId>> {
        let Some(mut copy) = self.element(id).cloned() else {
            log::debug!("Duplicate of missing element {id} ignored");
            return Ok(None);
        };
        copy.geometry.x += DUPLICATE_OFFSET;
        copy.geometry.y += DUPLICATE_OFFSET;
        self.paste_element(copy).map(Some)
    }

    /// Apply a partial update. Missing ids and no-op patches change nothing
    /// and return false.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.update_element_as(id, patch, ActionKind::Update)
    }

    fn update_element_as(&mut self, id: ElementId, patch: &ElementPatch, kind: ActionKind) -> bool {
        let Some(index) = self.locate(id) else {
            log::debug!("Update for missing element {id} ignored");
            return false;
        };
        let Some(slide) = self.deck.slide(index) else {
            return false;
        };
        let Some(current) = slide.element(id) else {
            return false;
        };
        let mut updated = current.clone();
        updated.apply_patch(patch);
        if patch.width.is_some() {
            updated.geometry.width = updated.geometry.width.max(self.config.min_width);
        }
        if patch.height.is_some() {
            updated.geometry.height = updated.geometry.height.max(self.config.min_height);
        }
        if updated == *current {
            return false;
        }
        let element_kind = updated.kind();
        if let Some(target) = self.deck.slide_mut(index).and_then(|s| s.element_mut(id)) {
            *target = updated;
        }
        self.commit(kind, describe(kind, element_kind));
        true
    }

    /// Remove an element. Cancels a gesture on it and drops it from the selection.
    pub fn delete_element(&mut self, id: ElementId) -> bool {
        let Some(index) = self.locate(id) else {
            log::debug!("Delete of missing element {id} ignored");
            return false;
        };
        if self.session.active_element() == Some(id) {
            self.cancel_gesture();
        }
        let Some(removed) = self.deck.slide_mut(index).and_then(|s| s.remove(id)) else {
            return false;
        };
        self.session.widgets_mut().remove(id);
        self.commit(ActionKind::Delete, format!("Delete {}", removed.kind().name()));
        true
    }

    /// Delete every selected element as one history entry.
    pub fn delete_selected(&mut self) -> usize {
        let selected: Vec<ElementId> = self.widgets().selected().iter().copied().collect();
        if selected.is_empty() {
            return 0;
        }
        if self.session.active_element().is_some_and(|id| selected.contains(&id)) {
            self.cancel_gesture();
        }
        let index = self.active_slide;
        let mut removed = 0;
        if let Some(slide) = self.deck.slide_mut(index) {
            for id in &selected {
                if slide.remove(*id).is_some() {
                    removed += 1;
                }
            }
        }
        for id in selected {
            self.session.widgets_mut().remove(id);
        }
        if removed > 0 {
            let noun = if removed == 1 { "element" } else { "elements" };
            self.commit(ActionKind::Delete, format!("Delete {removed} {noun}"));
        }
        removed
    }

    /// Record the outcome of an async image load. A result for an element
    /// that no longer exists is dropped silently.
    pub fn complete_asset_load(&mut self, id: ElementId, load: AssetLoad) -> bool {
        let Some(element) = self.locate(id).and_then(|i| self.deck.slide(i)).and_then(|s| s.element(id)) else {
            log::debug!("Asset load for deleted element {id} dropped");
            return false;
        };
        let ElementContent::Image(image) = &element.content else {
            return false;
        };
        let mut image = image.clone();
        image.state = match load {
            AssetLoad::Loaded { width, height } => AssetState::Loaded { width, height },
            AssetLoad::Failed => {
                log::warn!("Image for element {id} failed to load; showing placeholder");
                AssetState::Failed
            }
        };
        self.update_element_as(id, &ElementPatch::content(ElementContent::Image(image)), ActionKind::Asset)
    }

    // --- z-order ---

    fn reorder(&mut self, id: ElementId, description: &str, op: fn(&mut Slide, ElementId) -> bool) -> bool {
        let index = self.active_slide;
        let changed = self.deck.slide_mut(index).is_some_and(|s| op(s, id));
        if changed {
            self.commit(ActionKind::Reorder, description.to_string());
        }
        changed
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.reorder(id, "Bring to front", Slide::bring_to_front)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.reorder(id, "Send to back", Slide::send_to_back)
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.reorder(id, "Bring forward", Slide::bring_forward)
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.reorder(id, "Send backward", Slide::send_backward)
    }

    // --- slides ---

    /// Insert an empty slide after the active one and make it active.
    pub fn add_slide(&mut self) -> usize {
        self.cancel_gesture();
        let index = self.deck.insert_slide(self.active_slide + 1, Slide::new());
        self.switch_to(index);
        self.commit(ActionKind::Slide, "Add slide".to_string());
        index
    }

    pub fn remove_slide(&mut self, index: usize) -> EditResult<()> {
        self.cancel_gesture();
        self.deck.remove_slide(index)?;
        let active = if self.active_slide > index {
            self.active_slide - 1
        } else {
            self.active_slide.min(self.deck.len() - 1)
        };
        self.switch_to(active);
        self.commit(ActionKind::Slide, format!("Remove slide {}", index + 1));
        Ok(())
    }

    /// Navigate to another slide. Not recorded in history.
    pub fn set_active_slide(&mut self, index: usize) -> EditResult<()> {
        if index >= self.deck.len() {
            return Err(EditError::SlideOutOfRange {
                index,
                len: self.deck.len(),
            });
        }
        if index != self.active_slide {
            self.cancel_gesture();
            self.switch_to(index);
        }
        Ok(())
    }

    fn switch_to(&mut self, index: usize) {
        self.active_slide = index;
        self.session.widgets_mut().reset();
    }

    pub fn set_background(&mut self, index: usize, background: Background) -> EditResult<bool> {
        let len = self.deck.len();
        let slide = self
            .deck
            .slide_mut(index)
            .ok_or(EditError::SlideOutOfRange { index, len })?;
        if slide.background == background {
            return Ok(false);
        }
        slide.background = background;
        self.commit(ActionKind::Slide, "Change background".to_string());
        Ok(true)
    }

    // --- history ---

    /// Make the current document the history baseline, dropping every entry.
    pub fn reset_history(&mut self) {
        self.history.reset(self.deck.clone(), self.active_slide);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    /// Recent entries for a history browser, oldest first.
    pub fn history_entries(&self, limit: usize) -> Vec<HistorySummary> {
        self.history.recent(limit)
    }

    pub fn history(&self) -> &History<Deck> {
        &self.history
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        if !self.history.undo() {
            return false;
        }
        log::info!("Undo");
        self.restore_from_history();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        if !self.history.redo() {
            return false;
        }
        log::info!("Redo");
        self.restore_from_history();
        true
    }

    fn restore_from_history(&mut self) {
        let (snapshot, active) = self.history.current();
        self.deck = snapshot.clone();
        self.active_slide = active.min(self.deck.len().saturating_sub(1));
        if let Some(slide) = self.deck.slide(self.active_slide) {
            self.session.widgets_mut().retain(|id| slide.contains(id));
        }
        self.revision += 1;
    }

    // --- gestures ---

    fn slide_point(&self, screen: Point) -> Point {
        self.viewport.screen_to_slide(screen)
    }

    fn gesture_target(&self, id: ElementId) -> EditResult<Geometry> {
        self.element(id)
            .map(|e| e.geometry)
            .ok_or(EditError::ElementNotFound(id))
    }

    /// Start moving an element of the active slide. `pointer` is in screen coordinates.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point) -> EditResult<()> {
        let start = self.gesture_target(id)?;
        let guides = collect_guides(self.config.slide_size(), self.active_slide().siblings(id));
        let origin = self.slide_point(pointer);
        self.session.begin_drag(id, start, origin, guides)
    }

    pub fn begin_resize(&mut self, id: ElementId, handle: ResizeHandle, pointer: Point) -> EditResult<()> {
        let start = self.gesture_target(id)?;
        let origin = self.slide_point(pointer);
        self.session.begin_resize(id, start, handle, origin)
    }

    pub fn begin_rotate(&mut self, id: ElementId, pointer: Point) -> EditResult<()> {
        let start = self.gesture_target(id)?;
        let origin = self.slide_point(pointer);
        self.session.begin_rotate(id, start, origin)
    }

    /// Feed a pointer move into the active gesture and publish the live patch.
    pub fn pointer_move(&mut self, pointer: Point, modifiers: Modifiers) -> Option<LivePatch> {
        let point = self.slide_point(pointer);
        let patch = self
            .session
            .update(point, modifiers, &self.config, self.viewport.scale)?
            .clone();
        self.publish(LivePatchEvent::Updated(patch.clone()));
        Some(patch)
    }

    /// Release the active gesture, committing its final geometry. Returns
    /// whether a history entry was written.
    pub fn end_gesture(&mut self) -> EditResult<bool> {
        let outcome = self.session.finish()?;
        self.publish(LivePatchEvent::Cleared);
        if !outcome.changed() {
            log::debug!("Gesture on {} left geometry unchanged", outcome.element_id);
            return Ok(false);
        }
        Ok(self.update_element_as(outcome.element_id, &ElementPatch::geometry(outcome.end), outcome.kind))
    }

    /// Abandon the active gesture. Safe to call at any time.
    pub fn cancel_gesture(&mut self) -> bool {
        if self.session.cancel().is_some() {
            self.publish(LivePatchEvent::Cleared);
            true
        } else {
            false
        }
    }

    pub fn live_patch(&self) -> Option<&LivePatch> {
        self.session.live_patch()
    }

    /// Elements of the active slide with the live patch applied.
    pub fn render_elements(&self) -> Vec<SlideElement> {
        let mut elements = self.active_slide().elements.clone();
        if let Some(patch) = self.session.live_patch()
            && let Some(el) = elements.iter_mut().find(|e| e.id() == patch.element_id)
        {
            el.geometry = patch.geometry;
        }
        elements
    }

    // --- live patch subscription ---

    pub fn subscribe_live(&mut self, callback: impl FnMut(&LivePatchEvent) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe_live(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn publish(&mut self, event: LivePatchEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(&event);
        }
    }

    // --- host input ---

    /// Queue an event for the next [`flush_frame`](Self::flush_frame).
    pub fn queue_event(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Process queued input once per animation frame. Returns the number of
    /// events handled after coalescing.
    pub fn flush_frame(&mut self) -> usize {
        let events = self.input.drain();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Key(key) => self.handle_key(&key),
            InputEvent::Blur => self.blur(),
        }
    }

    /// Focus loss cancels any gesture in progress.
    pub fn blur(&mut self) {
        self.cancel_gesture();
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position, modifiers } => {
                if self.session.is_active() {
                    self.pointer_move(position, modifiers);
                } else {
                    let hovered = self.active_slide().hit_test(self.slide_point(position), 0.0);
                    self.session.widgets_mut().set_hovered(hovered);
                }
            }
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => {
                if self.session.is_active()
                    && let Err(err) = self.end_gesture()
                {
                    log::debug!("Pointer release: {err}");
                }
            }
            PointerEvent::Up { .. } => {}
            PointerEvent::Scroll { position, delta } => {
                let factor = if delta.y < 0.0 { 1.1 } else { 1.0 / 1.1 };
                self.viewport.zoom_at(position, factor);
            }
        }
    }

    fn pointer_down(&mut self, position: Point, modifiers: Modifiers) {
        if self.session.is_active() {
            log::debug!("Pointer press ignored: gesture in progress");
            return;
        }
        let point = self.slide_point(position);
        let double = self.session.clicks_mut().register(position);
        let tolerance = self.viewport.screen_distance(self.config.handle_tolerance);

        // Handles of a single selected element take priority.
        let selected: Vec<ElementId> = self.widgets().selected().iter().copied().collect();
        if let [id] = selected.as_slice()
            && let Some(element) = self.element(*id)
        {
            let offset = self.config.rotate_handle_offset;
            let result = match hit_test_handles(&element.geometry, point, tolerance, offset) {
                Some(HandleKind::Resize(handle)) => Some(self.begin_resize(*id, handle, position)),
                Some(HandleKind::Rotate) => Some(self.begin_rotate(*id, position)),
                None => None,
            };
            if let Some(result) = result {
                if let Err(err) = result {
                    log::debug!("Handle press: {err}");
                }
                return;
            }
        }

        let Some(id) = self.active_slide().hit_test(point, 0.0) else {
            self.session.widgets_mut().exit_editing();
            self.session.widgets_mut().clear_selection();
            return;
        };

        if double && let Some(kind) = self.editing_kind_at(id, point) {
            self.session.widgets_mut().select(id);
            self.session.widgets_mut().enter_editing(id, kind);
            return;
        }

        if modifiers.shift {
            self.session.widgets_mut().toggle_selection(id);
            return;
        }

        let widgets = self.session.widgets_mut();
        if widgets.focused().is_some_and(|focused| focused != id) {
            widgets.exit_editing();
        }
        if !widgets.is_selected(id) {
            widgets.select(id);
        }
        if !widgets.is_editing_element(id)
            && let Err(err) = self.begin_drag(id, position)
        {
            log::debug!("Drag press: {err}");
        }
    }

    /// What a double press on `id` at `point` starts editing, if anything.
    fn editing_kind_at(&self, id: ElementId, point: Point) -> Option<EditingKind> {
        let element = self.element(id)?;
        match &element.content {
            ElementContent::Text(_) => Some(EditingKind::Text),
            ElementContent::Table(table) if table.rows > 0 && table.cols > 0 => {
                let geom = &element.geometry;
                let local = geom.to_local(point) + Vec2::new(geom.width / 2.0, geom.height / 2.0);
                let col = ((local.x / geom.width) * table.cols as f64).floor().max(0.0) as usize;
                let row = ((local.y / geom.height) * table.rows as f64).floor().max(0.0) as usize;
                Some(EditingKind::TableCell {
                    row: row.min(table.rows - 1),
                    col: col.min(table.cols - 1),
                })
            }
            _ => None,
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        let KeyEvent::Pressed(key) = event else {
            return;
        };
        match key.as_str() {
            "Escape" => {
                if self.cancel_gesture() {
                    return;
                }
                let widgets = self.session.widgets_mut();
                if widgets.is_editing() {
                    widgets.exit_editing();
                } else {
                    widgets.clear_selection();
                }
            }
            "Delete" | "Backspace" if !self.widgets().is_editing() => {
                self.delete_selected();
            }
            _ => {}
        }
    }
}

/// Give an empty deck a slide and repeated element ids fresh ones.
fn normalize(deck: &mut Deck) {
    if deck.ensure_slide() {
        log::warn!("Deck '{}' has no slides; added an empty one", deck.title);
    }
    let changed = deck.regenerate_duplicate_ids();
    if changed > 0 {
        log::warn!("Deck '{}' had {changed} duplicate element ids; regenerated", deck.title);
    }
}

fn describe(action: ActionKind, kind: ElementKind) -> String {
    let verb = match action {
        ActionKind::Update => "Edit",
        ActionKind::Asset => "Load",
        other => other.label(),
    };
    format!("{verb} {}", kind.name())
}
