//! Deck and slide documents.

use crate::elements::{ElementId, Geometry, SerializableColor, SlideElement};
use crate::error::{EditError, EditResult};
use crate::history::now_millis;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for slides.
pub type SlideId = Uuid;

/// A colour stop of a gradient background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    pub color: SerializableColor,
}

/// Slide background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Solid { color: SerializableColor },
    /// Linear gradient; `angle` in degrees, 0 runs left to right.
    Gradient { angle: f64, stops: Vec<GradientStop> },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid {
            color: SerializableColor::white(),
        }
    }
}

/// Presentation-only slide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideSettings {
    /// Advance automatically after this many milliseconds.
    pub advance_after_ms: Option<u64>,
    pub loop_presentation: bool,
    pub show_number: bool,
    pub hidden: bool,
}

/// An ordered list of elements plus background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub elements: Vec<SlideElement>,
    #[serde(default)]
    pub background: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SlideSettings>,
}

impl Default for Slide {
    fn default() -> Self {
        Self::new()
    }
}

impl Slide {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            elements: Vec::new(),
            background: Background::default(),
            settings: None,
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut SlideElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Highest effective zIndex, `None` for an empty slide.
    pub fn max_z(&self) -> Option<i32> {
        self.elements.iter().map(SlideElement::effective_z).max()
    }

    /// zIndex for a newly created element.
    pub fn next_z_index(&self) -> i32 {
        self.max_z().map_or(0, |z| z.saturating_add(1))
    }

    /// Append an element. Its id must not already be present.
    pub fn insert(&mut self, element: SlideElement) -> EditResult<()> {
        if self.contains(element.id()) {
            return Err(EditError::DuplicateElement(element.id()));
        }
        self.elements.push(element);
        Ok(())
    }

    pub fn remove(&mut self, id: ElementId) -> Option<SlideElement> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    /// Elements in paint order: zIndex ascending, ties in array order.
    pub fn paint_order(&self) -> Vec<&SlideElement> {
        let mut ordered: Vec<&SlideElement> = self.elements.iter().collect();
        // sort_by_key is stable, so equal zIndex keeps document order.
        ordered.sort_by_key(|e| e.effective_z());
        ordered
    }

    /// Topmost element under `point`. Exact reverse of paint order.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.geometry.contains(point, tolerance))
            .map(SlideElement::id)
    }

    /// Every element except `id`, in document order.
    pub fn siblings(&self, id: ElementId) -> impl Iterator<Item = (ElementId, &Geometry)> {
        self.elements
            .iter()
            .filter(move |e| e.id() != id)
            .map(|e| (e.id(), &e.geometry))
    }

    /// Put the element above everything else. Returns false if already on top.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(z) = self.element(id).map(SlideElement::effective_z) else {
            return false;
        };
        let others_max = self.elements.iter().filter(|e| e.id() != id).map(|e| e.effective_z()).max();
        match others_max {
            Some(max) if max >= z => {
                if let Some(el) = self.element_mut(id) {
                    el.z_index = Some(max.saturating_add(1));
                }
                true
            }
            _ => false,
        }
    }

    /// Put the element below everything else. Returns false if already at the bottom.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(z) = self.element(id).map(SlideElement::effective_z) else {
            return false;
        };
        let others_min = self.elements.iter().filter(|e| e.id() != id).map(|e| e.effective_z()).min();
        match others_min {
            Some(min) if min <= z => {
                if let Some(el) = self.element_mut(id) {
                    el.z_index = Some(min.saturating_sub(1));
                }
                true
            }
            _ => false,
        }
    }

    /// Swap one step up in paint order. zIndex values are renumbered densely.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.step(id, true)
    }

    /// Swap one step down in paint order. zIndex values are renumbered densely.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.step(id, false)
    }

    fn step(&mut self, id: ElementId, up: bool) -> bool {
        let mut order: Vec<ElementId> = self.paint_order().into_iter().map(SlideElement::id).collect();
        let Some(pos) = order.iter().position(|&e| e == id) else {
            return false;
        };
        let target = if up {
            if pos + 1 >= order.len() {
                return false;
            }
            pos + 1
        } else {
            if pos == 0 {
                return false;
            }
            pos - 1
        };
        order.swap(pos, target);
        for (z, element_id) in order.into_iter().enumerate() {
            if let Some(el) = self.element_mut(element_id) {
                el.z_index = Some(z as i32);
            }
        }
        true
    }
}

/// Slide aspect ratio, e.g. 16:9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self { width: 16, height: 9 }
    }
}

impl AspectRatio {
    pub fn ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// An ordered list of slides with metadata.
///
/// Slides are reference counted so history snapshots share every slide an
/// edit did not touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    pub slides: Vec<Arc<Slide>>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Deck {
    /// Create a deck with a single empty slide.
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            aspect_ratio: AspectRatio::default(),
            created_at: now,
            updated_at: now,
            slides: vec![Arc::new(Slide::new())],
        }
    }

    /// Parse a deck. Element ids must be unique across the whole deck.
    pub fn from_json(json: &str) -> EditResult<Self> {
        let mut deck: Deck = serde_json::from_str(json)?;
        deck.ensure_slide();
        if let Some(id) = deck.duplicate_element_id() {
            return Err(EditError::DuplicateElement(id));
        }
        Ok(deck)
    }

    /// Add an empty slide if the deck has none. Returns true if one was added.
    pub fn ensure_slide(&mut self) -> bool {
        if !self.slides.is_empty() {
            return false;
        }
        self.slides.push(Arc::new(Slide::new()));
        true
    }

    /// First element id that occurs more than once, in slide order.
    pub fn duplicate_element_id(&self) -> Option<ElementId> {
        let mut seen = HashSet::new();
        self.slides
            .iter()
            .flat_map(|slide| slide.elements.iter())
            .map(SlideElement::id)
            .find(|id| !seen.insert(*id))
    }

    /// Give every repeated element id a fresh one; the first occurrence keeps
    /// its id. Returns the number of elements changed.
    pub fn regenerate_duplicate_ids(&mut self) -> usize {
        if self.duplicate_element_id().is_none() {
            return 0;
        }
        let mut seen = HashSet::new();
        let mut changed = 0;
        for slide in &mut self.slides {
            for element in &mut Arc::make_mut(slide).elements {
                while !seen.insert(element.id()) {
                    element.regenerate_id();
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn to_json(&self) -> EditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index).map(Arc::as_ref)
    }

    /// Mutable access; clones the slide first if a snapshot shares it.
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index).map(Arc::make_mut)
    }

    /// Insert a slide at `index` (clamped to the end).
    pub fn insert_slide(&mut self, index: usize, slide: Slide) -> usize {
        let index = index.min(self.slides.len());
        self.slides.insert(index, Arc::new(slide));
        index
    }

    pub fn remove_slide(&mut self, index: usize) -> EditResult<Slide> {
        if index >= self.slides.len() {
            return Err(EditError::SlideOutOfRange {
                index,
                len: self.slides.len(),
            });
        }
        if self.slides.len() == 1 {
            return Err(EditError::LastSlide);
        }
        let slide = self.slides.remove(index);
        Ok(Arc::unwrap_or_clone(slide))
    }

    pub fn element_count(&self) -> usize {
        self.slides.iter().map(|s| s.len()).sum()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeKind;

    fn rect(x: f64, y: f64) -> SlideElement {
        SlideElement::shape(Geometry::new(x, y, 100.0, 100.0), ShapeKind::Rectangle)
    }

    #[test]
    fn test_paint_order_implicit_zero_and_stable_ties() {
        let mut slide = Slide::new();
        let a = rect(0.0, 0.0);
        let b = rect(0.0, 0.0).with_z_index(-1);
        let c = rect(0.0, 0.0).with_z_index(0);
        let d = rect(0.0, 0.0).with_z_index(3);
        let ids = [a.id(), b.id(), c.id(), d.id()];
        for el in [d, a, b, c] {
            slide.insert(el).unwrap();
        }
        let order: Vec<_> = slide.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_hit_test_reverse_paint_order() {
        let mut slide = Slide::new();
        let top = rect(0.0, 0.0).with_z_index(5);
        let bottom = rect(50.0, 50.0).with_z_index(1);
        let top_id = top.id();
        let bottom_id = bottom.id();
        slide.insert(top).unwrap();
        slide.insert(bottom).unwrap();
        assert_eq!(slide.hit_test(Point::new(75.0, 75.0), 0.0), Some(top_id));
        assert_eq!(slide.hit_test(Point::new(125.0, 125.0), 0.0), Some(bottom_id));
        assert_eq!(slide.hit_test(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut slide = Slide::new();
        let el = rect(0.0, 0.0);
        slide.insert(el.clone()).unwrap();
        assert!(matches!(slide.insert(el), Err(EditError::DuplicateElement(_))));
    }

    #[test]
    fn test_next_z_index() {
        let mut slide = Slide::new();
        assert_eq!(slide.next_z_index(), 0);
        slide.insert(rect(0.0, 0.0).with_z_index(4)).unwrap();
        slide.insert(rect(0.0, 0.0)).unwrap();
        assert_eq!(slide.next_z_index(), 5);
    }

    #[test]
    fn test_z_order_operations() {
        let mut slide = Slide::new();
        let els: Vec<_> = (0..3).map(|i| rect(0.0, 0.0).with_z_index(i)).collect();
        let ids: Vec<_> = els.iter().map(|e| e.id()).collect();
        for el in els {
            slide.insert(el).unwrap();
        }
        assert!(slide.bring_to_front(ids[0]));
        assert!(!slide.bring_to_front(ids[0]));
        let order: Vec<_> = slide.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);

        assert!(slide.send_backward(ids[0]));
        let order: Vec<_> = slide.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);

        assert!(slide.send_to_back(ids[2]));
        assert!(!slide.send_backward(ids[2]));
        let order: Vec<_> = slide.paint_order().iter().map(|e| e.id()).collect();
        assert_eq!(order[0], ids[2]);
    }

    #[test]
    fn test_remove_last_slide_rejected() {
        let mut deck = Deck::new("Test");
        assert!(matches!(deck.remove_slide(0), Err(EditError::LastSlide)));
        assert!(matches!(deck.remove_slide(3), Err(EditError::SlideOutOfRange { index: 3, len: 1 })));
        deck.insert_slide(10, Slide::new());
        assert_eq!(deck.len(), 2);
        assert!(deck.remove_slide(1).is_ok());
    }

    #[test]
    fn test_slide_mut_copy_on_write() {
        let mut deck = Deck::new("Test");
        let snapshot = deck.clone();
        deck.slide_mut(0).unwrap().insert(rect(0.0, 0.0)).unwrap();
        assert_eq!(snapshot.slide(0).unwrap().len(), 0);
        assert_eq!(deck.slide(0).unwrap().len(), 1);
    }

    #[test]
    fn test_deck_json() {
        let mut deck = Deck::new("Quarterly");
        deck.slide_mut(0).unwrap().insert(rect(10.0, 20.0)).unwrap();
        let json = deck.to_json().unwrap();
        let back = Deck::from_json(&json).unwrap();
        assert_eq!(back, deck);
    }

    #[test]
    fn test_from_json_without_slides_gets_one() {
        let mut deck = Deck::new("Empty");
        deck.slides.clear();
        let json = deck.to_json().unwrap();
        let back = Deck::from_json(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert!(back.slide(0).unwrap().is_empty());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let el = rect(0.0, 0.0);
        let id = el.id();
        let mut deck = Deck::new("Dupes");
        deck.slide_mut(0).unwrap().elements.push(el.clone());
        deck.insert_slide(1, Slide::new());
        deck.slide_mut(1).unwrap().elements.push(el);
        let json = deck.to_json().unwrap();
        assert!(matches!(
            Deck::from_json(&json),
            Err(EditError::DuplicateElement(dup)) if dup == id
        ));
    }

    #[test]
    fn test_regenerate_duplicate_ids() {
        let el = rect(0.0, 0.0);
        let id = el.id();
        let mut deck = Deck::new("Dupes");
        let slide = deck.slide_mut(0).unwrap();
        slide.elements.push(el.clone());
        slide.elements.push(el);
        assert_eq!(deck.regenerate_duplicate_ids(), 1);
        assert_eq!(deck.duplicate_element_id(), None);
        let slide = deck.slide(0).unwrap();
        assert_eq!(slide.elements[0].id(), id);
        assert_ne!(slide.elements[1].id(), id);
        assert_eq!(deck.regenerate_duplicate_ids(), 0);
    }
}
