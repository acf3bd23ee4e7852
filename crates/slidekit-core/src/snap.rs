//! Snap guides for aligning a moving element with the slide and its siblings.

use crate::elements::{ElementId, Geometry};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A vertical line at some x; snaps horizontal position.
    Vertical,
    /// A horizontal line at some y; snaps vertical position.
    Horizontal,
}

/// Which feature of the source produced the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAnchor {
    /// Left or top edge.
    Start,
    Center,
    /// Right or bottom edge.
    End,
}

/// Where a guide came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum GuideSource {
    Canvas,
    Element(ElementId),
}

/// A candidate alignment line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal guides.
    pub position: f64,
    pub anchor: GuideAnchor,
    pub source: GuideSource,
}

/// Which edge of the moving element aligned with a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Leading,
    Trailing,
    Center,
}

const ALIGNMENT_ORDER: [Alignment; 3] = [Alignment::Leading, Alignment::Trailing, Alignment::Center];

/// The winning snap on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSnap {
    pub guide: Guide,
    pub alignment: Alignment,
    /// Adjustment to add to the element position on this axis.
    pub delta: f64,
}

/// Result of snapping a moving element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The adjusted geometry.
    pub geometry: Geometry,
    pub x: Option<AxisSnap>,
    pub y: Option<AxisSnap>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(geometry: Geometry) -> Self {
        Self {
            geometry,
            x: None,
            y: None,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    /// Guides to display for this snap.
    pub fn active_guides(&self) -> Vec<Guide> {
        self.x.iter().chain(self.y.iter()).map(|s| s.guide).collect()
    }
}

/// Convert a screen-pixel threshold to slide units at the given view scale.
pub fn threshold_in_slide_units(threshold_px: f64, view_scale: f64) -> f64 {
    if view_scale.is_finite() && view_scale > 0.0 {
        threshold_px / view_scale
    } else {
        threshold_px
    }
}

fn push_rect_guides(guides: &mut Vec<Guide>, rect: Rect, source: GuideSource) {
    let vertical = [
        (rect.x0, GuideAnchor::Start),
        ((rect.x0 + rect.x1) / 2.0, GuideAnchor::Center),
        (rect.x1, GuideAnchor::End),
    ];
    let horizontal = [
        (rect.y0, GuideAnchor::Start),
        ((rect.y0 + rect.y1) / 2.0, GuideAnchor::Center),
        (rect.y1, GuideAnchor::End),
    ];
    for (position, anchor) in vertical {
        guides.push(Guide {
            axis: GuideAxis::Vertical,
            position,
            anchor,
            source,
        });
    }
    for (position, anchor) in horizontal {
        guides.push(Guide {
            axis: GuideAxis::Horizontal,
            position,
            anchor,
            source,
        });
    }
}

/// Collect guides in scan order: canvas first, then siblings in document order.
///
/// Rotated siblings contribute their axis-aligned bounding box.
pub fn collect_guides<'a, I>(canvas: Size, siblings: I) -> Vec<Guide>
where
    I: IntoIterator<Item = (ElementId, &'a Geometry)>,
{
    let mut guides = Vec::new();
    push_rect_guides(&mut guides, canvas.to_rect(), GuideSource::Canvas);
    for (id, geometry) in siblings {
        if geometry.is_finite() {
            push_rect_guides(&mut guides, geometry.bounding_box(), GuideSource::Element(id));
        }
    }
    guides
}

fn snap_axis(lead: f64, trail: f64, guides: &[Guide], axis: GuideAxis, threshold: f64) -> Option<AxisSnap> {
    let center = (lead + trail) / 2.0;
    let mut best: Option<(f64, AxisSnap)> = None;
    for guide in guides.iter().filter(|g| g.axis == axis) {
        for alignment in ALIGNMENT_ORDER {
            let edge = match alignment {
                Alignment::Leading => lead,
                Alignment::Trailing => trail,
                Alignment::Center => center,
            };
            let delta = guide.position - edge;
            let distance = delta.abs();
            if distance >= threshold {
                continue;
            }
            // Strictly smaller wins, so the first examined candidate keeps ties.
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((
                    distance,
                    AxisSnap {
                        guide: *guide,
                        alignment,
                        delta,
                    },
                ));
            }
        }
    }
    best.map(|(_, snap)| snap)
}

/// Snap the moving element to the nearest guide on each axis independently.
pub fn snap_geometry(moving: &Geometry, guides: &[Guide], threshold: f64) -> SnapResult {
    if !moving.is_finite() || threshold.is_nan() || threshold <= 0.0 {
        return SnapResult::none(*moving);
    }
    let bounds = moving.bounding_box();
    let x = snap_axis(bounds.x0, bounds.x1, guides, GuideAxis::Vertical, threshold);
    let y = snap_axis(bounds.y0, bounds.y1, guides, GuideAxis::Horizontal, threshold);

    let mut geometry = *moving;
    if let Some(snap) = x {
        geometry.x += snap.delta;
    }
    if let Some(snap) = y {
        geometry.y += snap.delta;
    }
    SnapResult { geometry, x, y }
}
