//! Alignment and magnetic snapping for an element being moved.
//!
//! Each axis is solved independently. Candidate positions come from the
//! canvas center and from every sibling (start-start, end-end, center-center,
//! and the two edge-touch placements). Candidates farther than the threshold
//! are ignored; the closest remaining one wins, with center alignments
//! preferred on exact ties and earlier candidates preferred after that.
//!
//! The whole pass is O(siblings) and allocates nothing beyond the caller's
//! guide buffer, which holds at most one guide per axis.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::doc::ElementId;
use crate::geom::{Rect, clamp_origin};

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A vertical line at some x; produced by horizontal alignment.
    Vertical,
    /// A horizontal line at some y; produced by vertical alignment.
    Horizontal,
}

/// What a guide aligns against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "id")]
pub enum GuideSource {
    Element(ElementId),
    CanvasCenter,
}

/// Transient visual feedback for an active snap. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuide {
    pub axis: GuideAxis,
    /// Canvas coordinate of the line (x for vertical, y for horizontal).
    pub position: f64,
    pub source: GuideSource,
}

/// Result of one snap pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    pub x: f64,
    pub y: f64,
    pub guides: Vec<AlignmentGuide>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Origin coordinate the moving box would take.
    target: f64,
    distance: f64,
    /// Where the guide line is drawn.
    line: f64,
    center: bool,
    source: GuideSource,
}

/// Closest in-threshold candidate seen so far on one axis.
struct AxisSnap {
    origin: f64,
    extent: f64,
    threshold: f64,
    best: Option<Candidate>,
}

impl AxisSnap {
    fn new(origin: f64, extent: f64, threshold: f64) -> Self {
        Self { origin, extent, threshold, best: None }
    }

    fn offer(&mut self, target: f64, line: f64, center: bool, source: GuideSource) {
        let distance = (target - self.origin).abs();
        if distance > self.threshold {
            return;
        }
        let better = match self.best {
            None => true,
            Some(best) => distance < best.distance || (distance == best.distance && center && !best.center),
        };
        if better {
            self.best = Some(Candidate { target, distance, line, center, source });
        }
    }

    /// Align against the midpoint of a `[0, span]` frame.
    fn offer_frame_center(&mut self, span: f64) {
        let mid = span / 2.0;
        self.offer(mid - self.extent / 2.0, mid, true, GuideSource::CanvasCenter);
    }

    /// Align against a sibling occupying `[start, start + len]` on this axis.
    fn offer_sibling(&mut self, start: f64, len: f64, source: GuideSource) {
        let end = start + len;
        let mid = start + len / 2.0;
        let ext = self.extent;
        self.offer(start, start, false, source);
        self.offer(end - ext, end, false, source);
        self.offer(mid - ext / 2.0, mid, true, source);
        self.offer(start - ext, start, false, source);
        self.offer(end, end, false, source);
    }

    /// Snapped and clamped origin, plus the guide if the snap survived clamping.
    fn resolve(&self, bound: f64, axis: GuideAxis) -> (f64, Option<AlignmentGuide>) {
        let Some(best) = self.best else {
            return (clamp_origin(self.origin, self.extent, bound), None);
        };
        let clamped = clamp_origin(best.target, self.extent, bound);
        let guide = (clamped == best.target).then_some(AlignmentGuide {
            axis,
            position: best.line,
            source: best.source,
        });
        (clamped, guide)
    }
}

/// Snap `moving` against `siblings` and the canvas center, writing guides
/// into `guides` (cleared first). Returns the snapped, clamped origin.
pub fn compute_snap_into<I>(
    moving: Rect,
    siblings: I,
    canvas_w: f64,
    canvas_h: f64,
    threshold: f64,
    guides: &mut Vec<AlignmentGuide>,
) -> (f64, f64)
where
    I: IntoIterator<Item = (ElementId, Rect)>,
{
    let mut sx = AxisSnap::new(moving.x, moving.width, threshold);
    let mut sy = AxisSnap::new(moving.y, moving.height, threshold);

    sx.offer_frame_center(canvas_w);
    sy.offer_frame_center(canvas_h);
    for (id, rect) in siblings {
        let source = GuideSource::Element(id);
        sx.offer_sibling(rect.x, rect.width, source);
        sy.offer_sibling(rect.y, rect.height, source);
    }

    let (x, gx) = sx.resolve(canvas_w, GuideAxis::Vertical);
    let (y, gy) = sy.resolve(canvas_h, GuideAxis::Horizontal);
    guides.clear();
    guides.extend(gx);
    guides.extend(gy);
    (x, y)
}

/// Snap `moving` against `siblings` and the canvas center.
#[must_use]
pub fn compute_snap<I>(moving: Rect, siblings: I, canvas_w: f64, canvas_h: f64, threshold: f64) -> SnapOutcome
where
    I: IntoIterator<Item = (ElementId, Rect)>,
{
    let mut guides = Vec::with_capacity(2);
    let (x, y) = compute_snap_into(moving, siblings, canvas_w, canvas_h, threshold, &mut guides);
    SnapOutcome { x, y, guides }
}
