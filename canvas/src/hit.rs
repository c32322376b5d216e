//! Hit testing and resize-handle geometry.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use crate::doc::{ElementId, Page};
use crate::geom::{Point, Rect};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Compass position of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Every anchor, clockwise from north.
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// -1 if the handle sits on the left edge, 1 on the right, 0 if centred.
    #[must_use]
    pub fn x_sign(self) -> i8 {
        match self {
            Self::Nw | Self::W | Self::Sw => -1,
            Self::Ne | Self::E | Self::Se => 1,
            Self::N | Self::S => 0,
        }
    }

    /// -1 if the handle sits on the top edge, 1 on the bottom, 0 if centred.
    #[must_use]
    pub fn y_sign(self) -> i8 {
        match self {
            Self::Nw | Self::N | Self::Ne => -1,
            Self::Sw | Self::S | Self::Se => 1,
            Self::E | Self::W => 0,
        }
    }

    /// Where this handle is drawn on `rect`.
    #[must_use]
    pub fn handle_point(self, rect: Rect) -> Point {
        let x = match self.x_sign() {
            -1 => rect.x,
            0 => rect.center_x(),
            _ => rect.right(),
        };
        let y = match self.y_sign() {
            -1 => rect.y,
            0 => rect.center_y(),
            _ => rect.bottom(),
        };
        Point::new(x, y)
    }

    /// Resize `orig` by a pointer delta of `(dx, dy)` dragged from this handle.
    ///
    /// The edge opposite the handle stays put. The dragged edge stops at the
    /// canvas border and never comes closer to the fixed edge than the
    /// element minimums.
    #[must_use]
    pub fn resize(self, orig: Rect, dx: f64, dy: f64, canvas_w: f64, canvas_h: f64) -> Rect {
        let (x, width) = resize_span(orig.x, orig.width, dx, self.x_sign(), MIN_ELEMENT_WIDTH, canvas_w);
        let (y, height) = resize_span(orig.y, orig.height, dy, self.y_sign(), MIN_ELEMENT_HEIGHT, canvas_h);
        Rect::new(x, y, width, height).clamped_into(canvas_w, canvas_h)
    }
}

/// Move one edge of the span `[start, start + extent]` by `delta`.
///
/// `sign` -1 drags the near edge, 1 the far edge, 0 leaves the span alone.
/// Returns the new `(start, extent)`.
fn resize_span(start: f64, extent: f64, delta: f64, sign: i8, min: f64, bound: f64) -> (f64, f64) {
    match sign {
        -1 => {
            let far = start + extent;
            let near = (start + delta).max(0.0).min(far - min);
            (near, far - near)
        }
        1 => {
            let far = (start + extent + delta).min(bound).max(start + min);
            (start, far - start)
        }
        _ => (start, extent),
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Find what lies under `pt` on `page`.
///
/// Handles of the selected element win over everything; after that the
/// topmost body (last in page order) containing the point.
#[must_use]
pub fn hit_test(pt: Point, page: &Page, selected_id: Option<ElementId>, handle_radius: f64) -> Option<Hit> {
    if let Some(selected) = selected_id.and_then(|id| page.get(&id)) {
        let rect = selected.rect();
        let handle = ResizeAnchor::ALL.into_iter().find(|a| a.handle_point(rect).distance(pt) <= handle_radius);
        if let Some(anchor) = handle {
            return Some(Hit { element_id: selected.id, part: HitPart::ResizeHandle(anchor) });
        }
    }

    page.elements
        .iter()
        .rev()
        .find(|e| e.rect().contains(pt))
        .map(|e| Hit { element_id: e.id, part: HitPart::Body })
}
