//! Single- vs double-click disambiguation as an explicit, cancellable timer.
//!
//! A click on an element does not select it right away. It schedules a
//! pending select that fires on the first [`ClickTimer::poll`] at or after the
//! due time. A second click on the same element inside the double-click
//! window cancels the pending select and reports a double click instead.
//! Times are host milliseconds; the timer never reads a clock itself.

#[cfg(test)]
#[path = "click_test.rs"]
mod click_test;

use crate::doc::ElementId;

/// What a registered click turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// First click; a select is now pending.
    Single,
    /// Second click on the same element within the window.
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingSelect {
    id: ElementId,
    due_ms: f64,
}

#[derive(Debug, Clone)]
pub struct ClickTimer {
    delay_ms: f64,
    window_ms: f64,
    last_click: Option<(ElementId, f64)>,
    pending: Option<PendingSelect>,
}

impl ClickTimer {
    #[must_use]
    pub fn new(delay_ms: f64, window_ms: f64) -> Self {
        Self { delay_ms, window_ms, last_click: None, pending: None }
    }

    /// Record a click on `id` at `now_ms`.
    pub fn register(&mut self, id: ElementId, now_ms: f64) -> ClickKind {
        if let Some((last_id, at)) = self.last_click {
            if last_id == id && now_ms - at <= self.window_ms {
                self.cancel();
                return ClickKind::Double;
            }
        }
        self.last_click = Some((id, now_ms));
        self.pending = Some(PendingSelect { id, due_ms: now_ms + self.delay_ms });
        ClickKind::Single
    }

    /// Take the pending select if it is due at `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> Option<ElementId> {
        match self.pending {
            Some(p) if now_ms >= p.due_ms => {
                self.pending = None;
                Some(p.id)
            }
            _ => None,
        }
    }

    /// Drop the pending select but remember the last click for double-click
    /// detection.
    pub fn drop_pending(&mut self) {
        self.pending = None;
    }

    /// Drop any pending select and forget the last click.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_click = None;
    }

    /// Element whose select is still waiting, if any.
    #[must_use]
    pub fn pending(&self) -> Option<ElementId> {
        self.pending.map(|p| p.id)
    }
}
