//! Shared numeric constants for the canvas crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Default output frame width in pixels (portrait card).
pub const DEFAULT_CANVAS_WIDTH: f64 = 1080.0;

/// Default output frame height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1440.0;

/// Default inner margin between the canvas edge and the content column.
pub const DEFAULT_PADDING: f64 = 100.0;

// ── Element geometry ────────────────────────────────────────────

/// Smallest width an element may have after any edit.
pub const MIN_ELEMENT_WIDTH: f64 = 100.0;

/// Smallest height an element may have after any edit.
pub const MIN_ELEMENT_HEIGHT: f64 = 30.0;

/// Smallest font size reachable through a style edit.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Largest font size reachable through a style edit.
pub const MAX_FONT_SIZE: f64 = 72.0;

// ── Interaction ─────────────────────────────────────────────────

/// Distance in pixels within which a dragged element snaps to a guide.
pub const SNAP_THRESHOLD_PX: f64 = 8.0;

/// Pointer travel (per axis) below which a press is still a click.
pub const DRAG_DEAD_ZONE_PX: f64 = 2.0;

/// Hit slop in pixels around each resize handle point.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// How long a single click waits for a second click before it selects.
pub const SINGLE_CLICK_DELAY_MS: f64 = 200.0;

/// Two clicks on the same element closer than this form a double-click.
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 400.0;

// ── History ─────────────────────────────────────────────────────

/// Number of snapshots retained by the undo/redo history.
pub const HISTORY_CAPACITY: usize = 50;
