//! The editing engine: scene, selection, gestures, and history in one owner.
//!
//! [`EngineCore`] is driven entirely by the host: pointer and key events,
//! explicit edit calls, and `tick` for the click timer. Every handler
//! returns the [`Action`]s the host should react to. The engine never reads a
//! clock and never renders; it only keeps the scene consistent.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blocks::ContentBlock;
use crate::click::{ClickKind, ClickTimer};
use crate::consts::{
    DOUBLE_CLICK_WINDOW_MS, HANDLE_RADIUS_PX, HISTORY_CAPACITY, SINGLE_CLICK_DELAY_MS, SNAP_THRESHOLD_PX,
};
use crate::doc::{Document, Element, ElementId, ElementKind, ElementPatch, Page};
use crate::geom::{Point, Rect};
use crate::history::History;
use crate::hit::{Hit, HitPart, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, TextEdit, UiState, within_dead_zone};
use crate::layout::{LayoutConfig, LayoutError};
use crate::paginate::{SplitLevel, paginate_blocks};
use crate::render::{DisplayList, build_display_list};
use crate::snap::compute_snap_into;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    RenderNeeded,
    SelectionChanged { id: Option<ElementId> },
    /// Open the inline text editor over `id`, prefilled with `text`.
    EditTextRequested { id: ElementId, text: String },
    /// A snapshot was pushed onto the history.
    Committed { cursor: usize, len: usize },
    /// Undo or redo replaced the scene.
    Restored { cursor: usize, len: usize },
}

/// Invalid editor configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("snap threshold must be a non-negative number, got {0}")]
    InvalidSnapThreshold(f64),
    #[error("click timings must be non-negative, got delay {delay}ms and window {window}ms")]
    InvalidClickTiming { delay: f64, window: f64 },
}

/// Everything the engine needs to know up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    #[serde(flatten)]
    pub layout: LayoutConfig,
    pub split_level: SplitLevel,
    pub snap_threshold: f64,
    /// Maximum retained snapshots; zero is treated as one.
    pub history_capacity: usize,
    pub single_click_delay_ms: f64,
    pub double_click_window_ms: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            split_level: SplitLevel::default(),
            snap_threshold: SNAP_THRESHOLD_PX,
            history_capacity: HISTORY_CAPACITY,
            single_click_delay_ms: SINGLE_CLICK_DELAY_MS,
            double_click_window_ms: DOUBLE_CLICK_WINDOW_MS,
        }
    }
}

impl EditorConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the layout geometry is unusable or a
    /// threshold or timing is negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(ConfigError::InvalidSnapThreshold(self.snap_threshold));
        }
        let timing_ok = [self.single_click_delay_ms, self.double_click_window_ms]
            .iter()
            .all(|t| t.is_finite() && *t >= 0.0);
        if !timing_ok {
            return Err(ConfigError::InvalidClickTiming {
                delay: self.single_click_delay_ms,
                window: self.double_click_window_ms,
            });
        }
        Ok(())
    }
}

/// Core engine state.
pub struct EngineCore {
    doc: Document,
    ui: UiState,
    input: InputState,
    history: History<Vec<Page>>,
    clicks: ClickTimer,
    config: EditorConfig,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EngineCore {
    /// An engine holding one empty page, with that page as its only history entry.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let doc = Document::new();
        let history = History::new(doc.pages().to_vec(), config.history_capacity);
        Self {
            doc,
            ui: UiState::default(),
            input: InputState::default(),
            history,
            clicks: ClickTimer::new(config.single_click_delay_ms, config.double_click_window_ms),
            config,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn history(&self) -> &History<Vec<Page>> {
        &self.history
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    /// Look up an element on the current page.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    /// Element whose deferred select has not fired yet.
    #[must_use]
    pub fn pending_click(&self) -> Option<ElementId> {
        self.clicks.pending()
    }

    /// Draw commands for the current page and UI state.
    #[must_use]
    pub fn display_list(&self) -> DisplayList {
        build_display_list(self.doc.current_page(), &self.ui, &self.config.layout)
    }

    // --- Scene loading ---

    /// Lay out and paginate `blocks`, then replace the whole scene with the result.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if any block is malformed; the scene is left untouched.
    pub fn load_blocks(&mut self, blocks: &[ContentBlock]) -> Result<Vec<Action>, LayoutError> {
        let pages = paginate_blocks(blocks, self.config.split_level, &self.config.layout)?;
        info!(blocks = blocks.len(), pages = pages.len(), "document loaded");
        Ok(self.replace_scene(pages))
    }

    /// Replace the whole scene with `pages`. One commit.
    pub fn load_pages(&mut self, pages: Vec<Page>) -> Vec<Action> {
        self.replace_scene(pages)
    }

    fn replace_scene(&mut self, pages: Vec<Page>) -> Vec<Action> {
        let mut actions = Vec::new();
        self.reset_interaction(&mut actions);
        self.doc.replace_pages(pages);
        self.doc.set_current_page(0);
        actions.push(self.commit());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Switch the edited page. Ends any gesture and clears the selection.
    pub fn set_current_page(&mut self, index: usize) -> Vec<Action> {
        let mut actions = Vec::new();
        self.reset_interaction(&mut actions);
        self.doc.set_current_page(index);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Editing ---

    /// Add a default element of `kind` to the current page and select it.
    pub fn add_element(&mut self, kind: ElementKind, level: Option<u8>) -> Vec<Action> {
        let (w, h) = self.canvas_size();
        let element = Element::new_default(kind, level, w, h);
        let id = element.id;
        self.doc.insert(element);
        debug!(%id, ?kind, "element added");

        let mut actions = Vec::new();
        self.set_selection(Some(id), &mut actions);
        actions.push(self.commit());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove `id` from the current page. A missing id is a no-op.
    pub fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        if self.input.target() == Some(*id) {
            self.input = InputState::Idle;
            self.ui.guides.clear();
        }
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        debug!(%id, "element deleted");

        let mut actions = Vec::new();
        if self.ui.selected_id == Some(*id) {
            self.set_selection(None, &mut actions);
        }
        if self.ui.editing.as_ref().is_some_and(|e| e.id == *id) {
            self.ui.editing = None;
        }
        if self.clicks.pending() == Some(*id) {
            self.clicks.cancel();
        }
        actions.push(self.commit());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Apply a style or geometry patch to `id`. Commits only if something changed.
    pub fn apply_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> Vec<Action> {
        let (w, h) = self.canvas_size();
        let changed = self.doc.get_mut(id).is_some_and(|el| el.apply_patch(patch, w, h));
        if !changed {
            return Vec::new();
        }
        vec![self.commit(), Action::RenderNeeded]
    }

    /// Replace the draft of the open inline edit.
    pub fn set_edit_draft(&mut self, text: &str) {
        if let Some(edit) = self.ui.editing.as_mut() {
            text.clone_into(&mut edit.draft);
        }
    }

    /// Close the inline edit and apply its draft as the element's content.
    pub fn commit_text_edit(&mut self) -> Vec<Action> {
        let Some(TextEdit { id, draft }) = self.ui.editing.take() else {
            return Vec::new();
        };
        let patch = ElementPatch { content: Some(draft), ..ElementPatch::default() };
        let mut actions = self.apply_patch(&id, &patch);
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Close the inline edit without touching the element.
    pub fn cancel_text_edit(&mut self) -> Vec<Action> {
        match self.ui.editing.take() {
            Some(_) => vec![Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    // --- History ---

    /// Restore the previous snapshot and clear the selection.
    pub fn undo(&mut self) -> Vec<Action> {
        if !self.history.undo() {
            return Vec::new();
        }
        self.restore()
    }

    /// Re-apply the next snapshot and clear the selection.
    pub fn redo(&mut self) -> Vec<Action> {
        if !self.history.redo() {
            return Vec::new();
        }
        self.restore()
    }

    /// Replace the scene with the snapshot at the history cursor.
    fn restore(&mut self) -> Vec<Action> {
        let pages = self.history.current().cloned().unwrap_or_default();
        let mut actions = Vec::new();
        self.reset_interaction(&mut actions);
        self.doc.replace_pages(pages);
        debug!(cursor = self.history.cursor(), "history restored");
        actions.push(Action::Restored { cursor: self.history.cursor(), len: self.history.len() });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn commit(&mut self) -> Action {
        self.history.commit(self.doc.pages().to_vec());
        Action::Committed { cursor: self.history.cursor(), len: self.history.len() }
    }

    // --- Input events ---

    /// Start a move on an element body or a resize on a handle of the
    /// selected element; a background press clears the selection.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input.is_dragging() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.ui.editing.is_some() {
            actions.extend(self.commit_text_edit());
        }

        match hit_test(pt, self.doc.current_page(), self.ui.selected_id, HANDLE_RADIUS_PX) {
            Some(Hit { element_id, part }) => {
                let Some(orig) = self.doc.get(&element_id).map(Element::rect) else {
                    return actions;
                };
                self.input = match part {
                    HitPart::ResizeHandle(anchor) => {
                        self.clicks.cancel();
                        debug!(id = %element_id, ?anchor, "resize start");
                        InputState::ResizingElement { id: element_id, anchor, start: pt, orig, moved: false }
                    }
                    HitPart::Body => {
                        debug!(id = %element_id, "move start");
                        InputState::MovingElement { id: element_id, start: pt, orig, moved: false }
                    }
                };
            }
            None => {
                self.clicks.cancel();
                self.set_selection(None, &mut actions);
                if !actions.contains(&Action::RenderNeeded) && !actions.is_empty() {
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    /// Advance the active gesture to `pt`.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.drag_to(pt) {
            self.adopt_dragged(&mut actions);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// End the active gesture at `pt`. Commits if the element actually
    /// changed; a press that never left the dead zone counts as a click.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button, now_ms: f64) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.drag_to(pt) {
            self.adopt_dragged(&mut actions);
        }
        actions.extend(self.finish_drag(Some(now_ms)));
        actions
    }

    /// Pointer tracking was lost. Ends the gesture like a pointer-up that is
    /// never a click.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_drag(None)
    }

    /// Keyboard shortcuts: undo/redo, delete, escape.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_dragging() {
            return if key.is("Escape") { self.finish_drag(None) } else { Vec::new() };
        }
        if self.ui.editing.is_some() {
            return if key.is("Escape") { self.cancel_text_edit() } else { Vec::new() };
        }
        if modifiers.command() {
            return if key.is("z") && modifiers.shift {
                self.redo()
            } else if key.is("z") {
                self.undo()
            } else if key.is("y") {
                self.redo()
            } else {
                Vec::new()
            };
        }
        if key.is("Delete") || key.is("Backspace") {
            return match self.ui.selected_id {
                Some(id) => self.delete_element(&id),
                None => Vec::new(),
            };
        }
        if key.is("Escape") {
            self.clicks.cancel();
            let mut actions = Vec::new();
            self.set_selection(None, &mut actions);
            if !actions.is_empty() {
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }
        Vec::new()
    }

    /// Fire a deferred single-click select if it is due at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(id) = self.clicks.poll(now_ms) {
            if self.doc.get(&id).is_some() {
                self.set_selection(Some(id), &mut actions);
            }
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Internals ---

    fn canvas_size(&self) -> (f64, f64) {
        (self.config.layout.canvas_width, self.config.layout.canvas_height)
    }

    /// Move or resize the dragged element for a pointer at `pt`.
    /// Returns whether the element was touched.
    fn drag_to(&mut self, pt: Point) -> bool {
        let (w, h) = self.canvas_size();
        match &mut self.input {
            InputState::Idle => false,
            InputState::MovingElement { id, start, orig, moved } => {
                let (dx, dy) = (pt.x - start.x, pt.y - start.y);
                if !*moved && within_dead_zone(dx, dy) {
                    return false;
                }
                *moved = true;
                let id = *id;
                let candidate = Rect { x: orig.x + dx, y: orig.y + dy, ..*orig };
                let siblings = self.doc.current_page().elements.iter().filter(|e| e.id != id).map(|e| (e.id, e.rect()));
                let (x, y) =
                    compute_snap_into(candidate, siblings, w, h, self.config.snap_threshold, &mut self.ui.guides);
                if let Some(el) = self.doc.get_mut(&id) {
                    el.x = x;
                    el.y = y;
                }
                true
            }
            InputState::ResizingElement { id, anchor, start, orig, moved } => {
                let (dx, dy) = (pt.x - start.x, pt.y - start.y);
                if !*moved && within_dead_zone(dx, dy) {
                    return false;
                }
                *moved = true;
                let rect = anchor.resize(*orig, dx, dy, w, h);
                if let Some(el) = self.doc.get_mut(id) {
                    el.set_rect(rect);
                }
                true
            }
        }
    }

    /// A moved element becomes the selection, and a select still pending
    /// from an earlier click no longer applies.
    fn adopt_dragged(&mut self, actions: &mut Vec<Action>) {
        if let InputState::MovingElement { id, .. } = self.input {
            self.clicks.drop_pending();
            self.set_selection(Some(id), actions);
        }
    }

    /// Leave the active gesture. `now_ms` is `Some` for a real pointer-up,
    /// which may count as a click.
    fn finish_drag(&mut self, now_ms: Option<f64>) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let had_guides = !self.ui.guides.is_empty();
        self.ui.guides.clear();

        let mut actions = Vec::new();
        let is_move = matches!(state, InputState::MovingElement { .. });
        let (id, orig, moved) = match state {
            InputState::Idle => return actions,
            InputState::MovingElement { id, orig, moved, .. } | InputState::ResizingElement { id, orig, moved, .. } => {
                (id, orig, moved)
            }
        };

        let changed = self.doc.get(&id).is_some_and(|e| e.rect() != orig);
        if moved && changed {
            debug!(%id, "gesture committed");
            actions.push(self.commit());
            actions.push(Action::RenderNeeded);
            return actions;
        }
        if !moved && is_move {
            if let Some(now) = now_ms {
                self.register_click(id, now, &mut actions);
            }
        }
        if (moved || had_guides) && !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn register_click(&mut self, id: ElementId, now_ms: f64, actions: &mut Vec<Action>) {
        match self.clicks.register(id, now_ms) {
            ClickKind::Single => debug!(%id, "click pending"),
            ClickKind::Double => {
                let Some(text) = self.doc.get(&id).map(|e| e.content.clone()) else {
                    return;
                };
                self.set_selection(Some(id), actions);
                self.ui.editing = Some(TextEdit { id, draft: text.clone() });
                debug!(%id, "inline edit opened");
                actions.push(Action::EditTextRequested { id, text });
                actions.push(Action::RenderNeeded);
            }
        }
    }

    /// Drop the gesture, guides, pending click, inline edit and selection.
    fn reset_interaction(&mut self, actions: &mut Vec<Action>) {
        self.input = InputState::Idle;
        self.ui.guides.clear();
        self.ui.editing = None;
        self.clicks.cancel();
        self.set_selection(None, actions);
    }

    fn set_selection(&mut self, id: Option<ElementId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != id {
            self.ui.selected_id = id;
            actions.push(Action::SelectionChanged { id });
        }
    }
}
