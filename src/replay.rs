//! Scripted interaction sessions.
//!
//! A replay file is a JSON array of events tagged by `"event"`. Pointer and
//! key events go through the engine's input handlers exactly as a host would
//! send them; time only advances through the `t` fields of `pointerUp` and
//! `tick`. Elements are addressed by their index on the current page.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use canvas::doc::{ElementId, ElementKind, ElementPatch, Page};
use canvas::engine::{Action, EngineCore};
use canvas::geom::Point;
use canvas::input::{Button, Key, Modifiers};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ReplayEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        /// Host clock in milliseconds.
        t: f64,
    },
    PointerLeave,
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Tick {
        t: f64,
    },
    Undo,
    Redo,
    SelectPage {
        index: usize,
    },
    AddElement {
        kind: ElementKind,
        #[serde(default)]
        level: Option<u8>,
    },
    Patch {
        element: usize,
        patch: ElementPatch,
    },
    Delete {
        element: usize,
    },
    /// Replace the open inline edit's text.
    Draft {
        text: String,
    },
    CommitEdit,
    CancelEdit,
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub pages: Vec<Page>,
    pub current_page: usize,
    pub selection: Option<ElementId>,
    pub history_len: usize,
    pub history_cursor: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub actions: Vec<Action>,
}

/// Feed `events` to `engine` in order and collect every emitted action.
pub fn replay(engine: &mut EngineCore, events: &[ReplayEvent]) -> Result<Vec<Action>, CliError> {
    let mut actions = Vec::new();
    for (index, event) in events.iter().enumerate() {
        let emitted = apply(engine, index, event)?;
        debug!(index, ?event, emitted = emitted.len(), "replayed event");
        actions.extend(emitted);
    }
    Ok(actions)
}

fn apply(engine: &mut EngineCore, index: usize, event: &ReplayEvent) -> Result<Vec<Action>, CliError> {
    let actions = match event {
        ReplayEvent::PointerDown { x, y, button } => engine.on_pointer_down(Point::new(*x, *y), *button),
        ReplayEvent::PointerMove { x, y } => engine.on_pointer_move(Point::new(*x, *y)),
        ReplayEvent::PointerUp { x, y, button, t } => engine.on_pointer_up(Point::new(*x, *y), *button, *t),
        ReplayEvent::PointerLeave => engine.on_pointer_leave(),
        ReplayEvent::KeyDown { key, modifiers } => engine.on_key_down(key, *modifiers),
        ReplayEvent::Tick { t } => engine.tick(*t),
        ReplayEvent::Undo => engine.undo(),
        ReplayEvent::Redo => engine.redo(),
        ReplayEvent::SelectPage { index } => engine.set_current_page(*index),
        ReplayEvent::AddElement { kind, level } => engine.add_element(*kind, *level),
        ReplayEvent::Patch { element, patch } => {
            let id = element_at(engine, index, *element)?;
            engine.apply_patch(&id, patch)
        }
        ReplayEvent::Delete { element } => {
            let id = element_at(engine, index, *element)?;
            engine.delete_element(&id)
        }
        ReplayEvent::Draft { text } => {
            engine.set_edit_draft(text);
            Vec::new()
        }
        ReplayEvent::CommitEdit => engine.commit_text_edit(),
        ReplayEvent::CancelEdit => engine.cancel_text_edit(),
    };
    Ok(actions)
}

fn element_at(engine: &EngineCore, index: usize, element: usize) -> Result<ElementId, CliError> {
    engine
        .document()
        .current_page()
        .elements
        .get(element)
        .map(|e| e.id)
        .ok_or(CliError::NoSuchElement { index, element })
}

/// Snapshot the engine after a replay.
#[must_use]
pub fn report(engine: &EngineCore, actions: Vec<Action>) -> ReplayReport {
    ReplayReport {
        pages: engine.document().pages().to_vec(),
        current_page: engine.document().current_index(),
        selection: engine.selection(),
        history_len: engine.history().len(),
        history_cursor: engine.history().cursor(),
        can_undo: engine.history().can_undo(),
        can_redo: engine.history().can_redo(),
        actions,
    }
}
