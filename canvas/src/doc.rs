//! Document model: elements, pages, and the in-memory scene.
//!
//! This module defines the core data types that describe what is on a card
//! (`Element`, `ElementKind`), a sparse-update type for style and geometry
//! edits (`ElementPatch`), and the runtime store that owns every page of the
//! document (`Document`).
//!
//! Elements flow into this layer from the layout planner and the paginator,
//! and are mutated by the interaction controller. Every mutation that goes
//! through [`Element::apply_patch`] leaves the element inside the canvas and
//! above the minimum size.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{MAX_FONT_SIZE, MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH, MIN_FONT_SIZE};
use crate::geom::Rect;

/// Unique identifier for an element. Never reused.
pub type ElementId = Uuid;

// ── Palette ─────────────────────────────────────────────────────

/// Default body text color.
pub const INK: &str = "#1f2937";
/// Paragraphs that carried bold markers.
pub const ACCENT: &str = "#ec4899";
/// Body text color for elements added by hand.
pub const ADDED_INK: &str = "#374151";
pub const QUOTE_BACKGROUND: &str = "#f3f4f6";
pub const QUOTE_INK: &str = "#6b7280";
pub const CODE_BACKGROUND: &str = "#1f2937";
pub const CODE_INK: &str = "#f9fafb";

/// The kind of an element, one per content block variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Heading,
    Paragraph,
    List,
    Blockquote,
    Code,
    Table,
}

/// Horizontal text alignment inside an element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// A positioned, styled, editable block on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Which content block kind produced this element.
    pub kind: ElementKind,
    /// Heading depth, present only for headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Box width; never below [`MIN_ELEMENT_WIDTH`].
    pub width: f64,
    /// Box height; never below [`MIN_ELEMENT_HEIGHT`].
    pub height: f64,
    /// Display text (markers stripped) or a pipe-delimited table grid.
    pub content: String,
    pub font_size: f64,
    /// CSS color string for the text.
    pub color: String,
    /// CSS color string for the box fill, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub text_align: TextAlign,
}

impl Element {
    /// Bounding box of the element.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Overwrite position and size from `rect`.
    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Build an element of `kind` the way the "add element" action does:
    /// default font, colors and placeholder content, centred on the canvas.
    #[must_use]
    pub fn new_default(kind: ElementKind, level: Option<u8>, canvas_w: f64, canvas_h: f64) -> Self {
        let level = match kind {
            ElementKind::Heading => Some(level.unwrap_or(1)),
            _ => None,
        };
        let font_size = default_font_size(kind, level);
        let width = 400.0_f64.min(canvas_w * 0.8).max(MIN_ELEMENT_WIDTH);
        let height = if kind == ElementKind::Table { 150.0 } else { (font_size * 2.0).max(MIN_ELEMENT_HEIGHT) };
        let (color, background_color) = match kind {
            ElementKind::Heading => (added_heading_color(level).to_owned(), None),
            ElementKind::Blockquote => (QUOTE_INK.to_owned(), Some(QUOTE_BACKGROUND.to_owned())),
            ElementKind::Code => (CODE_INK.to_owned(), Some(CODE_BACKGROUND.to_owned())),
            _ => (ADDED_INK.to_owned(), None),
        };
        let rect = Rect::new((canvas_w - width) / 2.0, (canvas_h - height) / 2.0, width, height)
            .clamped_into(canvas_w, canvas_h);
        Self {
            id: Uuid::new_v4(),
            kind,
            level,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            content: placeholder_content(kind, level).to_owned(),
            font_size,
            color,
            background_color,
            text_align: TextAlign::Center,
        }
    }

    /// Apply a sparse patch, then re-establish the size floors and canvas bounds.
    ///
    /// Returns `true` if any field actually changed.
    pub fn apply_patch(&mut self, patch: &ElementPatch, canvas_w: f64, canvas_h: f64) -> bool {
        let before = self.clone();

        let mut rect = self.rect();
        if let Some(x) = patch.x {
            rect.x = x;
        }
        if let Some(y) = patch.y {
            rect.y = y;
        }
        if let Some(w) = patch.width {
            rect.width = w.max(MIN_ELEMENT_WIDTH);
        }
        if let Some(h) = patch.height {
            rect.height = h.max(MIN_ELEMENT_HEIGHT);
        }
        self.set_rect(rect.clamped_into(canvas_w, canvas_h));

        if let Some(size) = patch.font_size {
            self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        }
        if let Some(ref color) = patch.color {
            self.color.clone_from(color);
        }
        if let Some(ref bg) = patch.background_color {
            self.background_color.clone_from(bg);
        }
        if let Some(align) = patch.text_align {
            self.text_align = align;
        }
        if let Some(ref content) = patch.content {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                trimmed.clone_into(&mut self.content);
            }
        }

        *self != before
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// `Some(None)` clears the fill; `Some(Some(c))` sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Replacement text. Trimmed; an all-blank value is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Default font size for a hand-added element, from a base of 32px.
#[must_use]
pub fn default_font_size(kind: ElementKind, level: Option<u8>) -> f64 {
    const BASE: f64 = 32.0;
    let scale = match (kind, level) {
        (ElementKind::Heading, Some(1)) => 2.25,
        (ElementKind::Heading, Some(2)) => 1.75,
        (ElementKind::Heading, Some(3)) => 1.375,
        (ElementKind::Heading | ElementKind::Paragraph, _) => 1.0,
        (ElementKind::List, _) => 0.875,
        (ElementKind::Blockquote, _) => 0.8125,
        (ElementKind::Code | ElementKind::Table, _) => 0.75,
    };
    (BASE * scale).round()
}

fn added_heading_color(level: Option<u8>) -> &'static str {
    match level {
        Some(2) => "#93c5fd",
        Some(3) => "#ea580c",
        _ => "#2563eb",
    }
}

fn placeholder_content(kind: ElementKind, level: Option<u8>) -> &'static str {
    match (kind, level) {
        (ElementKind::Heading, Some(1)) => "Main title",
        (ElementKind::Heading, Some(2)) => "Subtitle",
        (ElementKind::Heading, Some(3)) => "Section title",
        (ElementKind::Heading, _) => "Title",
        (ElementKind::Paragraph, _) => "Paragraph text\nPress Enter for a new line\nMultiple lines are supported",
        (ElementKind::List, _) => "• Item 1\n• Item 2\n• Item 3\n• Add more items",
        (ElementKind::Blockquote, _) => "A quoted passage\nfor emphasis\nacross several lines",
        (ElementKind::Code, _) => "fn hello() {\n    println!(\"Hello World!\");\n}",
        (ElementKind::Table, _) => {
            "Task | Status | Note\n--- | --- | ---\nTask A | Done | On time\nTask B | Active | One day late\nTask C | Queued | Waiting"
        }
    }
}

/// An ordered group of elements rendered together as one output frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    #[must_use]
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The live scene: a non-empty sequence of pages and the page being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
    current: usize,
}

impl Document {
    /// Create a document holding one empty page.
    #[must_use]
    pub fn new() -> Self {
        Self { pages: vec![Page::default()], current: 0 }
    }

    /// All pages in order. Never empty.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Zero-based index of the page being edited.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current]
    }

    /// Switch the edited page. Out-of-range indices clamp to the last page.
    pub fn set_current_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len() - 1);
    }

    /// Replace every page. An empty list becomes a single empty page.
    pub fn replace_pages(&mut self, pages: Vec<Page>) {
        self.pages = if pages.is_empty() { vec![Page::default()] } else { pages };
        self.current = self.current.min(self.pages.len() - 1);
    }

    /// Look up an element on the current page.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.current_page().get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.current_page_mut().get_mut(id)
    }

    /// Append an element to the current page.
    pub fn insert(&mut self, element: Element) {
        self.current_page_mut().elements.push(element);
    }

    /// Remove an element from the current page, returning it if present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let page = self.current_page_mut();
        let idx = page.elements.iter().position(|e| e.id == *id)?;
        Some(page.elements.remove(idx))
    }

    /// Total element count across all pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
