//! Rendering: turns a page and UI state into an ordered display list.
//!
//! The engine never produces pixels. This module hands the external
//! rasterizer absolute boxes in paint order, and it does not mutate any
//! application state.
//!
//! Paint order:
//! 1. the canvas background,
//! 2. element boxes in page order (bottom first),
//! 3. selection outline and handles,
//! 4. alignment guides.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{Element, ElementId, ElementKind, Page, TextAlign};
use crate::geom::{Point, Rect};
use crate::hit::ResizeAnchor;
use crate::input::UiState;
use crate::layout::LayoutConfig;
use crate::snap::{AlignmentGuide, GuideAxis};

/// Canvas fill behind every element.
pub const BACKGROUND: &str = "#ffffff";
/// Selection outline and handle stroke.
pub const SELECTION_COLOR: &str = "#1E90FF";
pub const HANDLE_FILL: &str = "#fff";
pub const GUIDE_COLOR: &str = "#f43f5e";

/// Selection dash segment length in pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Header and body cells recovered from a pipe-delimited table element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableGrid {
    pub header: Vec<String>,
    /// Every row has exactly `header.len()` cells.
    pub rows: Vec<Vec<String>>,
}

/// Text styling shared by text and table boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub text_align: TextAlign,
}

/// One paint operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Background {
        width: f64,
        height: f64,
        color: &'static str,
    },
    TextBox {
        id: ElementId,
        rect: Rect,
        text: String,
        style: TextStyle,
    },
    Table {
        id: ElementId,
        rect: Rect,
        grid: TableGrid,
        style: TextStyle,
    },
    SelectionOutline {
        rect: Rect,
        color: &'static str,
        dash: f64,
    },
    Handle {
        anchor: ResizeAnchor,
        center: Point,
        radius: f64,
        fill: &'static str,
        stroke: &'static str,
    },
    /// A full-length guide line across the canvas.
    Guide {
        axis: GuideAxis,
        position: f64,
        length: f64,
        color: &'static str,
    },
}

/// Ordered draw commands for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Number of element boxes (text or table) in the list.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::TextBox { .. } | DrawCommand::Table { .. }))
            .count()
    }
}

/// Build the full frame for `page`: elements plus selection and guides from `ui`.
#[must_use]
pub fn build_display_list(page: &Page, ui: &UiState, config: &LayoutConfig) -> DisplayList {
    let mut commands = Vec::with_capacity(page.len() + 12);

    // Layer 1: background.
    commands.push(DrawCommand::Background {
        width: config.canvas_width,
        height: config.canvas_height,
        color: BACKGROUND,
    });

    // Layer 2: element boxes.
    commands.extend(page.elements.iter().map(element_command));

    // Layer 3: selection UI.
    if let Some(el) = ui.selected_id.and_then(|id| page.get(&id)) {
        push_selection(&mut commands, el.rect());
    }

    // Layer 4: guides.
    commands.extend(ui.guides.iter().map(|g| guide_command(g, config)));

    DisplayList { width: config.canvas_width, height: config.canvas_height, commands }
}

/// Build the export frame for `page`: elements only, no editing overlays.
#[must_use]
pub fn build_page_display_list(page: &Page, config: &LayoutConfig) -> DisplayList {
    build_display_list(page, &UiState::default(), config)
}

fn element_command(el: &Element) -> DrawCommand {
    let style = TextStyle {
        font_size: el.font_size,
        color: el.color.clone(),
        background_color: el.background_color.clone(),
        text_align: el.text_align,
    };
    match el.kind {
        ElementKind::Table => DrawCommand::Table { id: el.id, rect: el.rect(), grid: parse_table(&el.content), style },
        _ => DrawCommand::TextBox { id: el.id, rect: el.rect(), text: el.content.clone(), style },
    }
}

fn push_selection(commands: &mut Vec<DrawCommand>, rect: Rect) {
    commands.push(DrawCommand::SelectionOutline { rect, color: SELECTION_COLOR, dash: SELECTION_DASH_PX });
    commands.extend(ResizeAnchor::ALL.into_iter().map(|anchor| DrawCommand::Handle {
        anchor,
        center: anchor.handle_point(rect),
        radius: HANDLE_RADIUS_PX,
        fill: HANDLE_FILL,
        stroke: SELECTION_COLOR,
    }));
}

fn guide_command(guide: &AlignmentGuide, config: &LayoutConfig) -> DrawCommand {
    let length = match guide.axis {
        GuideAxis::Vertical => config.canvas_height,
        GuideAxis::Horizontal => config.canvas_width,
    };
    DrawCommand::Guide { axis: guide.axis, position: guide.position, length, color: GUIDE_COLOR }
}

/// Parse pipe-delimited table text back into cells.
///
/// The first line is the header. A second line made only of dashes, colons,
/// pipes and spaces is the separator and is skipped. Short rows are padded
/// with empty cells; long rows are cut to the header width.
#[must_use]
pub fn parse_table(content: &str) -> TableGrid {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(first) = lines.next() else {
        return TableGrid::default();
    };
    let header = split_cells(first);
    let width = header.len();

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        if i == 0 && is_separator(line) {
            continue;
        }
        let mut cells = split_cells(line);
        cells.resize(width, String::new());
        rows.push(cells);
    }
    TableGrid { header, rows }
}

fn split_cells(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_owned()).collect()
}

fn is_separator(line: &str) -> bool {
    line.contains('-') && line.chars().all(|c| matches!(c, '-' | ':' | '|' | ' '))
}
