//! Paginator: splits a laid-out element stack into pages at heading boundaries.
//!
//! A heading whose level is at or above the split level opens a new page and
//! becomes that page's first element; everything else accumulates into the
//! current page. Each resulting page is then re-stacked on its own, as if it
//! were a separate short document, so every page starts from a fresh offset
//! and gets its own centering.

#[cfg(test)]
#[path = "paginate_test.rs"]
mod paginate_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blocks::{ContentBlock, MAX_HEADING_LEVEL};
use crate::doc::{Element, ElementKind, Page};
use crate::layout::{self, LayoutConfig, LayoutError, spacing_for_density};

/// Split level outside `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("split level {0} is outside 1..={max}", max = MAX_HEADING_LEVEL)]
pub struct InvalidSplitLevel(pub u8);

/// Heading depth that starts a new page.
///
/// Level 1 disables splitting. Level N > 1 starts a page at every heading of
/// level N or shallower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SplitLevel(u8);

impl SplitLevel {
    /// One page for the whole document.
    pub const NONE: Self = Self(1);
    /// Split at level 1 and 2 headings.
    pub const SECTIONS: Self = Self(2);
    /// Split at level 1, 2 and 3 headings.
    pub const SUBSECTIONS: Self = Self(3);

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether `el` opens a new page at this level.
    #[must_use]
    pub fn starts_page(self, el: &Element) -> bool {
        self.0 > 1 && el.kind == ElementKind::Heading && el.level.is_some_and(|l| l <= self.0)
    }
}

impl Default for SplitLevel {
    fn default() -> Self {
        Self::NONE
    }
}

impl TryFrom<u8> for SplitLevel {
    type Error = InvalidSplitLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=MAX_HEADING_LEVEL).contains(&value) { Ok(Self(value)) } else { Err(InvalidSplitLevel(value)) }
    }
}

impl From<SplitLevel> for u8 {
    fn from(level: SplitLevel) -> Self {
        level.0
    }
}

/// Group `elements` into pages without moving them. Never returns zero groups.
#[must_use]
pub fn split_by_headings(elements: Vec<Element>, level: SplitLevel) -> Vec<Vec<Element>> {
    let mut pages = Vec::new();
    let mut current: Vec<Element> = Vec::new();

    for el in elements {
        if level.starts_page(&el) && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
        }
        current.push(el);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Split `elements` into pages and lay each page out as its own column.
///
/// Element heights are kept; x and width reset to the content column, and y
/// is recomputed per page with spacing and centering chosen from that page's
/// own density.
#[must_use]
pub fn paginate(elements: Vec<Element>, level: SplitLevel, config: &LayoutConfig) -> Vec<Page> {
    let groups = split_by_headings(elements, level);
    let pages: Vec<Page> = groups
        .into_iter()
        .map(|mut group| {
            let spacing = spacing_for_density(page_density(&group, config));
            layout::arrange(&mut group, config, spacing);
            Page::new(group)
        })
        .collect();
    debug!(split_level = level.get(), pages = pages.len(), "paginated");
    pages
}

/// Lay out `blocks` and paginate the result in one step.
///
/// # Errors
///
/// Returns [`LayoutError`] if layout rejects the input.
pub fn paginate_blocks(
    blocks: &[ContentBlock],
    level: SplitLevel,
    config: &LayoutConfig,
) -> Result<Vec<Page>, LayoutError> {
    let elements = layout::layout(blocks, config)?;
    Ok(paginate(elements, level, config))
}

/// Height of a page's stack with both paddings, over the canvas height.
fn page_density(elements: &[Element], config: &LayoutConfig) -> f64 {
    let content: f64 = elements.iter().map(|e| e.height).sum();
    (content + 2.0 * config.padding) / config.canvas_height
}
