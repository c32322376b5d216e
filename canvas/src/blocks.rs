//! Content blocks: the typed stream produced by the external markdown lexer.
//!
//! Blocks arrive already tokenized; this module only validates their shape and
//! offers the inline-markup cleanup the layout planner applies to display text.
//! A block that fails [`ContentBlock::validate`] fails the whole layout call.

#[cfg(test)]
#[path = "blocks_test.rs"]
mod blocks_test;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::doc::ElementKind;

/// Deepest heading level a lexer may emit.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Structural problem with one input block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("block {index}: heading level {level} is outside 1..={max}", max = MAX_HEADING_LEVEL)]
    InvalidHeadingLevel { index: usize, level: u8 },
    #[error("block {index}: table has no header cells")]
    EmptyTableHeader { index: usize },
}

/// One block-level token from the lexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
    Blockquote { text: String },
    Code { text: String },
    Table {
        #[serde(rename = "headerCells")]
        header_cells: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl ContentBlock {
    /// Element kind this block lays out as.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Heading { .. } => ElementKind::Heading,
            Self::Paragraph { .. } => ElementKind::Paragraph,
            Self::List { .. } => ElementKind::List,
            Self::Blockquote { .. } => ElementKind::Blockquote,
            Self::Code { .. } => ElementKind::Code,
            Self::Table { .. } => ElementKind::Table,
        }
    }

    /// Check the block's fields. `index` is its position in the input stream.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError`] for a heading level outside `1..=6` or a table
    /// without header cells.
    pub fn validate(&self, index: usize) -> Result<(), BlockError> {
        match self {
            Self::Heading { level, .. } if *level == 0 || *level > MAX_HEADING_LEVEL => {
                Err(BlockError::InvalidHeadingLevel { index, level: *level })
            }
            Self::Table { header_cells, .. } if header_cells.is_empty() => Err(BlockError::EmptyTableHeader { index }),
            _ => Ok(()),
        }
    }
}

/// Ordered marker patterns; bold must run before italic so `**x**` is not
/// read as two empty italics.
static MARKUP: LazyLock<Result<Vec<(Regex, &'static str)>, regex::Error>> = LazyLock::new(|| {
    [
        (r"\*\*(.*?)\*\*", "$1"),
        (r"\*(.*?)\*", "$1"),
        (r"__(.*?)__", "$1"),
        (r"_(.*?)_", "$1"),
        (r"`(.*?)`", "$1"),
        (r"\[(.*?)\]\(.*?\)", "$1"),
    ]
    .into_iter()
    .map(|(pattern, rep)| Regex::new(pattern).map(|re| (re, rep)))
    .collect()
});

/// Strip emphasis, inline-code and link markers from `text`, then trim.
///
/// # Errors
///
/// Returns the pattern compilation error if the marker table failed to build.
pub fn clean_inline_markup(text: &str) -> Result<String, regex::Error> {
    let patterns = MARKUP.as_ref().map_err(Clone::clone)?;
    let mut out = text.to_owned();
    for (re, rep) in patterns {
        out = re.replace_all(&out, *rep).into_owned();
    }
    Ok(out.trim().to_owned())
}

/// Whether raw paragraph text carried bold markers before cleanup.
#[must_use]
pub fn has_bold_markers(text: &str) -> bool {
    text.contains("**") || text.contains("__")
}
