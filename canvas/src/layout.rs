//! Block layout planner: content blocks → a vertical stack of positioned elements.
//!
//! DESIGN
//! ======
//! Layout runs in three passes over the block stream:
//!
//! 1. A coarse density pre-pass estimates how tall the whole document would
//!    be at full size and divides by the canvas height.
//! 2. The density picks font tiers and inter-element spacing from fixed step
//!    bands (denser content ⇒ smaller type, tighter spacing). The band edges
//!    (0.7 / 1.0 / 1.2 / 1.5) are tuned values and are kept exactly.
//! 3. Blocks are placed top to bottom in a single column, each becoming one
//!    element whose height is an estimate from character and line counts.
//!    The finished stack is then shifted down by a density-dependent amount
//!    when it does not fill the canvas.
//!
//! Heights are estimates only; nothing here measures real glyphs.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::blocks::{BlockError, ContentBlock, clean_inline_markup, has_bold_markers};
use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_PADDING, MIN_ELEMENT_WIDTH};
use crate::doc::{ACCENT, CODE_BACKGROUND, CODE_INK, Element, INK, QUOTE_BACKGROUND, QUOTE_INK, TextAlign};

/// Failure of a layout call. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("malformed content block: {0}")]
    Block(#[from] BlockError),
    #[error("canvas size {width}x{height} must be finite and positive")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("padding {padding} leaves a column narrower than {min}px on a {width}px canvas", min = MIN_ELEMENT_WIDTH)]
    InvalidPadding { padding: f64, width: f64 },
    #[error("inline markup pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// Output frame geometry shared by layout and pagination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Margin on every side of the content column.
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { canvas_width: DEFAULT_CANVAS_WIDTH, canvas_height: DEFAULT_CANVAS_HEIGHT, padding: DEFAULT_PADDING }
    }
}

impl LayoutConfig {
    /// Width of the single content column.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.canvas_width - 2.0 * self.padding
    }

    /// Reject canvas geometry that cannot hold a column.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCanvas`] for non-finite or non-positive
    /// dimensions and [`LayoutError::InvalidPadding`] when the padding is
    /// negative or leaves a column narrower than the minimum element width.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let dims_ok = self.canvas_width.is_finite()
            && self.canvas_height.is_finite()
            && self.canvas_width > 0.0
            && self.canvas_height > 0.0;
        if !dims_ok {
            return Err(LayoutError::InvalidCanvas { width: self.canvas_width, height: self.canvas_height });
        }
        if !self.padding.is_finite() || self.padding < 0.0 || self.content_width() < MIN_ELEMENT_WIDTH {
            return Err(LayoutError::InvalidPadding { padding: self.padding, width: self.canvas_width });
        }
        Ok(())
    }
}

/// Font and spacing parameters chosen from a density value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityProfile {
    pub density: f64,
    /// Vertical gap between consecutive elements.
    pub spacing: f64,
    /// Paragraph font size.
    pub base_font: f64,
    /// Heading font sizes for levels 1, 2 and 3+.
    pub heading_fonts: [f64; 3],
}

impl DensityProfile {
    #[must_use]
    pub fn from_density(density: f64) -> Self {
        let base_font = if density > 1.2 {
            28.0
        } else if density > 1.0 {
            30.0
        } else {
            32.0
        };
        let heading_fonts = if density > 1.2 {
            [60.0, 48.0, 36.0]
        } else if density > 1.0 {
            [66.0, 52.0, 40.0]
        } else {
            [72.0, 56.0, 44.0]
        };
        Self { density, spacing: spacing_for_density(density), base_font, heading_fonts }
    }

    /// Heading font size for `level`; levels past 3 share the third tier.
    #[must_use]
    pub fn heading_font(&self, level: u8) -> f64 {
        match level {
            1 => self.heading_fonts[0],
            2 => self.heading_fonts[1],
            _ => self.heading_fonts[2],
        }
    }
}

/// Inter-element spacing band for a density value.
#[must_use]
pub fn spacing_for_density(density: f64) -> f64 {
    if density > 1.5 {
        15.0
    } else if density > 1.2 {
        25.0
    } else if density > 1.0 {
        35.0
    } else if density > 0.7 {
        45.0
    } else {
        55.0
    }
}

/// Coarse full-size height estimate of `blocks` divided by `canvas_height`.
#[must_use]
pub fn estimate_density(blocks: &[ContentBlock], canvas_height: f64) -> f64 {
    // Starting margin for the whole stack.
    let mut estimated = 200.0;
    for block in blocks {
        estimated += match block {
            ContentBlock::Heading { level, .. } => {
                let size = match level {
                    1 => 72.0,
                    2 => 56.0,
                    _ => 44.0,
                };
                size * 1.8 + 60.0
            }
            ContentBlock::Paragraph { .. } => 32.0 * 1.8 + 40.0,
            ContentBlock::List { items } => {
                #[allow(clippy::cast_precision_loss)]
                let n = items.len().max(1) as f64;
                n * 28.0 * 1.5 + 40.0
            }
            ContentBlock::Blockquote { .. } | ContentBlock::Code { .. } | ContentBlock::Table { .. } => 60.0,
        };
    }
    estimated / canvas_height
}

/// Estimated box height for `text` at `font_size` in a column `content_width` wide.
///
/// `max(lines × font × 1.8 + bonus, 80)`, where `lines` is the larger of the
/// explicit line count and the wrapped count from a 0.6 × font glyph width.
#[must_use]
pub fn estimate_text_height(text: &str, font_size: f64, content_width: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let explicit_lines = text.split('\n').count() as f64;
    let chars_per_line = (content_width / (font_size * 0.6)).floor().max(1.0);
    #[allow(clippy::cast_precision_loss)]
    let wrapped_lines = (text.chars().count() as f64 / chars_per_line).ceil();
    let lines = explicit_lines.max(wrapped_lines);

    let bonus = if font_size > 50.0 {
        80.0
    } else if font_size > 30.0 {
        60.0
    } else {
        40.0
    };
    (lines * font_size * 1.8 + bonus).max(80.0)
}

/// Table box height from its row count.
#[must_use]
pub fn table_height(row_count: usize) -> f64 {
    const HEADER: f64 = 70.0;
    const ROW: f64 = 60.0;
    const MARGIN: f64 = 60.0;
    #[allow(clippy::cast_precision_loss)]
    let rows = row_count as f64;
    HEADER + rows * ROW + MARGIN
}

/// Serialize a table as pipe-delimited lines: header, separator, rows.
#[must_use]
pub fn format_table(header_cells: &[String], rows: &[Vec<String>]) -> String {
    let mut out = header_cells.join(" | ");
    out.push('\n');
    out.push_str(&vec!["---"; header_cells.len()].join(" | "));
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(" | "));
        out.push('\n');
    }
    out.trim().to_owned()
}

/// Text color that marks each heading level.
#[must_use]
pub fn heading_color(level: u8) -> &'static str {
    match level {
        1 => "#dc2626",
        2 => "#7c3aed",
        3 => "#ea580c",
        _ => INK,
    }
}

/// Lay `blocks` out as a single column of elements on one canvas.
///
/// Produces exactly one element per block, in input order. Empty input
/// yields an empty list.
///
/// # Errors
///
/// Returns [`LayoutError`] if the canvas geometry is unusable or any block is
/// malformed; no elements are produced in that case.
pub fn layout(blocks: &[ContentBlock], config: &LayoutConfig) -> Result<Vec<Element>, LayoutError> {
    config.validate()?;
    for (index, block) in blocks.iter().enumerate() {
        block.validate(index)?;
    }
    if blocks.is_empty() {
        return Ok(Vec::new());
    }

    let profile = DensityProfile::from_density(estimate_density(blocks, config.canvas_height));
    let mut elements = blocks
        .iter()
        .map(|block| element_from_block(block, config, &profile))
        .collect::<Result<Vec<_>, _>>()?;

    let shift = arrange(&mut elements, config, profile.spacing);
    debug!(
        blocks = blocks.len(),
        density = profile.density,
        spacing = profile.spacing,
        shift,
        "layout planned"
    );
    Ok(elements)
}

/// Stack `elements` in one column from the top padding, keeping each height,
/// then apply the density-dependent vertical centering.
///
/// Returns the downward shift that was applied.
pub fn arrange(elements: &mut [Element], config: &LayoutConfig, spacing: f64) -> f64 {
    if elements.is_empty() {
        return 0.0;
    }
    let mut y = config.padding;
    for el in elements.iter_mut() {
        el.x = config.padding;
        el.y = y;
        el.width = config.content_width();
        y += el.height + spacing;
    }

    let total = y - spacing + config.padding;
    let shift = center_offset(total, config);
    if shift > 0.0 {
        for el in elements.iter_mut() {
            el.y += shift;
        }
    }
    shift
}

/// Downward shift for a stack `total_height` tall (paddings included).
///
/// Dense stacks get at most half the padding, medium stacks a third of the
/// slack, sparse stacks are centred. The bottom never passes
/// `canvas_height - padding / 2`.
#[must_use]
pub fn center_offset(total_height: f64, config: &LayoutConfig) -> f64 {
    if total_height >= config.canvas_height {
        return 0.0;
    }
    let slack = config.canvas_height - total_height;
    let density = total_height / config.canvas_height;
    let offset = if density > 0.9 {
        (config.padding * 0.5).max(0.0)
    } else if density > 0.7 {
        (slack * 0.3).max(config.padding * 0.7)
    } else {
        (slack / 2.0).max(config.padding)
    };
    let max_offset = config.canvas_height - total_height - config.padding * 0.5;
    offset.min(max_offset.max(0.0))
}

fn element_from_block(
    block: &ContentBlock,
    config: &LayoutConfig,
    profile: &DensityProfile,
) -> Result<Element, LayoutError> {
    let width = config.content_width();
    let mut el = Element {
        id: Uuid::new_v4(),
        kind: block.kind(),
        level: None,
        x: config.padding,
        y: 0.0,
        width,
        height: 0.0,
        content: String::new(),
        font_size: profile.base_font,
        color: INK.to_owned(),
        background_color: None,
        text_align: TextAlign::Center,
    };

    // Text blocks are measured on their source text, markup included.
    let measured = match block {
        ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } | ContentBlock::Blockquote { text } => {
            Some(text.as_str())
        }
        _ => None,
    };

    match block {
        ContentBlock::Heading { level, text } => {
            el.level = Some(*level);
            el.font_size = profile.heading_font(*level);
            el.color = heading_color(*level).to_owned();
            el.content = clean_inline_markup(text)?;
        }
        ContentBlock::Paragraph { text } => {
            el.content = clean_inline_markup(text)?;
            if has_bold_markers(text) {
                el.color = ACCENT.to_owned();
            }
        }
        ContentBlock::List { items } => {
            let lines = items
                .iter()
                .map(|item| clean_inline_markup(item).map(|line| format!("• {line}")))
                .collect::<Result<Vec<_>, _>>()?;
            el.content = lines.join("\n");
            el.font_size = 28.0;
            el.text_align = TextAlign::Left;
        }
        ContentBlock::Blockquote { text } => {
            el.content = clean_inline_markup(text)?;
            el.font_size = 26.0;
            el.color = QUOTE_INK.to_owned();
            el.background_color = Some(QUOTE_BACKGROUND.to_owned());
            el.text_align = TextAlign::Left;
        }
        ContentBlock::Code { text } => {
            text.clone_into(&mut el.content);
            el.font_size = 24.0;
            el.color = CODE_INK.to_owned();
            el.background_color = Some(CODE_BACKGROUND.to_owned());
            el.text_align = TextAlign::Left;
        }
        ContentBlock::Table { header_cells, rows } => {
            el.content = format_table(header_cells, rows);
            el.font_size = 24.0;
            el.height = table_height(rows.len());
            return Ok(el);
        }
    }

    el.height = estimate_text_height(measured.unwrap_or(&el.content), el.font_size, width);
    Ok(el)
}
