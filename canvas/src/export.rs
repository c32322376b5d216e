//! Export: hand page scenes to an external rasterizer and archive writer.
//!
//! The engine does not encode images or write archives. It builds each
//! page's display list, passes it to a [`Rasterizer`], and stores the bytes in
//! an [`Archiver`] under `page-NN.<ext>`. Any failure aborts the batch
//! before the archive is finished.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::doc::Page;
use crate::layout::LayoutConfig;
use crate::render::{DisplayList, build_page_display_list};

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: every page is empty")]
    NothingToExport,
    #[error("page {0} does not exist")]
    NoSuchPage(usize),
    #[error("image quality must be in (0, 1], got {0}")]
    InvalidQuality(f64),
    #[error("export scale must be at least 1")]
    InvalidScale,
    #[error("unknown image format {0:?}; expected png, jpeg or webp")]
    UnknownFormat(String),
    #[error("rasterizing page {page} failed")]
    Rasterize {
        page: usize,
        #[source]
        source: BoxError,
    },
    #[error("writing archive entry {entry} failed")]
    Archive {
        entry: String,
        #[source]
        source: BoxError,
    },
    #[error("finishing archive failed")]
    Finish(#[source] BoxError),
}

/// Output image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// File extension, which is also the format's name.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            _ => Err(ExportError::UnknownFormat(s.to_owned())),
        }
    }
}

/// How the rasterizer should encode each page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub format: ImageFormat,
    /// Lossy encoder quality in `(0, 1]`; ignored for png.
    pub quality: f64,
    /// Integer pixel multiplier over the canvas size.
    pub scale: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { format: ImageFormat::Png, quality: 0.95, scale: 2 }
    }
}

impl ExportOptions {
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidQuality`] or [`ExportError::InvalidScale`].
    pub fn validate(&self) -> Result<(), ExportError> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(ExportError::InvalidQuality(self.quality));
        }
        if self.scale == 0 {
            return Err(ExportError::InvalidScale);
        }
        Ok(())
    }
}

/// Turns one page scene into encoded image bytes.
pub trait Rasterizer {
    type Error: StdError + Send + Sync + 'static;

    fn rasterize(&mut self, scene: &DisplayList, options: &ExportOptions) -> Result<Vec<u8>, Self::Error>;

    /// Extension used for entry names. Defaults to the format's own.
    fn file_extension(&self, format: ImageFormat) -> &str {
        format.extension()
    }
}

/// Collects named entries into an archive.
pub trait Archiver {
    type Output;
    type Error: StdError + Send + Sync + 'static;

    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), Self::Error>;

    fn finish(self) -> Result<Self::Output, Self::Error>;
}

/// Archive entry name for a 1-based page number.
#[must_use]
pub fn entry_name(page_number: usize, extension: &str) -> String {
    format!("page-{page_number:02}.{extension}")
}

/// Download name for a batch archive of `page_count` pages.
#[must_use]
pub fn archive_name(page_count: usize, timestamp: &str) -> String {
    format!("md2pic-batch-{page_count}pages-{timestamp}.zip")
}

/// Download name for a single exported page.
#[must_use]
pub fn page_file_name(page_number: usize, timestamp: &str, extension: &str) -> String {
    format!("md2pic-page{page_number}-{timestamp}.{extension}")
}

/// Rasterize one page (`index` is zero-based).
///
/// # Errors
///
/// Returns [`ExportError`] for bad options, a missing or empty page, or a
/// rasterizer failure.
pub fn export_page<R: Rasterizer>(
    pages: &[Page],
    index: usize,
    config: &LayoutConfig,
    options: &ExportOptions,
    rasterizer: &mut R,
) -> Result<Vec<u8>, ExportError> {
    options.validate()?;
    let page = pages.get(index).ok_or(ExportError::NoSuchPage(index + 1))?;
    if page.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let scene = build_page_display_list(page, config);
    rasterizer
        .rasterize(&scene, options)
        .map_err(|e| ExportError::Rasterize { page: index + 1, source: Box::new(e) })
}

/// Rasterize every non-empty page in order and write them to `archiver`.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] if every page is empty, or the
/// first rasterizer or archiver failure; the archive is not finished then.
pub fn export_pages<R: Rasterizer, A: Archiver>(
    pages: &[Page],
    config: &LayoutConfig,
    options: &ExportOptions,
    rasterizer: &mut R,
    mut archiver: A,
) -> Result<A::Output, ExportError> {
    options.validate()?;
    if pages.iter().all(Page::is_empty) {
        return Err(ExportError::NothingToExport);
    }

    let mut written = 0usize;
    for (i, page) in pages.iter().enumerate() {
        let number = i + 1;
        if page.is_empty() {
            debug!(page = number, "skipping empty page");
            continue;
        }
        let scene = build_page_display_list(page, config);
        let bytes = rasterizer
            .rasterize(&scene, options)
            .map_err(|e| ExportError::Rasterize { page: number, source: Box::new(e) })?;
        let name = entry_name(number, rasterizer.file_extension(options.format));
        archiver
            .add_entry(&name, &bytes)
            .map_err(|e| ExportError::Archive { entry: name.clone(), source: Box::new(e) })?;
        debug!(entry = %name, bytes = bytes.len(), "page exported");
        written += 1;
    }

    let output = archiver.finish().map_err(|e| ExportError::Finish(Box::new(e)))?;
    info!(pages = pages.len(), written, format = %options.format, "batch export finished");
    Ok(output)
}
