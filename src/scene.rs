//! Directory export backends.
//!
//! The binary has no image encoder, so each page is written as its JSON
//! display list, the exact input an external rasterizer would receive.
//! Entries are staged as hidden `.part` files and only renamed into place by
//! [`DirArchiver`]'s `finish`, so a failed batch never leaves finished pages.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canvas::export::{Archiver, ExportOptions, ImageFormat, Rasterizer};
use canvas::render::DisplayList;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CliError;

/// Timestamp used in batch and page download names, e.g. `2026-10-17T09-30-00`.
#[must_use]
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SceneFile<'a> {
    format: ImageFormat,
    mime_type: &'static str,
    quality: f64,
    scale: u32,
    /// Output pixel size after scaling.
    pixel_width: f64,
    pixel_height: f64,
    scene: &'a DisplayList,
}

/// Write one exported page as `dir/name`, creating `dir` if needed.
pub fn write_page(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Write { path: dir.to_path_buf(), source })?;
    let path = dir.join(name);
    fs::write(&path, bytes).map_err(|source| CliError::Write { path: path.clone(), source })?;
    debug!(path = %path.display(), bytes = bytes.len(), "page written");
    Ok(path)
}

/// Writes the display list as pretty JSON instead of pixels.
#[derive(Debug, Default)]
pub struct JsonSceneRasterizer;

impl Rasterizer for JsonSceneRasterizer {
    type Error = serde_json::Error;

    fn rasterize(&mut self, scene: &DisplayList, options: &ExportOptions) -> Result<Vec<u8>, serde_json::Error> {
        let scale = f64::from(options.scale);
        let file = SceneFile {
            format: options.format,
            mime_type: options.format.mime_type(),
            quality: options.quality,
            scale: options.scale,
            pixel_width: scene.width * scale,
            pixel_height: scene.height * scale,
            scene,
        };
        let mut bytes = serde_json::to_vec_pretty(&file)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn file_extension(&self, _format: ImageFormat) -> &str {
        "json"
    }
}

/// Archives entries as plain files in one directory.
#[derive(Debug)]
pub struct DirArchiver {
    dir: PathBuf,
    /// `(staged, final)` paths, in entry order.
    staged: Vec<(PathBuf, PathBuf)>,
}

impl DirArchiver {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: &Path) -> Result<Self, CliError> {
        fs::create_dir_all(dir).map_err(|source| CliError::Write { path: dir.to_path_buf(), source })?;
        Ok(Self { dir: dir.to_path_buf(), staged: Vec::new() })
    }

    fn discard_staged(&mut self) {
        for (part, _) in self.staged.drain(..) {
            if let Err(e) = fs::remove_file(&part) {
                warn!(path = %part.display(), error = %e, "failed to remove staged entry");
            }
        }
    }
}

impl Archiver for DirArchiver {
    type Output = Vec<PathBuf>;
    type Error = io::Error;

    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), io::Error> {
        let plain = Path::new(name).file_name().is_some_and(|f| f == OsStr::new(name));
        if !plain {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("entry name {name:?} is not a file name")));
        }
        let target = self.dir.join(name);
        let part = self.dir.join(format!(".{name}.part"));
        fs::write(&part, bytes)?;
        debug!(path = %part.display(), bytes = bytes.len(), "entry staged");
        self.staged.push((part, target));
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<PathBuf>, io::Error> {
        let staged = std::mem::take(&mut self.staged);
        let mut written = Vec::with_capacity(staged.len());
        let mut pending = staged.into_iter();
        while let Some((part, target)) = pending.next() {
            if let Err(e) = fs::rename(&part, &target) {
                self.staged = std::iter::once((part, target)).chain(pending).collect();
                return Err(e);
            }
            written.push(target);
        }
        Ok(written)
    }
}

impl Drop for DirArchiver {
    fn drop(&mut self) {
        self.discard_staged();
    }
}
