//! Editor configuration for the binary.
//!
//! Values are layered, later layers winning: built-in defaults, the JSON file
//! named by `--config`, `MD2PIC_*` environment variables, then flags. Clap
//! already folds env and flags into one `Option` per setting.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::engine::EditorConfig;
use canvas::paginate::SplitLevel;
use clap::Args;
use tracing::debug;

use crate::error::CliError;

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// JSON file with editor settings (camelCase keys, all optional).
    #[arg(long, env = "MD2PIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "MD2PIC_CANVAS_WIDTH", global = true)]
    pub canvas_width: Option<f64>,

    #[arg(long, env = "MD2PIC_CANVAS_HEIGHT", global = true)]
    pub canvas_height: Option<f64>,

    #[arg(long, env = "MD2PIC_PADDING", global = true)]
    pub padding: Option<f64>,

    /// Heading depth that starts a new page (1 disables splitting).
    #[arg(long, env = "MD2PIC_SPLIT_LEVEL", global = true)]
    pub split_level: Option<u8>,

    #[arg(long, env = "MD2PIC_SNAP_THRESHOLD", global = true)]
    pub snap_threshold: Option<f64>,

    #[arg(long, env = "MD2PIC_HISTORY_CAPACITY", global = true)]
    pub history_capacity: Option<usize>,
}

/// Build and validate the effective configuration.
pub fn resolve(args: &ConfigArgs) -> Result<EditorConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_file(path)?,
        None => EditorConfig::default(),
    };

    if let Some(v) = args.canvas_width {
        config.layout.canvas_width = v;
    }
    if let Some(v) = args.canvas_height {
        config.layout.canvas_height = v;
    }
    if let Some(v) = args.padding {
        config.layout.padding = v;
    }
    if let Some(v) = args.split_level {
        config.split_level = SplitLevel::try_from(v)?;
    }
    if let Some(v) = args.snap_threshold {
        config.snap_threshold = v;
    }
    if let Some(v) = args.history_capacity {
        config.history_capacity = v;
    }

    config.validate()?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn load_file(path: &Path) -> Result<EditorConfig, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse { path: path.to_path_buf(), source })
}
