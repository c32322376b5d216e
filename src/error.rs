use std::path::PathBuf;

use canvas::engine::ConfigError;
use canvas::export::ExportError;
use canvas::layout::LayoutError;
use canvas::paginate::InvalidSplitLevel;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    SplitLevel(#[from] InvalidSplitLevel),
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("replay event {index}: no element at index {element} on the current page")]
    NoSuchElement { index: usize, element: usize },
}
