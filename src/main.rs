mod config;
mod error;
mod replay;
mod scene;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use canvas::blocks::ContentBlock;
use canvas::engine::EngineCore;
use canvas::export::{
    ExportError, ExportOptions, ImageFormat, Rasterizer, archive_name, export_page, export_pages, page_file_name,
};
use canvas::layout::layout;
use canvas::paginate::paginate_blocks;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ConfigArgs;
use crate::error::CliError;
use crate::replay::ReplayEvent;
use crate::scene::{DirArchiver, JsonSceneRasterizer, export_timestamp};

#[derive(Parser, Debug)]
#[command(name = "md2pic", about = "Lay out markdown blocks as picture cards")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out every block on one page and print the elements.
    Layout { blocks: PathBuf },
    /// Split at headings (see --split-level) and print the pages.
    Paginate { blocks: PathBuf },
    /// Write each page's scene to `<out>/page-NN.json`, or one page with --page.
    Export {
        blocks: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Export only this 1-based page.
        #[arg(long)]
        page: Option<usize>,
        #[arg(long, env = "MD2PIC_EXPORT_FORMAT", default_value_t = ImageFormat::Png)]
        format: ImageFormat,
        #[arg(long, env = "MD2PIC_EXPORT_QUALITY", default_value_t = 0.95)]
        quality: f64,
        #[arg(long, env = "MD2PIC_EXPORT_SCALE", default_value_t = 2)]
        scale: u32,
    },
    /// Drive the editor with a scripted event file and print the result.
    Replay { blocks: PathBuf, events: PathBuf },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportManifest {
    /// Download name: the batch archive, or the single page file.
    name: String,
    format: ImageFormat,
    entries: Vec<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = config::resolve(&cli.config)?;

    match cli.command {
        Command::Layout { blocks } => {
            let blocks: Vec<ContentBlock> = read_json(&blocks)?;
            let elements = layout(&blocks, &config.layout)?;
            print_json(&elements)
        }
        Command::Paginate { blocks } => {
            let blocks: Vec<ContentBlock> = read_json(&blocks)?;
            let pages = paginate_blocks(&blocks, config.split_level, &config.layout)?;
            info!(pages = pages.len(), split_level = config.split_level.get(), "paginated");
            print_json(&pages)
        }
        Command::Export { blocks, out, page, format, quality, scale } => {
            let blocks: Vec<ContentBlock> = read_json(&blocks)?;
            let pages = paginate_blocks(&blocks, config.split_level, &config.layout)?;
            let options = ExportOptions { format, quality, scale };
            options.validate()?;
            let timestamp = export_timestamp(chrono::Utc::now());
            let mut rasterizer = JsonSceneRasterizer;

            let (name, entries) = match page {
                Some(number) => {
                    let index = number.checked_sub(1).ok_or(ExportError::NoSuchPage(number))?;
                    let bytes = export_page(&pages, index, &config.layout, &options, &mut rasterizer)?;
                    let name = page_file_name(number, &timestamp, rasterizer.file_extension(format));
                    let path = scene::write_page(&out, &name, &bytes)?;
                    (name, vec![path])
                }
                None => {
                    let archiver = DirArchiver::create(&out)?;
                    let entries = export_pages(&pages, &config.layout, &options, &mut rasterizer, archiver)?;
                    (archive_name(pages.len(), &timestamp), entries)
                }
            };
            info!(%name, entries = entries.len(), out = %out.display(), "export written");
            print_json(&ExportManifest { name, format, entries })
        }
        Command::Replay { blocks, events } => {
            let blocks: Vec<ContentBlock> = read_json(&blocks)?;
            let events: Vec<ReplayEvent> = read_json(&events)?;
            let mut engine = EngineCore::new(config);
            let mut actions = engine.load_blocks(&blocks)?;
            actions.extend(replay::replay(&mut engine, &events)?);
            if engine.input_state().is_dragging() {
                warn!("replay ended mid-gesture; the last drag was not committed");
            }
            print_json(&replay::report(&engine, actions))
        }
    }
}

/// Read a JSON file; `-` reads stdin.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?
    } else {
        fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?
    };
    serde_json::from_str(&raw).map_err(|source| CliError::Parse { path: path.to_path_buf(), source })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
