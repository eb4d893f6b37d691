#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cpix_engine_edit::EditorOptions;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

#[derive(Parser, Debug)]
#[command(version, about = "Create and edit cpix ASCII art projects", long_about = None)]
pub struct Args {
    /// Editor options (TOML). Defaults to the user config file if present.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Write a rotating log file into this directory
    #[arg(long, value_name = "DIR", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a project with one empty layer
    New {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        hblocks: Option<usize>,
        #[arg(long)]
        vblocks: Option<usize>,
        #[arg(long)]
        ppb: Option<u32>,
        #[arg(long)]
        resolution: Option<usize>,
        #[arg(long)]
        cpc: Option<usize>,
    },
    /// Print dimensions, layers and palette usage
    Info { file: PathBuf },
    /// Add a layer on top of the stack
    AddLayer {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        resolution: Option<usize>,
        #[arg(long)]
        cpc: Option<usize>,
    },
    /// Write text into a layer
    Paint {
        file: PathBuf,
        /// Layer id, defaults to the top layer
        #[arg(long)]
        layer: Option<u64>,
        #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        /// Text to write; `\n` starts a new row
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "#ffffff")]
        fg: String,
        #[arg(long)]
        bg: Option<String>,
        /// Font name, registered if new
        #[arg(long)]
        font: Option<String>,
    },
    /// Clear a rectangle of a layer (corners inclusive)
    Erase {
        file: PathBuf,
        #[arg(long)]
        layer: Option<u64>,
        #[arg(long, allow_negative_numbers = true)]
        x0: i32,
        #[arg(long, allow_negative_numbers = true)]
        y0: i32,
        #[arg(long, allow_negative_numbers = true)]
        x1: i32,
        #[arg(long, allow_negative_numbers = true)]
        y1: i32,
    },
    /// Print a layer as text
    Dump {
        file: PathBuf,
        #[arg(long)]
        layer: Option<u64>,
    },
}

fn start_logger(log_dir: Option<&Path>) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str("info")?;
    let logger = if let Some(log_dir) = log_dir {
        std::fs::create_dir_all(log_dir)?;
        logger
            .log_to_file(FileSpec::default().directory(log_dir).basename("cpix").suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
            .duplicate_to_stderr(Duplicate::Warn)
    } else {
        logger
    };
    Ok(logger.start()?)
}

fn default_options_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "GitHub", "cpix").map(|dirs| dirs.config_dir().join("options.toml"))
}

fn load_options(path: Option<&Path>) -> anyhow::Result<EditorOptions> {
    if let Some(path) = path {
        return Ok(EditorOptions::load(path)?);
    }
    if let Some(path) = default_options_file() {
        if path.exists() {
            return Ok(EditorOptions::load(&path)?);
        }
    }
    Ok(EditorOptions::default())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger(args.log_file.as_deref())?;
    let options = load_options(args.config.as_deref())?;
    log::debug!("history limit {}", options.history_limit);
    commands::run(args.command, options)
}
