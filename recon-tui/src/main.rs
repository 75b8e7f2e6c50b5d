mod app;
mod config;
mod dataset;
mod error;
mod form;
mod format;
mod pages;
mod paths;
mod summary;
mod terminal;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use clap::Parser;
use recon_table::TableVariant;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::terminal::Terminal;

/// Terminal reconciliation dashboard.
#[derive(Parser, Debug)]
#[clap(name = "recon-tui", version)]
struct Args {
    /// Extra page loaded from a JSON dataset file.
    #[clap(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Settings file to use instead of the default location.
    #[clap(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[clap(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Use the compact table variant.
    #[clap(long)]
    compact: bool,
}

impl Args {
    /// Command line values win over the settings file.
    fn apply(&self, settings: &mut Settings) {
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
        if self.compact {
            settings.variant = TableVariant::Compact;
        }
    }
}

fn init_logging(level: LevelFilter) -> Result<()> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(&path)?;
    WriteLogger::init(level, Config::default(), file).map_err(io::Error::other)?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().or_else(paths::config_file);
    let mut settings = match &config_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    args.apply(&mut settings);
    let level = settings.level().map_err(|message| AppError::Config {
        path: PathBuf::from("--log-level"),
        message,
    })?;

    init_logging(level)?;
    log::info!("recon-tui {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        log::debug!("settings from {}: {:?}", path.display(), settings);
    }

    let mut pages = pages::builtin(&settings)?;
    if let Some(path) = &args.dataset {
        pages.push(dataset::load(path, &settings)?);
    }

    let mut app = App::new(pages, app::dashboard_theme());
    if let Some(start) = &settings.start_page
        && !app.open(start)
    {
        log::warn!("start page {:?} not found", start);
    }

    let mut terminal = Terminal::new()?;
    app.run(&mut terminal)
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
