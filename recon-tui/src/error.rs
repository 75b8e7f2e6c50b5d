use std::io;
use std::path::PathBuf;

use recon_table::TableError;
use thiserror::Error;

/// Errors that stop the dashboard before or while it runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("config error in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
