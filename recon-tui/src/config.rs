//! User settings loaded from `config.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use recon_table::{TableOptions, TableVariant};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show the search line on every page.
    pub searchable: bool,
    /// Replaces each page's own search placeholder when set.
    pub search_placeholder: Option<String>,
    pub variant: TableVariant,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    /// Title of the page shown first, matched case-insensitively.
    pub start_page: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            searchable: true,
            search_placeholder: None,
            variant: TableVariant::Default,
            log_level: "debug".to_string(),
            start_page: None,
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings: Self = serde_json::from_str(&text).map_err(|e| config_error(path, e))?;
        settings.level().map_err(|message| AppError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(settings)
    }

    /// Parsed `log_level`.
    pub fn level(&self) -> std::result::Result<LevelFilter, String> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| format!("unknown log level {:?}", self.log_level))
    }

    /// Table options for a page whose own placeholder is `placeholder`.
    pub fn table_options(&self, placeholder: &str) -> TableOptions {
        TableOptions::new()
            .searchable(self.searchable)
            .search_placeholder(self.search_placeholder.as_deref().unwrap_or(placeholder))
            .variant(self.variant)
    }
}

fn config_error(path: &Path, error: serde_json::Error) -> AppError {
    AppError::Config {
        path: PathBuf::from(path),
        message: error.to_string(),
    }
}
