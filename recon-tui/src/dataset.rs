//! Extra pages loaded from JSON files.
//!
//! ```json
//! {
//!   "title": "Trades",
//!   "columns": [{ "key": "cusip", "header": "CUSIP" }],
//!   "rows": [{ "id": "1", "fields": { "cusip": "912828XM5" } }]
//! }
//! ```

use std::fs;
use std::path::Path;

use recon_table::{Column, HierarchicalTable, Row, TableData};
use serde::Deserialize;

use crate::config::Settings;
use crate::error::Result;
use crate::pages::Page;

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    title: Option<String>,
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default)]
    search_placeholder: Option<String>,
}

/// Parse and validate a dataset. The title defaults to `fallback_title`.
pub fn parse(json: &str, fallback_title: &str, settings: &Settings) -> Result<Page> {
    let dataset: Dataset = serde_json::from_str(json)?;
    let data = TableData::new(dataset.columns, dataset.rows)?;
    let placeholder = dataset.search_placeholder.as_deref().unwrap_or("Search...");
    let table = HierarchicalTable::from_data(data).with_options(settings.table_options(placeholder));
    let title = dataset.title.unwrap_or_else(|| fallback_title.to_string());
    Ok(Page::new(title, table))
}

/// Load a dataset file; the file stem is the fallback title.
pub fn load(path: &Path, settings: &Settings) -> Result<Page> {
    let json = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Dataset".to_string());
    let page = parse(&json, &stem, settings)?;
    log::info!(
        "loaded dataset {:?} from {}: {} rows",
        page.title,
        path.display(),
        page.table.data().total_rows()
    );
    Ok(page)
}
