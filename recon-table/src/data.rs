//! Validated table input.

use std::collections::HashSet;

use crate::column::Column;
use crate::error::{TableError, Violation};
use crate::row::Row;

/// Columns and rows that passed boundary validation.
///
/// Row ids must be non-empty and unique across the entire tree. Column
/// keys are not checked; a row missing a column's key renders an empty
/// cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl TableData {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self, TableError> {
        validate_rows(&rows)?;
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Total number of rows in the tree, nested rows included.
    pub fn total_rows(&self) -> usize {
        self.rows.iter().map(|row| 1 + row.descendant_count()).sum()
    }

    /// Find a row anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<&Row> {
        find_in(&self.rows, id)
    }

    pub fn into_parts(self) -> (Vec<Column>, Vec<Row>) {
        (self.columns, self.rows)
    }
}

fn find_in<'a>(rows: &'a [Row], id: &str) -> Option<&'a Row> {
    for row in rows {
        if row.id == id {
            return Some(row);
        }
        if let Some(found) = find_in(&row.children, id) {
            return Some(found);
        }
    }
    None
}

/// Check id uniqueness over the whole tree.
///
/// Children of non-expandable rows are checked too.
pub fn validate_rows(rows: &[Row]) -> Result<(), Violation> {
    let mut seen = HashSet::new();
    // Explicit stack: (row, depth, parent id)
    let mut stack: Vec<(&Row, usize, Option<&str>)> =
        rows.iter().rev().map(|row| (row, 0, None)).collect();

    while let Some((row, depth, parent)) = stack.pop() {
        if row.id.is_empty() {
            return Err(Violation::EmptyRowId {
                depth,
                parent: match parent {
                    Some(id) => format!("row `{id}`"),
                    None => "the top level".to_string(),
                },
            });
        }
        if !seen.insert(row.id.as_str()) {
            log::warn!("rejecting table data: duplicate row id {:?}", row.id);
            return Err(Violation::DuplicateRowId {
                id: row.id.clone(),
                depth,
            });
        }
        for child in row.children.iter().rev() {
            stack.push((child, depth + 1, Some(row.id.as_str())));
        }
    }

    Ok(())
}
