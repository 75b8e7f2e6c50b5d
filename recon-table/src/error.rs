//! Error types

use thiserror::Error;

/// Errors raised when handing data to a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The rows violate the table's structural contract.
    #[error("invalid table data: {0}")]
    InvalidTableData(Violation),
}

/// What made a row set invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Two rows anywhere in the tree share an id.
    #[error("row id `{id}` appears more than once (second occurrence at depth {depth})")]
    DuplicateRowId { id: String, depth: usize },

    /// A row has an empty id.
    #[error("row at depth {depth} under {parent} has an empty id")]
    EmptyRowId { depth: usize, parent: String },
}

impl From<Violation> for TableError {
    fn from(violation: Violation) -> Self {
        Self::InvalidTableData(violation)
    }
}
