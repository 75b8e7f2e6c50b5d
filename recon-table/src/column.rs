//! Column descriptors.

use serde::{Deserialize, Serialize};

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column configuration.
///
/// A column projects one field (by `key`) out of every row. Column order
/// is rendering order. Keys are expected to be unique within a table;
/// duplicates are not checked and render the same field twice.
///
/// `sortable` and `filterable` are carried as schema only. The table does
/// not sort or filter per column.
///
/// # Examples
///
/// ```
/// use recon_table::{Alignment, Column};
///
/// let columns = vec![
///     Column::new("cusip", "CUSIP").width(11),
///     Column::new("security", "Security").sortable(),
///     Column::new("internalPosition", "Internal Position").align(Alignment::Right),
/// ];
/// assert!(columns[1].sortable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Field key looked up in each row
    pub key: String,
    /// Column header text
    pub header: String,
    /// Fixed width in terminal columns, sized from content when `None`
    #[serde(default)]
    pub width: Option<u16>,
    /// Horizontal alignment
    #[serde(default)]
    pub align: Alignment,
    /// Declared sort capability
    #[serde(default)]
    pub sortable: bool,
    /// Declared filter capability
    #[serde(default)]
    pub filterable: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            width: None,
            align: Alignment::Left,
            sortable: false,
            filterable: false,
        }
    }

    /// Fix the column width in terminal columns.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Declare the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Declare the column filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }
}
