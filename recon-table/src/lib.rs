//! A searchable, hierarchical table for terminal dashboards.
//!
//! The host supplies [`Column`]s and a tree of [`Row`]s; the
//! [`HierarchicalTable`] filters top-level rows by a search term, expands
//! rows by id, flattens the tree into the rows actually drawn, paints them
//! into a cell [`Buffer`], and reports row clicks back through a callback.
//!
//! The pure parts are usable on their own: [`filter_rows`],
//! [`ExpansionState`] and [`flatten`].

pub mod buffer;
pub mod column;
pub mod data;
pub mod error;
pub mod events;
pub mod expansion;
pub mod filter;
pub mod flatten;
pub mod render;
pub mod row;
pub mod table;
pub mod text;
pub mod theme;
pub mod value;

pub use buffer::{Buffer, Cell, Paint, Rect};
pub use column::{Alignment, Column};
pub use data::TableData;
pub use error::{TableError, Violation};
pub use events::{EventResult, Key, KeyCombo, Modifiers};
pub use expansion::ExpansionState;
pub use filter::{filter_rows, row_matches};
pub use flatten::{VisualRow, flatten};
pub use render::{NO_RESULTS, TableLayout};
pub use row::Row;
pub use table::{HierarchicalTable, TableOptions, TableVariant};
pub use theme::{Color, DefaultTheme, Rgb, TextStyle, Theme};
pub use value::{FieldValue, Fragment, Span};
