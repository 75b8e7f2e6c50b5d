//! Table rows and their child rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// One addressable entry in the table, optionally owning child rows.
///
/// Rows own their children by value, so a row tree is always acyclic and
/// single-parent. Expansion state is not stored on the row; the table
/// keeps it in a separate map keyed by [`Row::id`], which is why ids must
/// be unique across the whole tree and stable across data refreshes.
///
/// # Example
///
/// ```
/// use recon_table::Row;
///
/// let row = Row::new("1")
///     .field("cusip", "912828XM5")
///     .field("internalPosition", 1_000_000i64)
///     .children(vec![Row::new("1a").field("cusip", "912828XM5-A")]);
///
/// assert!(row.expandable);
/// assert_eq!(row.children.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique, stable identifier.
    pub id: String,

    /// Cell values keyed by column key.
    #[serde(default, alias = "data")]
    pub fields: BTreeMap<String, FieldValue>,

    /// Child rows, drawn below this row when it is expanded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Row>,

    /// Whether the row shows a disclosure control.
    ///
    /// An expandable row with no children still shows the control;
    /// toggling it reveals nothing.
    #[serde(default)]
    pub expandable: bool,

    /// Opaque styling annotation handed to the theme untouched.
    #[serde(default, alias = "className", skip_serializing_if = "Option::is_none")]
    pub style_hint: Option<String>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
            children: Vec::new(),
            expandable: false,
            style_hint: None,
        }
    }

    /// Set a field value.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach child rows and mark the row expandable.
    pub fn children(mut self, children: Vec<Row>) -> Self {
        self.children = children;
        self.expandable = true;
        self
    }

    /// Set the expandable flag explicitly.
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    /// Attach an opaque style hint.
    pub fn style_hint(mut self, hint: impl Into<String>) -> Self {
        self.style_hint = Some(hint.into());
        self
    }

    /// Get a field value by column key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Children that become visible when this row is expanded.
    ///
    /// Non-expandable rows never reveal children, even if they own some.
    pub fn revealable_children(&self) -> &[Row] {
        if self.expandable {
            &self.children
        } else {
            &[]
        }
    }

    /// Number of rows in this row's subtree, excluding itself.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}
