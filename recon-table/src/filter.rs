//! Search filter over top-level rows.
//!
//! Matching is shallow: only a top-level row's own fields are tested. A
//! row that fails is dropped with its whole subtree, and a matching child
//! never pulls a non-matching parent into the result. Children of a
//! matching row are kept as-is and shown purely by expansion state.

use crate::row::Row;

/// Return the top-level rows whose fields contain `term`, in order.
///
/// An empty term returns every row. Comparison is a case-insensitive
/// substring test against each field's search text; fields without
/// search text (fragments the host left unsearchable) never match.
pub fn filter_rows<'a>(rows: &'a [Row], term: &str) -> Vec<&'a Row> {
    if term.is_empty() {
        return rows.iter().collect();
    }

    let needle = term.to_lowercase();
    rows.iter()
        .filter(|row| matches_lowercase(row, &needle))
        .collect()
}

/// Whether a single row's own fields contain `term`.
pub fn row_matches(row: &Row, term: &str) -> bool {
    term.is_empty() || matches_lowercase(row, &term.to_lowercase())
}

fn matches_lowercase(row: &Row, needle: &str) -> bool {
    row.fields.values().any(|value| {
        value
            .search_text()
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}
