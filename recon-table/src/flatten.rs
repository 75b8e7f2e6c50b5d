//! Flattening a row tree into the rows actually drawn.

use crate::expansion::ExpansionState;
use crate::row::Row;

/// A row as drawn: the source row plus its nesting depth.
#[derive(Debug, Clone, Copy)]
pub struct VisualRow<'a> {
    pub row: &'a Row,
    /// Nesting level (0 = top level), used only for indentation.
    pub depth: u16,
    /// Whether the row's id is in the expanded set.
    pub expanded: bool,
}

impl<'a> VisualRow<'a> {
    /// Whether the row draws a disclosure control.
    pub fn has_disclosure(&self) -> bool {
        self.row.expandable
    }

    pub fn id(&self) -> &'a str {
        &self.row.id
    }
}

/// Depth-first, pre-order expansion of `rows`.
///
/// A row's children follow it immediately, one level deeper, when the
/// row is expandable and expanded. Collapsed subtrees are skipped whole,
/// whatever the expansion flags inside them say.
pub fn flatten<'a>(rows: &[&'a Row], expansion: &ExpansionState) -> Vec<VisualRow<'a>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        push_row(row, 0, expansion, &mut out);
    }
    out
}

fn push_row<'a>(row: &'a Row, depth: u16, expansion: &ExpansionState, out: &mut Vec<VisualRow<'a>>) {
    let expanded = expansion.is_expanded(&row.id);
    out.push(VisualRow {
        row,
        depth,
        expanded,
    });
    if expanded {
        for child in row.revealable_children() {
            push_row(child, depth + 1, expansion, out);
        }
    }
}
