//! Counts shown in the strip above a page's table.

use recon_table::{FieldValue, Row};

use crate::format;

/// One labelled figure in the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: String,
    pub value: String,
    /// Theme colour name for the value.
    pub color: Option<String>,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: None,
        }
    }

    pub fn color(mut self, name: impl Into<String>) -> Self {
        self.color = Some(name.into());
        self
    }
}

/// Count top-level rows by the text of their `key` field, in first-seen
/// order. A styled value lends its first span colour to the stat.
pub fn tally(rows: &[Row], key: &str) -> Vec<Stat> {
    let mut counts: Vec<(String, usize, Option<String>)> = Vec::new();
    for value in rows.iter().filter_map(|row| row.get(key)) {
        let label = value.display_text();
        match counts.iter().position(|(seen, ..)| *seen == label) {
            Some(i) => counts[i].1 += 1,
            None => counts.push((label.into_owned(), 1, span_color(value))),
        }
    }
    counts
        .into_iter()
        .map(|(label, count, color)| Stat {
            label,
            value: count.to_string(),
            color,
        })
        .collect()
}

/// Share of rows whose `key` field reads `label`, as a stat.
pub fn rate(rows: &[Row], key: &str, label: &str, name: &str) -> Option<Stat> {
    if rows.is_empty() {
        return None;
    }
    let hits = rows
        .iter()
        .filter(|row| row.get(key).is_some_and(|v| v.display_text() == label))
        .count();
    Some(Stat::new(name, format::percentage(hits as f64 / rows.len() as f64)))
}

fn span_color(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Fragment(fragment) => fragment.spans.first()?.color.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new("1").field("status", format::badge("Matched", "success")),
            Row::new("2").field("status", format::badge("Unmatched", "error")),
            Row::new("3").field("status", format::badge("Matched", "success")),
            Row::new("4").field("status", "Pending"),
            Row::new("5"),
        ]
    }

    #[test]
    fn tally_counts_in_first_seen_order() {
        let stats = tally(&rows(), "status");
        assert_eq!(
            stats,
            [
                Stat::new("Matched", "2").color("success"),
                Stat::new("Unmatched", "1").color("error"),
                Stat::new("Pending", "1"),
            ]
        );
    }

    #[test]
    fn rate_over_all_rows() {
        let stat = rate(&rows(), "status", "Matched", "Match rate").unwrap();
        assert_eq!(stat.value, "40.00%");
        assert_eq!(rate(&[], "status", "Matched", "Match rate"), None);
    }
}
