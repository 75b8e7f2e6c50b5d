//! Display helpers shared by the pages.

use recon_table::{FieldValue, Fragment, Span};

/// Whole US dollars with thousands separators: `$1,000,000`, `-$25,000`.
pub fn currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// A ratio as a percentage with two decimals: `0.027` is `2.70%`.
pub fn percentage(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Variance coloured by sign. Not searchable, like any styled value.
pub fn variance(ratio: f64) -> FieldValue {
    let color = if ratio > 0.0 {
        "success"
    } else if ratio < 0.0 {
        "error"
    } else {
        "muted"
    };
    Fragment::new()
        .span(Span::new(percentage(ratio)).color(color))
        .into()
}

/// A bold coloured label that search can still find by its text.
pub fn badge(label: &str, color: &str) -> FieldValue {
    Fragment::new()
        .span(Span::new(label).color(color).bold())
        .searchable(label)
        .into()
}

/// Inline code, e.g. a rule condition.
pub fn code(text: &str) -> FieldValue {
    Fragment::new()
        .span(Span::new(text).color("code"))
        .searchable(text)
        .into()
}
