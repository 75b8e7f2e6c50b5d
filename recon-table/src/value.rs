//! Field values held by rows.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A run of text drawn with one colour and weight.
///
/// `color` is a theme colour name (for example `"success"`), resolved
/// through the host's [`Theme`](crate::Theme) at paint time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn color(mut self, name: impl Into<String>) -> Self {
        self.color = Some(name.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A pre-rendered cell: styled spans plus an optional search text.
///
/// Fragments without a `search` text cannot be matched by the table's
/// search box. Hosts that want a badge or a coloured figure to be
/// searchable supply the raw value alongside the spans.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn searchable(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Concatenated span text, as drawn.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Value of one row field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Fragment(Fragment),
}

impl FieldValue {
    /// String form used by the search filter.
    ///
    /// Numbers use their shortest round-trip decimal form (`1000000`,
    /// `0.027`). Fragments yield their `search` text, or `None` when the
    /// host supplied none.
    pub fn search_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Fragment(f) => f.search.as_deref().map(Cow::Borrowed),
        }
    }

    /// Text as drawn in a cell.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Fragment(f) => Cow::Owned(f.text()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Fragment> for FieldValue {
    fn from(value: Fragment) -> Self {
        Self::Fragment(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_coerce_without_trailing_zeroes() {
        assert_eq!(FieldValue::from(1_000_000i64).search_text().as_deref(), Some("1000000"));
        assert_eq!(FieldValue::from(0.027).search_text().as_deref(), Some("0.027"));
        assert_eq!(FieldValue::from(-1.0).search_text().as_deref(), Some("-1"));
    }

    #[test]
    fn fragment_without_search_is_unsearchable() {
        let badge = Fragment::new().span(Span::new("Matched").color("success"));
        assert_eq!(FieldValue::from(badge.clone()).search_text(), None);
        assert_eq!(FieldValue::from(badge).display_text(), "Matched");
    }

    #[test]
    fn fragment_with_search_text() {
        let badge = Fragment::new()
            .span(Span::new("Near Match").bold())
            .searchable("near_match");
        assert_eq!(FieldValue::from(badge).search_text().as_deref(), Some("near_match"));
    }
}
