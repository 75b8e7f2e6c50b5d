//! Terminal cell widths.
//!
//! Widths are measured in `u16` cells to match [`Rect`](crate::Rect).
//! Anything wider than the largest rectangle saturates at `u16::MAX`.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::column::Alignment;

const ELLIPSIS: char = '…';

/// Cells taken by `c`. Control characters take none.
pub fn char_width(c: char) -> u16 {
    c.width().map_or(0, |w| w as u16)
}

/// Cells taken by `s`, saturating at `u16::MAX`.
pub fn cells(s: &str) -> u16 {
    s.width().min(u16::MAX as usize) as u16
}

/// `s` cut down to `max` cells. A cut string ends in `…`.
pub fn fit(s: &str, max: u16) -> Cow<'_, str> {
    if s.width() <= max as usize {
        return Cow::Borrowed(s);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }
    let room = (max - 1) as usize;
    let mut used = 0usize;
    let end = s
        .char_indices()
        .find(|&(_, ch)| {
            used += char_width(ch) as usize;
            used > room
        })
        .map_or(s.len(), |(i, _)| i);
    Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
}

/// Offset of `text` cells inside `available` cells.
pub fn align_offset(text: u16, available: u16, align: Alignment) -> u16 {
    let slack = available.saturating_sub(text);
    match align {
        Alignment::Left => 0,
        Alignment::Center => slack / 2,
        Alignment::Right => slack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_borrows_short_text() {
        assert!(matches!(fit("CUSIP", 10), Cow::Borrowed("CUSIP")));
    }

    #[test]
    fn fit_adds_ellipsis() {
        assert_eq!(fit("US Treasury Note", 6), "US Tr…");
        assert_eq!(cells(&fit("US Treasury Note", 6)), 6);
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn fit_drops_wide_char_at_the_edge() {
        // 日 is two cells and would end at cell 4
        assert_eq!(fit("ab日本", 4), "ab…");
    }

    #[test]
    fn cells_saturate() {
        assert_eq!(cells(&"x".repeat(70_000)), u16::MAX);
        assert_eq!(cells("日本"), 4);
    }

    #[test]
    fn align_offsets() {
        assert_eq!(align_offset(4, 10, Alignment::Left), 0);
        assert_eq!(align_offset(4, 10, Alignment::Center), 3);
        assert_eq!(align_offset(4, 10, Alignment::Right), 6);
        assert_eq!(align_offset(12, 10, Alignment::Right), 0);
    }
}
