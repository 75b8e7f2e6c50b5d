//! Painting a table into a cell buffer.
//!
//! Layout, top to bottom: the search line (only when searchable), a
//! blank spacer in the default variant, then the table block: header,
//! body rows, or the single "No results found." placeholder. The default
//! variant wraps the block in a rounded border with a header separator.
//!
//! Every body row starts with a one-cell gutter holding the row's accent
//! bar (its style hint resolved through the theme). Indentation and the
//! disclosure glyph are applied to the first column only.

use crate::buffer::{Buffer, Paint, Rect};
use crate::column::{Alignment, Column};
use crate::flatten::VisualRow;
use crate::row::Row;
use crate::table::{TableOptions, TableVariant};
use crate::text::{align_offset, cells, char_width, fit};
use crate::theme::{Color, Rgb, TextStyle, Theme};
use crate::value::FieldValue;

/// Message drawn when no row passes the search.
pub const NO_RESULTS: &str = "No results found.";

/// Cells of indentation per nesting level.
pub const INDENT_WIDTH: u16 = 2;

const GLYPH_COLLAPSED: &str = "▸ ";
const GLYPH_EXPANDED: &str = "▾ ";
/// Glyph plus trailing space.
const DISCLOSURE_WIDTH: u16 = 2;
const SEARCH_ICON: &str = "⌕ ";
const ACCENT_BAR: &str = "▎";
const GUTTER_WIDTH: u16 = 1;
const MIN_COLUMN_WIDTH: u16 = 3;

/// Everything the painter needs for one pass.
pub struct Frame<'a> {
    pub columns: &'a [Column],
    /// The whole row tree, used for stable column widths.
    pub all_rows: &'a [Row],
    pub visible: &'a [VisualRow<'a>],
    pub options: &'a TableOptions,
    pub search: &'a str,
    pub cursor: Option<usize>,
    pub scroll_offset: usize,
}

/// Where a drawn body row landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    pub y: u16,
    /// Index into the visible rows.
    pub index: usize,
    pub id: String,
    /// Half-open x range of the disclosure control, if drawn.
    pub disclosure: Option<(u16, u16)>,
}

/// Result of hit testing a point against the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub id: String,
    pub on_disclosure: bool,
}

/// Geometry of the last paint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    /// Search line, when drawn.
    pub search: Option<Rect>,
    /// Header row.
    pub header: Option<Rect>,
    /// Body viewport (rows or placeholder).
    pub body: Rect,
    /// Drawn body rows, top to bottom.
    pub rows: Vec<RowHit>,
    /// The no-results placeholder, when drawn.
    pub placeholder: Option<Rect>,
    /// Per column: x of the content and its width.
    pub columns: Vec<(u16, u16)>,
}

impl TableLayout {
    /// Find the body row under `(x, y)`.
    pub fn hit(&self, x: u16, y: u16) -> Option<Hit> {
        if !self.body.contains(x, y) {
            return None;
        }
        let row = self.rows.iter().find(|r| r.y == y)?;
        let on_disclosure = row
            .disclosure
            .is_some_and(|(start, end)| x >= start && x < end);
        Some(Hit {
            index: row.index,
            id: row.id.clone(),
            on_disclosure,
        })
    }
}

/// Per-variant spacing.
struct Metrics {
    border: bool,
    spacer: bool,
    pad_left: u16,
    pad_right: u16,
}

impl Metrics {
    fn for_variant(variant: TableVariant) -> Self {
        match variant {
            TableVariant::Default => Self {
                border: true,
                spacer: true,
                pad_left: 1,
                pad_right: 1,
            },
            TableVariant::Compact => Self {
                border: false,
                spacer: false,
                pad_left: 0,
                pad_right: 1,
            },
        }
    }

    /// Rows taken above the body inside `area`.
    fn rows_above_body(&self, searchable: bool) -> u16 {
        let search = if searchable { 1 + self.spacer as u16 } else { 0 };
        // border top + header + separator, or header only
        let block = if self.border { 3 } else { 1 };
        search + block
    }

    fn rows_below_body(&self) -> u16 {
        self.border as u16
    }
}

/// Number of body lines available in `area` for `visible_len` rows.
pub fn body_height(area: Rect, options: &TableOptions, visible_len: usize) -> u16 {
    let metrics = Metrics::for_variant(options.variant);
    let available = area
        .height
        .saturating_sub(metrics.rows_above_body(options.searchable))
        .saturating_sub(metrics.rows_below_body());
    let wanted = visible_len.max(1).min(u16::MAX as usize) as u16;
    available.min(wanted)
}

/// Paint `frame` into `area` and return the resulting geometry.
pub fn paint(frame: &Frame<'_>, buf: &mut Buffer, area: Rect, theme: &dyn Theme) -> TableLayout {
    let metrics = Metrics::for_variant(frame.options.variant);
    let colors = Colors::from_theme(theme);
    let base = Paint::new(colors.foreground, colors.background);
    let mut layout = TableLayout::default();

    buf.fill(area, base);
    if area.width == 0 || area.height == 0 {
        return layout;
    }

    let mut y = area.y;
    if frame.options.searchable {
        paint_search(frame, buf, Rect::new(area.x, y, area.width, 1), &colors);
        layout.search = Some(Rect::new(area.x, y, area.width, 1));
        y += 1 + metrics.spacer as u16;
    }

    let body_h = body_height(area, frame.options, frame.visible.len());
    let block_h = body_h + metrics.rows_above_body(false) + metrics.rows_below_body();
    if y >= area.bottom() {
        return layout;
    }
    let block = Rect::new(area.x, y, area.width, block_h.min(area.bottom() - y));

    let inner = if metrics.border {
        paint_border(buf, block, colors.border, colors.background);
        Rect::new(
            block.x + 1,
            block.y + 1,
            block.width.saturating_sub(2),
            block.height.saturating_sub(2),
        )
    } else {
        block
    };
    if inner.width <= GUTTER_WIDTH || inner.height == 0 {
        return layout;
    }

    let widths = column_widths(
        frame.columns,
        frame.all_rows,
        inner.width - GUTTER_WIDTH,
        &metrics,
    );
    let mut x = inner.x + GUTTER_WIDTH;
    for width in &widths {
        layout.columns.push((x.saturating_add(metrics.pad_left), *width));
        x = x
            .saturating_add(metrics.pad_left)
            .saturating_add(*width)
            .saturating_add(metrics.pad_right);
    }

    // Header
    let header_y = inner.y;
    let header_style = match frame.options.variant {
        TableVariant::Default => TextStyle::new().bold(),
        TableVariant::Compact => TextStyle::new().bold().underline(),
    };
    let header_paint = Paint::new(colors.header, colors.background).with_style(header_style);
    for (column, &(cx, width)) in frame.columns.iter().zip(&layout.columns) {
        let width = clip_width(cx, width, inner);
        let text = fit(&column.header, width);
        let offset = align_offset(cells(&text), width, column.align);
        buf.put_str(cx + offset, header_y, &text, width - offset, header_paint);
    }
    layout.header = Some(Rect::new(inner.x, header_y, inner.width, 1));

    let mut body_y = header_y + 1;
    if metrics.border {
        paint_separator(buf, block, body_y, colors.border, colors.background);
        body_y += 1;
    }
    let body_h = body_h.min(inner.bottom().saturating_sub(body_y));
    layout.body = Rect::new(inner.x, body_y, inner.width, body_h);
    if body_h == 0 {
        return layout;
    }

    if frame.visible.is_empty() {
        let placeholder = Rect::new(inner.x, body_y, inner.width, 1);
        let text = fit(NO_RESULTS, inner.width);
        let offset = align_offset(cells(&text), inner.width, Alignment::Center);
        buf.put_str(
            inner.x + offset,
            body_y,
            &text,
            inner.width - offset,
            Paint::new(colors.muted, colors.background),
        );
        layout.placeholder = Some(placeholder);
        return layout;
    }

    let rows = frame
        .visible
        .iter()
        .enumerate()
        .skip(frame.scroll_offset)
        .take(body_h as usize);
    for (offset, (index, visual)) in rows.enumerate() {
        let y = body_y + offset as u16;
        let focused = frame.cursor == Some(index);
        let disclosure = paint_row(buf, inner, y, visual, focused, frame.columns, &layout.columns, theme, &colors);
        layout.rows.push(RowHit {
            y,
            index,
            id: visual.row.id.clone(),
            disclosure,
        });
    }

    layout
}

/// Resolved role colours for one paint.
struct Colors {
    background: Rgb,
    foreground: Rgb,
    muted: Rgb,
    border: Rgb,
    header: Rgb,
    cursor: Rgb,
    cursor_text: Rgb,
    accent: Rgb,
}

impl Colors {
    fn from_theme(theme: &dyn Theme) -> Self {
        let get = |name: &str, fallback: Color| theme.color_or(name, fallback).to_rgb();
        Self {
            background: get("background", Color::rgb(0, 0, 0)),
            foreground: get("foreground", Color::rgb(255, 255, 255)),
            muted: get("muted", Color::rgb(128, 128, 128)),
            border: get("border", Color::rgb(96, 96, 96)),
            header: get("header", Color::rgb(255, 255, 255)),
            cursor: get("cursor", Color::rgb(0xA2, 0x77, 0xFF)),
            cursor_text: get("cursor_text", Color::rgb(0, 0, 0)),
            accent: get("accent", Color::rgb(0x77, 0xA2, 0xFF)),
        }
    }
}

fn paint_search(frame: &Frame<'_>, buf: &mut Buffer, line: Rect, colors: &Colors) {
    let icon_w = buf.put_str(
        line.x,
        line.y,
        SEARCH_ICON,
        line.width,
        Paint::new(colors.accent, colors.background),
    );
    let x = line.x + icon_w;
    let remaining = line.width - icon_w;
    if frame.search.is_empty() {
        buf.put_str(
            x,
            line.y,
            &frame.options.search_placeholder,
            remaining,
            Paint::new(colors.muted, colors.background),
        );
    } else {
        // Show the tail of long search text so the caret stays visible.
        let written = buf.put_str(
            x,
            line.y,
            tail_to_width(frame.search, remaining.saturating_sub(1) as usize),
            remaining,
            Paint::new(colors.foreground, colors.background),
        );
        buf.put_str(
            x + written,
            line.y,
            "▏",
            remaining - written,
            Paint::new(colors.accent, colors.background),
        );
    }
}

/// Longest suffix of `s` that fits in `width` columns.
fn tail_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (i, ch) in s.char_indices().rev() {
        let w = char_width(ch) as usize;
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    &s[start..]
}

fn paint_border(buf: &mut Buffer, rect: Rect, fg: Rgb, bg: Rgb) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let paint = Paint::new(fg, bg);
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    for x in rect.x + 1..right {
        buf.put_str(x, rect.y, "─", 1, paint);
        buf.put_str(x, bottom, "─", 1, paint);
    }
    for y in rect.y + 1..bottom {
        buf.put_str(rect.x, y, "│", 1, paint);
        buf.put_str(right, y, "│", 1, paint);
    }
    buf.put_str(rect.x, rect.y, "╭", 1, paint);
    buf.put_str(right, rect.y, "╮", 1, paint);
    buf.put_str(rect.x, bottom, "╰", 1, paint);
    buf.put_str(right, bottom, "╯", 1, paint);
}

fn paint_separator(buf: &mut Buffer, block: Rect, y: u16, fg: Rgb, bg: Rgb) {
    if block.width < 2 || y + 1 >= block.bottom() {
        return;
    }
    let paint = Paint::new(fg, bg);
    let right = block.right() - 1;
    buf.put_str(block.x, y, "├", 1, paint);
    for x in block.x + 1..right {
        buf.put_str(x, y, "─", 1, paint);
    }
    buf.put_str(right, y, "┤", 1, paint);
}

#[allow(clippy::too_many_arguments)]
fn paint_row(
    buf: &mut Buffer,
    inner: Rect,
    y: u16,
    visual: &VisualRow<'_>,
    focused: bool,
    columns: &[Column],
    positions: &[(u16, u16)],
    theme: &dyn Theme,
    colors: &Colors,
) -> Option<(u16, u16)> {
    let row = visual.row;
    let base = if focused {
        Paint::new(colors.cursor_text, colors.cursor)
    } else {
        Paint::new(colors.foreground, colors.background)
    };
    buf.fill(Rect::new(inner.x, y, inner.width, 1), base);

    if let Some(accent) = row.style_hint.as_deref().and_then(|hint| theme.resolve(hint)) {
        buf.put_str(inner.x, y, ACCENT_BAR, GUTTER_WIDTH, base.with_fg(accent.to_rgb()));
    }

    let mut disclosure = None;
    for (index, (column, &(cx, width))) in columns.iter().zip(positions).enumerate() {
        let width = clip_width(cx, width, inner);
        if width == 0 {
            continue;
        }
        let mut x = cx;
        let mut width = width;

        if index == 0 {
            let indent = visual.depth.saturating_mul(INDENT_WIDTH).min(width);
            x += indent;
            width -= indent;

            if visual.has_disclosure() && width > 0 {
                let glyph = if visual.expanded {
                    GLYPH_EXPANDED
                } else {
                    GLYPH_COLLAPSED
                };
                let drawn = buf.put_str(x, y, glyph, width, base);
                disclosure = Some((x, x + drawn));
                x += drawn;
                width -= drawn;
            }
        }

        if let Some(value) = row.get(&column.key) {
            paint_value(buf, x, y, width, value, column.align, base, theme);
        }
    }

    disclosure
}

/// Draw a field value, truncating with an ellipsis when too wide.
#[allow(clippy::too_many_arguments)]
fn paint_value(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    width: u16,
    value: &FieldValue,
    align: Alignment,
    base: Paint,
    theme: &dyn Theme,
) {
    if width == 0 {
        return;
    }
    let text = value.display_text();
    let text_width = cells(&text);
    let fits = text_width <= width;
    let x = x + align_offset(text_width, width, align);

    let FieldValue::Fragment(fragment) = value else {
        buf.put_str(x, y, &fit(&text, width), width, base);
        return;
    };

    let limit = if fits { width } else { width - 1 };
    let mut used = 0;
    for span in &fragment.spans {
        let mut paint = base;
        if let Some(color) = span.color.as_deref().and_then(|name| theme.resolve(name)) {
            paint = paint.with_fg(color.to_rgb());
        }
        if span.bold {
            paint = paint.with_style(paint.style.bold());
        }
        used += buf.put_str(x + used, y, &span.text, limit - used, paint);
        if used >= limit {
            break;
        }
    }
    if !fits {
        buf.put_str(x + used, y, "…", width - used, base);
    }
}

/// Width of a column clipped to the inner area's right edge.
fn clip_width(x: u16, width: u16, inner: Rect) -> u16 {
    width.min(inner.right().saturating_sub(x))
}

/// Compute content widths for every column within `available` cells.
///
/// Declared widths are kept. Other columns take the widest of header and
/// cell text over the whole tree, the first column including indentation
/// and disclosure glyphs. When the sum is too wide, the widest automatic
/// column gives up a cell at a time down to a small minimum.
fn column_widths(columns: &[Column], rows: &[Row], available: u16, metrics: &Metrics) -> Vec<u16> {
    let mut widths: Vec<u16> = columns
        .iter()
        .map(|column| column.width.unwrap_or_else(|| cells(&column.header)))
        .collect();

    let mut stack: Vec<(&Row, u16)> = rows.iter().map(|row| (row, 0)).collect();
    while let Some((row, depth)) = stack.pop() {
        for (index, column) in columns.iter().enumerate() {
            if column.width.is_some() {
                continue;
            }
            let mut w = row
                .get(&column.key)
                .map(|value| cells(&value.display_text()))
                .unwrap_or(0);
            if index == 0 {
                w = w.saturating_add(depth.saturating_mul(INDENT_WIDTH));
                if row.expandable {
                    w = w.saturating_add(DISCLOSURE_WIDTH);
                }
            }
            widths[index] = widths[index].max(w);
        }
        stack.extend(row.children.iter().map(|child| (child, depth + 1)));
    }

    let padding = (metrics.pad_left + metrics.pad_right) as usize * columns.len();
    let budget = (available as usize).saturating_sub(padding);
    let mut total: usize = widths.iter().map(|&w| w as usize).sum();
    while total > budget {
        let widest = columns
            .iter()
            .enumerate()
            .filter(|(i, column)| column.width.is_none() && widths[*i] > MIN_COLUMN_WIDTH)
            .max_by_key(|(i, _)| widths[*i])
            .map(|(i, _)| i);
        let Some(i) = widest else {
            break;
        };
        widths[i] -= 1;
        total -= 1;
    }

    widths
}
