//! The hierarchical table component.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::{Buffer, Rect};
use crate::column::Column;
use crate::data::TableData;
use crate::error::TableError;
use crate::events::{EventResult, Key, KeyCombo};
use crate::expansion::ExpansionState;
use crate::filter::filter_rows;
use crate::flatten::{VisualRow, flatten};
use crate::render::{self, Frame, TableLayout};
use crate::row::Row;
use crate::theme::Theme;

/// Visual density of the table. Only affects borders and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableVariant {
    /// Rounded border, header separator, padded cells.
    #[default]
    Default,
    /// No border, underlined header, single-space column gaps.
    Compact,
}

/// Host-facing configuration of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Whether the search line is shown and typing edits the search text.
    pub searchable: bool,
    /// Text shown in the empty search line.
    pub search_placeholder: String,
    pub variant: TableVariant,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            searchable: true,
            search_placeholder: "Search...".to_string(),
            variant: TableVariant::Default,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn variant(mut self, variant: TableVariant) -> Self {
        self.variant = variant;
        self
    }
}

type RowClickHandler = Box<dyn FnMut(&Row)>;

/// A searchable table whose rows may own expandable child rows.
///
/// The host owns the columns and rows and hands them over with
/// [`new`](Self::new) or [`set_data`](Self::set_data). The table owns
/// only transient UI state: the search text, the set of expanded row ids,
/// the keyboard cursor and the scroll offset. Everything drawn is derived
/// from `(rows, search text, expanded set)` on each call.
///
/// # Example
///
/// ```
/// use recon_table::{Column, HierarchicalTable, Row};
///
/// let columns = vec![Column::new("cusip", "CUSIP")];
/// let rows = vec![
///     Row::new("1")
///         .field("cusip", "912828XM5")
///         .children(vec![Row::new("1a").field("cusip", "912828XM5-A")]),
/// ];
///
/// let mut table = HierarchicalTable::new(columns, rows).unwrap();
/// assert_eq!(table.visible_rows().len(), 1);
///
/// table.toggle("1");
/// let ids: Vec<_> = table.visible_rows().iter().map(|v| v.id()).collect();
/// assert_eq!(ids, ["1", "1a"]);
/// ```
pub struct HierarchicalTable {
    data: TableData,
    options: TableOptions,
    search: String,
    expansion: ExpansionState,
    /// Index into the visible rows.
    cursor: Option<usize>,
    /// First visible row drawn at the top of the body.
    scroll_offset: usize,
    /// Geometry from the last render, for hit testing.
    layout: Option<TableLayout>,
    on_row_click: Option<RowClickHandler>,
}

impl fmt::Debug for HierarchicalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchicalTable")
            .field("columns", &self.data.columns().len())
            .field("rows", &self.data.rows().len())
            .field("options", &self.options)
            .field("search", &self.search)
            .field("expansion", &self.expansion)
            .field("cursor", &self.cursor)
            .field("scroll_offset", &self.scroll_offset)
            .field("on_row_click", &self.on_row_click.is_some())
            .finish()
    }
}

impl HierarchicalTable {
    /// Create a table, validating the rows.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self, TableError> {
        Ok(Self::from_data(TableData::new(columns, rows)?))
    }

    /// Create a table from already validated data.
    pub fn from_data(data: TableData) -> Self {
        let cursor = (!data.rows().is_empty()).then_some(0);
        Self {
            data,
            options: TableOptions::default(),
            search: String::new(),
            expansion: ExpansionState::new(),
            cursor,
            scroll_offset: 0,
            layout: None,
            on_row_click: None,
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.set_options(options);
        self
    }

    /// Register the row-click callback, replacing any previous one.
    ///
    /// The callback receives the full row, children included. It fires
    /// for clicks on any visible row and for Enter on the cursor row, but
    /// never for clicks on a disclosure control.
    pub fn with_row_click(mut self, handler: impl FnMut(&Row) + 'static) -> Self {
        self.on_row_click(handler);
        self
    }

    pub fn on_row_click(&mut self, handler: impl FnMut(&Row) + 'static) {
        self.on_row_click = Some(Box::new(handler));
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TableOptions) {
        if !options.searchable {
            // A hidden search box must not keep filtering.
            self.clear_search();
        }
        self.options = options;
        self.layout = None;
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn columns(&self) -> &[Column] {
        self.data.columns()
    }

    pub fn rows(&self) -> &[Row] {
        self.data.rows()
    }

    /// Replace columns and rows after a host data refresh.
    ///
    /// Expansion state and search text are kept; rows whose ids survive
    /// the refresh keep their expanded flag. On error the previous data
    /// stays in place.
    pub fn set_data(&mut self, columns: Vec<Column>, rows: Vec<Row>) -> Result<(), TableError> {
        let data = TableData::new(columns, rows)?;
        let previous = self.cursor_id().map(str::to_string);
        self.data = data;
        self.layout = None;
        self.reanchor_cursor(previous);
        log::debug!(
            "table data replaced: {} top-level rows, {} total",
            self.data.rows().len(),
            self.data.total_rows()
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Replace the search text. The cursor returns to the first row.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.search {
            return;
        }
        self.search = text;
        self.scroll_offset = 0;
        self.cursor = (!self.filtered_rows().is_empty()).then_some(0);
        log::debug!(
            "search changed to {:?}: {} matching rows",
            self.search,
            self.filtered_rows().len()
        );
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Top-level rows passing the current search.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        filter_rows(self.data.rows(), &self.search)
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expansion.is_expanded(id)
    }

    /// Flip a row between expanded and collapsed.
    ///
    /// Any id is accepted; ids of rows without a disclosure control are
    /// recorded but change nothing on screen. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let previous = self.cursor_id().map(str::to_string);
        let expanded = self.expansion.toggle(id);
        self.reanchor_cursor(previous);
        log::debug!(
            "row {:?} {}",
            id,
            if expanded { "expanded" } else { "collapsed" }
        );
        expanded
    }

    /// Expand a row. Returns true if it was collapsed before.
    pub fn expand(&mut self, id: &str) -> bool {
        if self.is_expanded(id) {
            return false;
        }
        self.toggle(id)
    }

    /// Collapse a row. Returns true if it was expanded before.
    pub fn collapse(&mut self, id: &str) -> bool {
        if !self.is_expanded(id) {
            return false;
        }
        !self.toggle(id)
    }

    // -------------------------------------------------------------------------
    // Visible rows & cursor
    // -------------------------------------------------------------------------

    /// Rows as drawn: filtered top-level rows with expanded subtrees.
    pub fn visible_rows(&self) -> Vec<VisualRow<'_>> {
        flatten(&self.filtered_rows(), &self.expansion)
    }

    pub fn visible_len(&self) -> usize {
        self.visible_rows().len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Row under the cursor.
    pub fn cursor_row(&self) -> Option<&Row> {
        let index = self.cursor?;
        self.visible_rows().get(index).map(|v| v.row)
    }

    pub fn cursor_id(&self) -> Option<&str> {
        self.cursor_row().map(|row| row.id.as_str())
    }

    /// Move the cursor to a visible row index, clamped.
    /// Returns the previous cursor position.
    pub fn set_cursor(&mut self, index: usize) -> Option<usize> {
        let len = self.visible_len();
        let previous = self.cursor;
        self.cursor = len.checked_sub(1).map(|last| index.min(last));
        previous
    }

    /// Move the cursor by `delta` rows. Returns true if it moved.
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let target = cursor.saturating_add_signed(delta);
        self.set_cursor(target);
        self.cursor != Some(cursor)
    }

    pub fn cursor_first(&mut self) -> bool {
        let previous = self.cursor;
        self.set_cursor(0);
        self.cursor != previous
    }

    pub fn cursor_last(&mut self) -> bool {
        let previous = self.cursor;
        self.set_cursor(usize::MAX);
        self.cursor != previous
    }

    /// Move the cursor to the nearest row above it at a shallower depth.
    pub fn cursor_to_parent(&mut self) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let parent = {
            let visible = self.visible_rows();
            let Some(depth) = visible.get(cursor).map(|v| v.depth) else {
                return false;
            };
            visible[..cursor].iter().rposition(|v| v.depth < depth)
        };
        match parent {
            Some(index) => {
                self.cursor = Some(index);
                true
            }
            None => false,
        }
    }

    /// Keep the cursor on the same row id after the visible rows changed.
    fn reanchor_cursor(&mut self, previous_id: Option<String>) {
        let position = previous_id.and_then(|id| {
            self.visible_rows()
                .iter()
                .position(|v| v.row.id == id)
        });
        match position {
            Some(index) => self.cursor = Some(index),
            None => {
                let fallback = self.cursor.unwrap_or(0);
                self.set_cursor(fallback);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Fire the row-click callback for a visible row.
    /// Returns false if the index is out of range.
    pub fn activate(&mut self, index: usize) -> bool {
        let Some(id) = self.visible_rows().get(index).map(|v| v.row.id.clone()) else {
            return false;
        };
        log::debug!("row {:?} clicked", id);
        if let Some(row) = self.data.find(&id)
            && let Some(handler) = self.on_row_click.as_mut()
        {
            handler(row);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Handle a key press while the table has focus.
    ///
    /// With search enabled, printable characters (space included),
    /// Backspace and Escape edit the search text. Arrows, Home/End and
    /// PageUp/PageDown move the cursor; Right/Left expand/collapse the
    /// cursor row or move to its first child/parent; Enter activates it.
    /// Space toggles the cursor row when search is disabled.
    pub fn on_key(&mut self, key: &KeyCombo) -> EventResult {
        let Some(plain) = key.plain() else {
            return EventResult::Ignored;
        };

        match plain {
            Key::Char(c) if self.options.searchable => {
                let mut text = self.search.clone();
                text.push(c);
                self.set_search(text);
                EventResult::Consumed
            }
            Key::Backspace if self.options.searchable && !self.search.is_empty() => {
                let mut text = self.search.clone();
                text.pop();
                self.set_search(text);
                EventResult::Consumed
            }
            Key::Escape if self.options.searchable && !self.search.is_empty() => {
                self.clear_search();
                EventResult::Consumed
            }
            Key::Char(' ') => self.toggle_cursor_row(),
            Key::Up => consumed(self.move_cursor(-1)),
            Key::Down => consumed(self.move_cursor(1)),
            Key::Home => consumed(self.cursor_first()),
            Key::End => consumed(self.cursor_last()),
            Key::PageUp => {
                let page = self.page_size() as isize;
                consumed(self.move_cursor(-page))
            }
            Key::PageDown => {
                let page = self.page_size() as isize;
                consumed(self.move_cursor(page))
            }
            Key::Right => self.expand_or_descend(),
            Key::Left => self.collapse_or_ascend(),
            Key::Enter => match self.cursor {
                Some(index) => consumed(self.activate(index)),
                None => EventResult::Ignored,
            },
            _ => EventResult::Ignored,
        }
    }

    /// Handle a mouse click at absolute buffer coordinates.
    ///
    /// Clicking a disclosure control toggles its row and does not fire
    /// the row-click callback. Clicking anywhere else on a body row moves
    /// the cursor there and fires the callback.
    ///
    /// The point is matched against the last render, so it names the row
    /// that was on screen there even if rows moved since. A row that is
    /// no longer visible ignores the click.
    pub fn on_click(&mut self, x: u16, y: u16) -> EventResult {
        let Some(hit) = self.layout.as_ref().and_then(|layout| layout.hit(x, y)) else {
            return EventResult::Ignored;
        };
        let Some(index) = self.visible_rows().iter().position(|v| v.row.id == hit.id) else {
            log::debug!("click on row {:?} which is no longer visible", hit.id);
            return EventResult::Ignored;
        };

        self.cursor = Some(index);
        if hit.on_disclosure {
            self.toggle(&hit.id);
        } else {
            self.activate(index);
        }
        EventResult::Consumed
    }

    fn toggle_cursor_row(&mut self) -> EventResult {
        let Some(row) = self.cursor_row() else {
            return EventResult::Ignored;
        };
        if !row.expandable {
            return EventResult::Ignored;
        }
        let id = row.id.clone();
        self.toggle(&id);
        EventResult::Consumed
    }

    fn expand_or_descend(&mut self) -> EventResult {
        let Some(row) = self.cursor_row() else {
            return EventResult::Ignored;
        };
        if !row.expandable {
            return EventResult::Ignored;
        }
        let id = row.id.clone();
        let has_children = !row.children.is_empty();
        if !self.is_expanded(&id) {
            self.expand(&id);
            EventResult::Consumed
        } else if has_children {
            consumed(self.move_cursor(1))
        } else {
            EventResult::Ignored
        }
    }

    fn collapse_or_ascend(&mut self) -> EventResult {
        let Some(row) = self.cursor_row() else {
            return EventResult::Ignored;
        };
        let id = row.id.clone();
        if row.expandable && self.is_expanded(&id) {
            self.collapse(&id);
            EventResult::Consumed
        } else {
            consumed(self.cursor_to_parent())
        }
    }

    fn page_size(&self) -> usize {
        self.layout
            .as_ref()
            .map(|layout| layout.body.height as usize)
            .filter(|&h| h > 0)
            .unwrap_or(10)
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Paint the table into `area` of `buf` and remember the geometry
    /// for [`on_click`](Self::on_click).
    pub fn render(&mut self, buf: &mut Buffer, area: Rect, theme: &dyn Theme) {
        let filtered = filter_rows(self.data.rows(), &self.search);
        let visible = flatten(&filtered, &self.expansion);

        let body_height = render::body_height(area, &self.options, visible.len()) as usize;
        self.scroll_offset = scroll_to_show(self.scroll_offset, self.cursor, visible.len(), body_height);

        let frame = Frame {
            columns: self.data.columns(),
            all_rows: self.data.rows(),
            visible: &visible,
            options: &self.options,
            search: &self.search,
            cursor: self.cursor,
            scroll_offset: self.scroll_offset,
        };
        let layout = render::paint(&frame, buf, area, theme);
        self.layout = Some(layout);
    }

    /// Geometry recorded by the last [`render`](Self::render).
    pub fn layout(&self) -> Option<&TableLayout> {
        self.layout.as_ref()
    }
}

fn consumed(changed: bool) -> EventResult {
    if changed {
        EventResult::Consumed
    } else {
        EventResult::Ignored
    }
}

/// Smallest scroll change that keeps the cursor inside the viewport.
fn scroll_to_show(offset: usize, cursor: Option<usize>, len: usize, viewport: usize) -> usize {
    if viewport == 0 || len <= viewport {
        return 0;
    }
    let max_offset = len - viewport;
    let offset = offset.min(max_offset);
    match cursor {
        Some(c) if c < offset => c,
        Some(c) if c >= offset + viewport => c + 1 - viewport,
        _ => offset,
    }
}
