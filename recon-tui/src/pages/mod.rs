//! Dashboard pages: one table each, some with a summary strip or an editor.

mod exceptions;
mod mappings;
mod positions;
mod rules;

use std::fmt;

use recon_table::{Column, HierarchicalTable, KeyCombo, Row, TableError};

use crate::config::Settings;
use crate::form::{Form, FormOutcome};
use crate::summary::{self, Stat};

pub use exceptions::STYLE_HINTS;
pub use positions::{Group, Pivot};

/// Column holding the per-row edit action on editable pages.
pub const ACTIONS: &str = "actions";

/// `active` / `inactive`, as offered by the edit forms.
const STATUSES: [&str; 2] = ["active", "inactive"];

/// Records behind an editable page. The page redraws them through
/// `set_data` after every save.
pub trait Editor: fmt::Debug {
    /// Record name used in form titles.
    fn noun(&self) -> &'static str;

    fn columns(&self) -> Vec<Column>;

    fn rows(&self) -> Vec<Row>;

    /// Form for record `id`, or a blank one when `id` is `None`.
    /// `None` if there is no such record.
    fn form(&self, id: Option<&str>) -> Option<Form>;

    /// Apply a submitted form, stamping the record with `today`.
    /// Returns the id of the saved record.
    fn save(&mut self, form: &Form, today: &str) -> Result<String, String>;
}

/// What the strip above the table counts.
#[derive(Debug, Clone, Copy)]
struct Summary {
    /// Label of the row count.
    total: &'static str,
    /// Field whose values are tallied.
    tally: &'static str,
    /// Label counted for the match rate, if shown.
    rate: Option<&'static str>,
}

/// A titled table, optionally narrowed by fund.
#[derive(Debug)]
pub struct Page {
    pub title: String,
    pub table: HierarchicalTable,
    fund_filter: Option<FundFilter>,
    summary: Option<Summary>,
    pivot: Option<Pivot>,
    editor: Option<Box<dyn Editor>>,
    form: Option<Form>,
}

impl Page {
    pub fn new(title: impl Into<String>, table: HierarchicalTable) -> Self {
        Self {
            title: title.into(),
            table,
            fund_filter: None,
            summary: None,
            pivot: None,
            editor: None,
            form: None,
        }
    }

    /// Enable fund cycling over the table's current rows.
    fn with_fund_filter(mut self) -> Self {
        let data = self.table.data();
        self.fund_filter = Some(FundFilter::new(data.columns().to_vec(), data.rows().to_vec()));
        self
    }

    fn with_summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.pivot = Some(pivot);
        self
    }

    fn with_editor(mut self, editor: Box<dyn Editor>) -> Self {
        self.editor = Some(editor);
        self
    }

    // -------------------------------------------------------------------------
    // Fund filter
    // -------------------------------------------------------------------------

    pub fn has_fund_filter(&self) -> bool {
        self.fund_filter.is_some()
    }

    /// Fund currently shown, `None` for all funds.
    pub fn fund(&self) -> Option<&str> {
        self.fund_filter.as_ref().and_then(FundFilter::selected)
    }

    /// Advance to the next fund (after the last one: all funds).
    /// Returns false when the page has no fund filter.
    pub fn cycle_fund(&mut self) -> Result<bool, TableError> {
        let Some(filter) = self.fund_filter.as_mut() else {
            return Ok(false);
        };
        filter.advance();
        self.table.set_data(filter.columns.clone(), filter.rows())?;
        log::info!(
            "{}: fund filter {}",
            self.title,
            filter.selected().unwrap_or("all")
        );
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------

    /// Figures for the strip, computed from the rows on the page now.
    pub fn stats(&self) -> Vec<Stat> {
        let Some(strip) = self.summary else {
            return Vec::new();
        };
        let rows = self.table.rows();
        let mut stats = vec![Stat::new(strip.total, rows.len().to_string()).color("accent")];
        stats.extend(summary::tally(rows, strip.tally));
        if let Some(label) = strip.rate {
            stats.extend(summary::rate(rows, strip.tally, label, "Match rate"));
        }
        stats
    }

    /// The pivot breakdown over every row, ignoring the fund filter.
    pub fn pivot(&self) -> Option<(Pivot, Vec<Group>)> {
        let pivot = self.pivot?;
        let rows = match &self.fund_filter {
            Some(filter) => filter.all_rows.as_slice(),
            None => self.table.rows(),
        };
        Some((pivot, positions::breakdown(rows, pivot)))
    }

    /// Switch the breakdown to the next pivot column.
    pub fn cycle_pivot(&mut self) -> bool {
        let Some(pivot) = self.pivot.as_mut() else {
            return false;
        };
        *pivot = pivot.next();
        log::debug!("{}: pivot by {}", self.title, pivot.label());
        true
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    pub fn is_editable(&self) -> bool {
        self.editor.is_some()
    }

    /// The open add/edit form.
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    /// Open a blank form. Returns false on pages without an editor.
    pub fn begin_add(&mut self) -> bool {
        self.open_form(None)
    }

    /// Open the form for record `id`.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        self.open_form(Some(id))
    }

    fn open_form(&mut self, id: Option<&str>) -> bool {
        let Some(form) = self.editor.as_ref().and_then(|editor| editor.form(id)) else {
            return false;
        };
        log::debug!("{}: {}", self.title, form.title);
        self.form = Some(form);
        true
    }

    /// Id of the row whose edit action is at `(x, y)` in the last render.
    pub fn action_at(&self, x: u16, y: u16) -> Option<String> {
        if !self.is_editable() {
            return None;
        }
        let layout = self.table.layout()?;
        let hit = layout.hit(x, y)?;
        let index = self.table.columns().iter().position(|c| c.key == ACTIONS)?;
        let &(start, width) = layout.columns.get(index)?;
        (x >= start && x < start.saturating_add(width)).then_some(hit.id)
    }

    /// Feed a key to the open form, saving or closing it as needed.
    /// Returns false when no form is open.
    pub fn on_form_key(&mut self, key: &KeyCombo, today: &str) -> Result<bool, TableError> {
        let Some(mut form) = self.form.take() else {
            return Ok(false);
        };
        match form.on_key(key) {
            FormOutcome::Pending => self.form = Some(form),
            FormOutcome::Cancelled => log::debug!("{}: {} cancelled", self.title, form.title),
            FormOutcome::Submitted => self.save(form, today)?,
        }
        Ok(true)
    }

    fn save(&mut self, mut form: Form, today: &str) -> Result<(), TableError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        match editor.save(&form, today) {
            Ok(id) => {
                self.table.set_data(editor.columns(), editor.rows())?;
                let index = self.table.visible_rows().iter().position(|v| v.id() == id);
                if let Some(index) = index {
                    self.table.set_cursor(index);
                }
                log::info!("{}: {} {} saved", self.title, editor.noun(), id);
            }
            Err(message) => {
                log::warn!("{}: {}", self.title, message);
                form.set_error(message);
                self.form = Some(form);
            }
        }
        Ok(())
    }
}

/// Next free numeric id after `ids`.
fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let last = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
    (last + 1).to_string()
}

fn status_name(active: bool) -> &'static str {
    if active { STATUSES[0] } else { STATUSES[1] }
}

/// Host-side narrowing of top-level rows to one fund, re-applied through
/// `set_data` so expansion state survives.
#[derive(Debug)]
struct FundFilter {
    columns: Vec<Column>,
    all_rows: Vec<Row>,
    /// Distinct funds in first-seen order.
    funds: Vec<String>,
    selected: Option<usize>,
}

impl FundFilter {
    fn new(columns: Vec<Column>, all_rows: Vec<Row>) -> Self {
        let mut funds: Vec<String> = Vec::new();
        for row in &all_rows {
            if let Some(fund) = row.get("fund") {
                let fund = fund.display_text().into_owned();
                if !funds.contains(&fund) {
                    funds.push(fund);
                }
            }
        }
        Self {
            columns,
            all_rows,
            funds,
            selected: None,
        }
    }

    fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.funds[i].as_str())
    }

    fn advance(&mut self) {
        self.selected = match self.selected {
            None if !self.funds.is_empty() => Some(0),
            Some(i) if i + 1 < self.funds.len() => Some(i + 1),
            _ => None,
        };
    }

    fn rows(&self) -> Vec<Row> {
        match self.selected() {
            None => self.all_rows.clone(),
            Some(fund) => self
                .all_rows
                .iter()
                .filter(|row| row.get("fund").is_some_and(|v| v.display_text() == fund))
                .cloned()
                .collect(),
        }
    }
}

/// The built-in dashboard pages in tab order.
pub fn builtin(settings: &Settings) -> Result<Vec<Page>, TableError> {
    Ok(vec![
        positions::page(settings)?,
        exceptions::page(settings)?,
        mappings::page(settings)?,
        rules::page(settings)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_ids(page: &Page) -> Vec<String> {
        page.table
            .visible_rows()
            .iter()
            .map(|v| v.id().to_string())
            .collect()
    }

    #[test]
    fn builtin_pages_in_order() {
        let pages = builtin(&Settings::default()).unwrap();
        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Positions", "Exceptions", "Mappings", "Rules"]);
        assert!(pages[0].has_fund_filter());
        assert!(!pages[1].has_fund_filter());
    }

    #[test]
    fn fund_filter_cycles_through_funds() {
        let mut page = positions::page(&Settings::default()).unwrap();
        assert_eq!(page.fund(), None);
        assert_eq!(page.table.rows().len(), 5);

        assert!(page.cycle_fund().unwrap());
        assert_eq!(page.fund(), Some("Fund A1"));
        assert_eq!(visible_ids(&page), ["1", "4"]);

        page.cycle_fund().unwrap();
        assert_eq!(page.fund(), Some("Fund B2"));
        assert_eq!(visible_ids(&page), ["2", "5"]);

        page.cycle_fund().unwrap();
        assert_eq!(page.fund(), Some("Fund C3"));
        page.cycle_fund().unwrap();
        assert_eq!(page.fund(), None);
        assert_eq!(page.table.rows().len(), 5);
    }

    #[test]
    fn fund_filter_combines_with_search() {
        let mut page = positions::page(&Settings::default()).unwrap();
        page.table.set_search("equity");
        page.cycle_fund().unwrap();
        // Fund A1 holds a bond and one equity.
        assert_eq!(visible_ids(&page), ["4"]);
    }

    #[test]
    fn cycle_without_filter_is_a_no_op() {
        let mut page = rules::page(&Settings::default()).unwrap();
        assert!(!page.cycle_fund().unwrap());
        assert_eq!(page.table.rows().len(), 3);
    }
}
