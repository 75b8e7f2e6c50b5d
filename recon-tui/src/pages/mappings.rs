use recon_table::{Column, FieldValue, Fragment, HierarchicalTable, Row, Span, TableError};

use super::{ACTIONS, Editor, Page, STATUSES, next_id, status_name};
use crate::config::Settings;
use crate::form::{Field, Form};
use crate::format;

const KINDS: [&str; 2] = ["fund", "secnum"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Mapping {
    id: String,
    external_name: String,
    internal_name: String,
    kind: String,
    active: bool,
    last_updated: String,
}

impl Mapping {
    fn seed(
        id: &str,
        external_name: &str,
        internal_name: &str,
        kind: &str,
        active: bool,
        last_updated: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            external_name: external_name.to_string(),
            internal_name: internal_name.to_string(),
            kind: kind.to_string(),
            active,
            last_updated: last_updated.to_string(),
        }
    }

    fn row(&self) -> Row {
        Row::new(self.id.as_str())
            .field("externalName", self.external_name.as_str())
            .field("internalName", self.internal_name.as_str())
            .field("type", self.kind.to_uppercase())
            .field("status", status_badge(self.active))
            .field("lastUpdated", self.last_updated.as_str())
            .field(ACTIONS, edit_action())
    }
}

/// `active` / `inactive` pill shared with the rules page.
pub(super) fn status_badge(active: bool) -> FieldValue {
    if active {
        format::badge("active", "success")
    } else {
        format::badge("inactive", "muted")
    }
}

/// The row action hint. Decoration only, never matched by search.
pub(super) fn edit_action() -> Fragment {
    Fragment::new().span(Span::new("✎ Edit").color("accent"))
}

/// External to internal identifier mappings.
#[derive(Debug)]
struct Mappings {
    records: Vec<Mapping>,
}

impl Mappings {
    fn seeded() -> Self {
        Self {
            records: vec![
                Mapping::seed("1", "Fund C1", "Fund C13", "fund", true, "2024-01-15"),
                Mapping::seed("2", "SEC12345", "SECNUM_12345_A", "secnum", true, "2024-01-14"),
                Mapping::seed("3", "Fund B7", "Fund B07", "fund", false, "2024-01-10"),
            ],
        }
    }
}

impl Editor for Mappings {
    fn noun(&self) -> &'static str {
        "mapping"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("externalName", "External Name"),
            Column::new("internalName", "Internal Name"),
            Column::new("type", "Type"),
            Column::new("status", "Status"),
            Column::new("lastUpdated", "Last Updated"),
            Column::new(ACTIONS, "Actions"),
        ]
    }

    fn rows(&self) -> Vec<Row> {
        self.records.iter().map(Mapping::row).collect()
    }

    fn form(&self, id: Option<&str>) -> Option<Form> {
        let record = match id {
            Some(id) => Some(self.records.iter().find(|m| m.id == id)?),
            None => None,
        };
        let title = if record.is_some() { "Edit Mapping" } else { "Add New Mapping" };
        let form = Form::new(title, id.map(str::to_string))
            .field(
                Field::text("externalName", "External Name", record.map_or("", |m| m.external_name.as_str()))
                    .placeholder("Enter external identifier"),
            )
            .field(
                Field::text("internalName", "Internal Name", record.map_or("", |m| m.internal_name.as_str()))
                    .placeholder("Enter internal identifier"),
            )
            .field(Field::choice("type", "Type", &KINDS, record.map_or("fund", |m| m.kind.as_str())));
        // Only existing mappings can be switched off.
        Some(match record {
            Some(m) => form.field(Field::choice("status", "Status", &STATUSES, status_name(m.active))),
            None => form,
        })
    }

    fn save(&mut self, form: &Form, today: &str) -> Result<String, String> {
        let external_name = form.value("externalName").trim().to_string();
        let internal_name = form.value("internalName").trim().to_string();
        let kind = form.value("type").to_string();

        match &form.target {
            Some(id) => {
                let mapping = self
                    .records
                    .iter_mut()
                    .find(|m| &m.id == id)
                    .ok_or_else(|| format!("mapping {id} no longer exists"))?;
                mapping.external_name = external_name;
                mapping.internal_name = internal_name;
                mapping.kind = kind;
                mapping.active = !form.has_field("status") || form.value("status") == "active";
                mapping.last_updated = today.to_string();
                Ok(id.clone())
            }
            None => {
                let id = next_id(self.records.iter().map(|m| m.id.as_str()));
                self.records.push(Mapping {
                    id: id.clone(),
                    external_name,
                    internal_name,
                    kind,
                    active: true,
                    last_updated: today.to_string(),
                });
                Ok(id)
            }
        }
    }
}

pub fn page(settings: &Settings) -> Result<Page, TableError> {
    let mappings = Mappings::seeded();
    let table = HierarchicalTable::new(mappings.columns(), mappings.rows())?
        .with_options(settings.table_options("Search mappings..."));
    Ok(Page::new("Mappings", table).with_editor(Box::new(mappings)))
}
