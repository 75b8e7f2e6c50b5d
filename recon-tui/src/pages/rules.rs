use recon_table::{Column, HierarchicalTable, Row, TableError};

use super::mappings::{edit_action, status_badge};
use super::{ACTIONS, Editor, Page, STATUSES, next_id, status_name};
use crate::config::Settings;
use crate::form::{Field, Form};
use crate::format;

const RULE_ACTIONS: [&str; 5] = [
    "flag_exception",
    "create_exception",
    "review_required",
    "auto_resolve",
    "send_alert",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    id: String,
    name: String,
    description: String,
    condition: String,
    action: String,
    active: bool,
    last_updated: String,
}

impl Rule {
    fn row(&self) -> Row {
        Row::new(self.id.as_str())
            .field("name", self.name.as_str())
            .field("description", self.description.as_str())
            .field("condition", format::code(&self.condition))
            .field("action", format::badge(&self.action, "info"))
            .field("status", status_badge(self.active))
            .field("lastUpdated", self.last_updated.as_str())
            .field(ACTIONS, edit_action())
    }
}

/// Reconciliation rules, seeded with three examples.
#[derive(Debug)]
struct Rules {
    records: Vec<Rule>,
}

impl Rules {
    fn seeded() -> Self {
        let seed = [
            (
                "High Variance Alert",
                "Alert when position variance exceeds 5%",
                "position_variance > 0.05",
                "flag_exception",
                true,
                "2024-01-15",
            ),
            (
                "Missing External Position",
                "Flag when internal position exists but external does not",
                "internal_position > 0 AND external_position = 0",
                "create_exception",
                true,
                "2024-01-14",
            ),
            (
                "Legacy Fund Check",
                "Check for positions in deprecated funds",
                "fund_status = 'deprecated'",
                "review_required",
                false,
                "2024-01-10",
            ),
        ];
        let records = seed
            .into_iter()
            .enumerate()
            .map(|(i, (name, description, condition, action, active, last_updated))| Rule {
                id: (i + 1).to_string(),
                name: name.to_string(),
                description: description.to_string(),
                condition: condition.to_string(),
                action: action.to_string(),
                active,
                last_updated: last_updated.to_string(),
            })
            .collect();
        Self { records }
    }
}

impl Editor for Rules {
    fn noun(&self) -> &'static str {
        "rule"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("name", "Rule Name"),
            Column::new("description", "Description").width(32),
            Column::new("condition", "Condition"),
            Column::new("action", "Action"),
            Column::new("status", "Status"),
            Column::new("lastUpdated", "Last Updated"),
            Column::new(ACTIONS, "Actions"),
        ]
    }

    fn rows(&self) -> Vec<Row> {
        self.records.iter().map(Rule::row).collect()
    }

    fn form(&self, id: Option<&str>) -> Option<Form> {
        let record = match id {
            Some(id) => Some(self.records.iter().find(|r| r.id == id)?),
            None => None,
        };
        let name = record.map_or("", |r| r.name.as_str());
        let description = record.map_or("", |r| r.description.as_str());
        let condition = record.map_or("", |r| r.condition.as_str());
        let title = if record.is_some() { "Edit Rule" } else { "Add New Rule" };
        let form = Form::new(title, id.map(str::to_string))
            .field(Field::text("name", "Rule Name", name).placeholder("Enter rule name"))
            .field(
                Field::text("description", "Description", description)
                    .placeholder("Describe what this rule does"),
            )
            .field(
                Field::text("condition", "Condition", condition)
                    .placeholder("e.g. position_variance > 0.05"),
            )
            .field(Field::choice(
                "action",
                "Action",
                &RULE_ACTIONS,
                record.map_or("", |r| r.action.as_str()),
            ));
        Some(match record {
            Some(r) => form.field(Field::choice("status", "Status", &STATUSES, status_name(r.active))),
            None => form,
        })
    }

    fn save(&mut self, form: &Form, today: &str) -> Result<String, String> {
        let name = form.value("name").trim().to_string();
        let description = form.value("description").trim().to_string();
        let condition = form.value("condition").trim().to_string();
        let action = form.value("action").to_string();

        match &form.target {
            Some(id) => {
                let rule = self
                    .records
                    .iter_mut()
                    .find(|r| &r.id == id)
                    .ok_or_else(|| format!("rule {id} no longer exists"))?;
                rule.name = name;
                rule.description = description;
                rule.condition = condition;
                rule.action = action;
                rule.active = !form.has_field("status") || form.value("status") == "active";
                rule.last_updated = today.to_string();
                Ok(id.clone())
            }
            None => {
                let id = next_id(self.records.iter().map(|r| r.id.as_str()));
                self.records.push(Rule {
                    id: id.clone(),
                    name,
                    description,
                    condition,
                    action,
                    active: true,
                    last_updated: today.to_string(),
                });
                Ok(id)
            }
        }
    }
}

pub fn page(settings: &Settings) -> Result<Page, TableError> {
    let rules = Rules::seeded();
    let table = HierarchicalTable::new(rules.columns(), rules.rows())?
        .with_options(settings.table_options("Search rules..."));
    Ok(Page::new("Rules", table).with_editor(Box::new(rules)))
}

#[cfg(test)]
mod tests {
    use recon_table::{Key, KeyCombo};

    use super::*;

    #[test]
    fn conditions_are_searchable() {
        let mut page = page(&Settings::default()).unwrap();
        page.table.set_search("DEPRECATED");
        let ids: Vec<_> = page.table.visible_rows().iter().map(|v| v.id()).collect();
        assert_eq!(ids, ["3"]);

        page.table.set_search("_exception");
        assert_eq!(page.table.visible_len(), 2);
    }

    #[test]
    fn new_rules_default_to_the_first_action() {
        let form = Rules::seeded().form(None).unwrap();
        assert_eq!(form.value("action"), "flag_exception");
        assert!(form.has_field("condition"));
        assert!(!form.has_field("status"));
    }

    #[test]
    fn saving_an_edit_rewrites_the_condition() {
        let mut rules = Rules::seeded();
        let mut form = rules.form(Some("1")).unwrap();
        // condition is the third field; clear it and type a new one
        form.on_key(&KeyCombo::key(Key::Tab));
        form.on_key(&KeyCombo::key(Key::Tab));
        for _ in 0.."position_variance > 0.05".len() {
            form.on_key(&KeyCombo::key(Key::Backspace));
        }
        for c in "position_variance > 0.10".chars() {
            form.on_key(&KeyCombo::key(Key::Char(c)));
        }
        assert_eq!(rules.save(&form, "2024-02-01").unwrap(), "1");

        let row = rules.rows().remove(0);
        assert_eq!(row.get("condition").unwrap().display_text(), "position_variance > 0.10");
        assert_eq!(row.get("lastUpdated").unwrap().display_text(), "2024-02-01");
        assert_eq!(rules.records.len(), 3);
    }

    #[test]
    fn saving_a_vanished_rule_fails() {
        let mut rules = Rules::seeded();
        let form = rules.form(Some("2")).unwrap();
        rules.records.retain(|r| r.id != "2");
        assert_eq!(rules.save(&form, "2024-02-01").unwrap_err(), "rule 2 no longer exists");
    }
}
