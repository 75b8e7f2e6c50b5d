use std::cell::RefCell;
use std::rc::Rc;

use recon_table::{
    Column, EventResult, FieldValue, Fragment, HierarchicalTable, Key, KeyCombo, Modifiers, Row,
    Span, TableError, TableOptions, Violation, filter_rows,
};

fn cusip_columns() -> Vec<Column> {
    vec![Column::new("cusip", "CUSIP")]
}

fn scenario_rows() -> Vec<Row> {
    vec![
        Row::new("1")
            .field("cusip", "912828XM5")
            .children(vec![Row::new("1a").field("cusip", "912828XM5-A")]),
    ]
}

fn positions() -> Vec<Row> {
    vec![
        Row::new("1")
            .field("cusip", "912828XM5")
            .field("security", "US Treasury Note 2.5% 2027")
            .field("fund", "Fund A1")
            .field("internalPosition", 1_000_000i64)
            .children(vec![
                Row::new("1a")
                    .field("cusip", "912828XM5")
                    .field("security", "US Treasury Note 2.5% 2027 - Lot A")
                    .field("fund", "Fund A1"),
                Row::new("1b")
                    .field("cusip", "912828XM5")
                    .field("security", "US Treasury Note 2.5% 2027 - Lot B")
                    .field("fund", "Fund A1"),
            ]),
        Row::new("2")
            .field("cusip", "037833100")
            .field("security", "Apple Inc Common Stock")
            .field("fund", "Fund B2")
            .field("variance", 0.027),
        Row::new("3")
            .field("cusip", "594918104")
            .field("security", "Microsoft Corp Common Stock")
            .field("fund", "Fund C3")
            .field(
                "status",
                Fragment::new()
                    .span(Span::new("Unmatched").color("error"))
                    .searchable("unmatched"),
            ),
        Row::new("4")
            .field("cusip", "79466L302")
            .field("security", "Salesforce Inc Common Stock")
            .field("fund", "Fund A1"),
        Row::new("5")
            .field("cusip", "46625H100")
            .field("security", "JPMorgan Chase & Co")
            .field("fund", "Fund B2")
            .children(vec![Row::new("5a").field("security", "Lot only text: zebra")]),
    ]
}

fn position_columns() -> Vec<Column> {
    vec![
        Column::new("cusip", "CUSIP"),
        Column::new("security", "Security"),
        Column::new("fund", "Fund"),
        Column::new("status", "Status"),
    ]
}

fn visible_ids(table: &HierarchicalTable) -> Vec<String> {
    table.visible_rows().iter().map(|v| v.id().to_string()).collect()
}

fn press(table: &mut HierarchicalTable, key: Key) -> EventResult {
    table.on_key(&KeyCombo::key(key))
}

fn clicks(table: &mut HierarchicalTable) -> Rc<RefCell<Vec<Row>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    table.on_row_click(move |row| sink.borrow_mut().push(row.clone()));
    seen
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_scenario_toggle_and_search() {
    let mut table = HierarchicalTable::new(cusip_columns(), scenario_rows()).unwrap();
    assert_eq!(visible_ids(&table), vec!["1"]);

    table.toggle("1");
    let visible = table.visible_rows();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[1].id(), "1a");
    assert_eq!(visible[1].depth, 1);
    drop(visible);

    // Search keeps the parent; the child follows expansion state only.
    table.set_search("XM5");
    assert_eq!(visible_ids(&table), vec!["1", "1a"]);
    table.toggle("1");
    assert_eq!(visible_ids(&table), vec!["1"]);
}

// ============================================================================
// Filter
// ============================================================================

#[test]
fn test_filter_matches_definition() {
    let rows = positions();
    for term in ["", "fund a1", "XM5", "0.027", "1000000", "unmatched", "zebra", "z", "Inc"] {
        let expected: Vec<&str> = rows
            .iter()
            .filter(|row| {
                term.is_empty()
                    || row.fields.values().any(|v| {
                        v.search_text()
                            .is_some_and(|s| s.to_lowercase().contains(&term.to_lowercase()))
                    })
            })
            .map(|row| row.id.as_str())
            .collect();
        let actual: Vec<&str> = filter_rows(&rows, term).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(actual, expected, "term {term:?}");
    }
}

#[test]
fn test_empty_search_is_identity() {
    let table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    let ids: Vec<&str> = table.filtered_rows().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_search_is_shallow() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.expand("5");
    // "zebra" only lives in child 5a: both it and its parent disappear.
    table.set_search("zebra");
    assert!(table.visible_rows().is_empty());
}

#[test]
fn test_searchable_fragment_and_numbers() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.set_search("UNMATCHED");
    assert_eq!(visible_ids(&table), vec!["3"]);
    table.set_search("1000000");
    assert_eq!(visible_ids(&table), vec!["1"]);
}

#[test]
fn test_unsearchable_fragment() {
    let rows = vec![Row::new("1").field("status", Fragment::new().span(Span::new("Matched")))];
    let mut table = HierarchicalTable::new(vec![Column::new("status", "Status")], rows).unwrap();
    table.set_search("Matched");
    assert!(table.visible_rows().is_empty());
}

// ============================================================================
// Expansion
// ============================================================================

#[test]
fn test_toggle_twice_is_identity() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.toggle("5");
    let before = table.expansion().clone();
    table.toggle("1");
    table.toggle("1");
    assert_eq!(table.expansion(), &before);
}

#[test]
fn test_collapse_does_not_cascade() {
    let rows = vec![Row::new("a").children(vec![
        Row::new("b").children(vec![Row::new("c")]),
    ])];
    let mut table = HierarchicalTable::new(cusip_columns(), rows).unwrap();
    table.toggle("a");
    table.toggle("b");
    assert_eq!(visible_ids(&table), vec!["a", "b", "c"]);

    table.toggle("a");
    assert_eq!(visible_ids(&table), vec!["a"]);
    assert!(table.is_expanded("b"));

    table.toggle("a");
    assert_eq!(visible_ids(&table), vec!["a", "b", "c"]);
}

#[test]
fn test_expandable_without_children_reveals_nothing() {
    let rows = vec![Row::new("1").expandable(true), Row::new("2")];
    let mut table = HierarchicalTable::new(cusip_columns(), rows).unwrap();
    assert!(table.toggle("1"));
    assert_eq!(visible_ids(&table), vec!["1", "2"]);
    assert!(table.visible_rows()[0].has_disclosure());
}

#[test]
fn test_toggle_unknown_id_is_recorded() {
    let mut table = HierarchicalTable::new(cusip_columns(), scenario_rows()).unwrap();
    assert!(table.toggle("ghost"));
    assert!(table.is_expanded("ghost"));
    assert_eq!(visible_ids(&table), vec!["1"]);
}

#[test]
fn test_rendering_completeness_and_depths() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.toggle("1");
    table.toggle("5");
    table.toggle("2"); // no children

    let visible = table.visible_rows();
    let expected_len = 5 + 2 + 1;
    assert_eq!(visible.len(), expected_len);

    for (i, v) in visible.iter().enumerate() {
        if v.expanded && !v.row.revealable_children().is_empty() {
            let kids = v.row.revealable_children();
            for (k, child) in kids.iter().enumerate() {
                let drawn = &visible[i + 1 + k];
                assert_eq!(drawn.id(), child.id);
                assert_eq!(drawn.depth, v.depth + 1);
            }
        }
    }
}

#[test]
fn test_expansion_survives_data_refresh() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.toggle("1");
    let mut refreshed = positions();
    refreshed.remove(1);
    table.set_data(position_columns(), refreshed).unwrap();
    assert!(table.is_expanded("1"));
    assert_eq!(&visible_ids(&table)[..3], &["1", "1a", "1b"]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_duplicate_ids_rejected() {
    let rows = vec![
        Row::new("1").children(vec![Row::new("2")]),
        Row::new("2"),
    ];
    let err = HierarchicalTable::new(cusip_columns(), rows).unwrap_err();
    assert_eq!(
        err,
        TableError::InvalidTableData(Violation::DuplicateRowId {
            id: "2".into(),
            depth: 0
        })
    );
    assert!(err.to_string().starts_with("invalid table data"));
}

#[test]
fn test_empty_id_rejected() {
    let rows = vec![Row::new("1").children(vec![Row::new("")])];
    let err = HierarchicalTable::new(cusip_columns(), rows).unwrap_err();
    assert!(matches!(
        err,
        TableError::InvalidTableData(Violation::EmptyRowId { depth: 1, .. })
    ));
}

#[test]
fn test_failed_refresh_keeps_previous_data() {
    let mut table = HierarchicalTable::new(cusip_columns(), scenario_rows()).unwrap();
    let bad = vec![Row::new("x"), Row::new("x")];
    assert!(table.set_data(cusip_columns(), bad).is_err());
    assert_eq!(visible_ids(&table), vec!["1"]);
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_typing_edits_search() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    for c in "apple".chars() {
        assert_eq!(press(&mut table, Key::Char(c)), EventResult::Consumed);
    }
    assert_eq!(table.search_text(), "apple");
    assert_eq!(visible_ids(&table), vec!["2"]);

    press(&mut table, Key::Backspace);
    assert_eq!(table.search_text(), "appl");

    assert_eq!(press(&mut table, Key::Escape), EventResult::Consumed);
    assert_eq!(table.search_text(), "");
    assert_eq!(press(&mut table, Key::Escape), EventResult::Ignored);
}

#[test]
fn test_ctrl_chars_are_not_typed() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    let combo = KeyCombo::new(Key::Char('q'), Modifiers { ctrl: true, ..Default::default() });
    assert_eq!(table.on_key(&combo), EventResult::Ignored);
    assert_eq!(table.search_text(), "");
}

#[test]
fn test_arrow_navigation_through_tree() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    assert_eq!(table.cursor_id(), Some("1"));

    // Right expands, Right again descends into the first child.
    assert_eq!(press(&mut table, Key::Right), EventResult::Consumed);
    assert!(table.is_expanded("1"));
    press(&mut table, Key::Right);
    assert_eq!(table.cursor_id(), Some("1a"));

    press(&mut table, Key::Down);
    assert_eq!(table.cursor_id(), Some("1b"));

    // Left on a leaf goes to the parent, Left again collapses it.
    press(&mut table, Key::Left);
    assert_eq!(table.cursor_id(), Some("1"));
    press(&mut table, Key::Left);
    assert!(!table.is_expanded("1"));
    assert_eq!(table.cursor_id(), Some("1"));

    press(&mut table, Key::End);
    assert_eq!(table.cursor_id(), Some("5"));
    press(&mut table, Key::Home);
    assert_eq!(table.cursor_id(), Some("1"));
    assert_eq!(press(&mut table, Key::Up), EventResult::Ignored);
}

#[test]
fn test_cursor_stays_on_row_when_rows_above_collapse() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.toggle("1");
    table.set_cursor(4); // row "3"
    assert_eq!(table.cursor_id(), Some("3"));
    table.toggle("1");
    assert_eq!(table.cursor_id(), Some("3"));
}

#[test]
fn test_enter_fires_callback_with_children() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    let seen = clicks(&mut table);
    assert_eq!(press(&mut table, Key::Enter), EventResult::Consumed);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, "1");
    assert_eq!(seen[0].children.len(), 2);
}

#[test]
fn test_enter_on_nested_row() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    let seen = clicks(&mut table);
    table.toggle("1");
    table.set_cursor(2);
    press(&mut table, Key::Enter);
    assert_eq!(seen.borrow()[0].id, "1b");
}

#[test]
fn test_space_toggles_when_not_searchable() {
    let mut table = HierarchicalTable::new(position_columns(), positions())
        .unwrap()
        .with_options(TableOptions::new().searchable(false));
    assert_eq!(press(&mut table, Key::Char(' ')), EventResult::Consumed);
    assert!(table.is_expanded("1"));
    assert_eq!(press(&mut table, Key::Char('x')), EventResult::Ignored);
    assert_eq!(table.search_text(), "");
}

#[test]
fn test_disabling_search_clears_filter() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.set_search("apple");
    table.set_options(TableOptions::new().searchable(false));
    assert_eq!(table.search_text(), "");
    assert_eq!(table.visible_len(), 5);
}

#[test]
fn test_disabling_search_resets_cursor() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.set_search("fund b2");
    table.set_cursor(1);
    assert_eq!(table.cursor_id(), Some("5"));

    table.set_options(TableOptions::new().searchable(false));
    assert_eq!(table.cursor(), Some(0));
    assert_eq!(table.cursor_id(), Some("1"));
}

#[test]
fn test_search_resets_cursor() {
    let mut table = HierarchicalTable::new(position_columns(), positions()).unwrap();
    table.set_cursor(3);
    table.set_search("fund b2");
    assert_eq!(table.cursor(), Some(0));
    table.set_search("zzz-no-match");
    assert_eq!(table.cursor(), None);
    assert_eq!(press(&mut table, Key::Enter), EventResult::Ignored);
}

#[test]
fn test_numbers_are_field_values() {
    let row = Row::new("1").field("n", 42i64);
    assert_eq!(row.get("n"), Some(&FieldValue::Number(42.0)));
}
