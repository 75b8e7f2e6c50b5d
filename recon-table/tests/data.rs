use recon_table::{Alignment, Column, FieldValue, Fragment, HierarchicalTable, Row, Span};

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_column_defaults() {
    let column: Column = serde_json::from_str(r#"{ "key": "cusip", "header": "CUSIP" }"#).unwrap();
    assert_eq!(column, Column::new("cusip", "CUSIP"));
    assert_eq!(column.align, Alignment::Left);
    assert!(!column.sortable);
}

#[test]
fn test_column_all_fields() {
    let column: Column = serde_json::from_str(
        r#"{
            "key": "variance",
            "header": "Variance",
            "width": 10,
            "align": "right",
            "sortable": true,
            "filterable": true
        }"#,
    )
    .unwrap();
    assert_eq!(
        column,
        Column::new("variance", "Variance")
            .width(10)
            .align(Alignment::Right)
            .sortable()
            .filterable()
    );
}

#[test]
fn test_column_rejects_unknown_alignment() {
    let result: Result<Column, _> =
        serde_json::from_str(r#"{ "key": "a", "header": "A", "align": "justify" }"#);
    assert!(result.is_err());
}

// ============================================================================
// Field values
// ============================================================================

#[test]
fn test_field_value_variants() {
    let text: FieldValue = serde_json::from_str(r#""Fund A1""#).unwrap();
    assert_eq!(text, FieldValue::Text("Fund A1".into()));

    let number: FieldValue = serde_json::from_str("1000000").unwrap();
    assert_eq!(number, FieldValue::Number(1_000_000.0));

    let fragment: FieldValue = serde_json::from_str(
        r#"{ "spans": [{ "text": "Matched", "color": "success", "bold": true }], "search": "matched" }"#,
    )
    .unwrap();
    assert_eq!(
        fragment,
        FieldValue::Fragment(
            Fragment::new()
                .span(Span::new("Matched").color("success").bold())
                .searchable("matched")
        )
    );
}

#[test]
fn test_fragment_without_search_is_not_searchable() {
    let value: FieldValue = serde_json::from_str(r#"{ "spans": [{ "text": "Edit" }] }"#).unwrap();
    assert_eq!(value.search_text(), None);
    assert_eq!(value.display_text(), "Edit");
}

// ============================================================================
// Rows
// ============================================================================

#[test]
fn test_row_field_aliases() {
    let row: Row = serde_json::from_str(
        r#"{
            "id": "1",
            "data": { "cusip": "912828XM5", "variance": 0 },
            "className": "border-l-exception-qty"
        }"#,
    )
    .unwrap();
    assert_eq!(row.get("cusip"), Some(&FieldValue::from("912828XM5")));
    assert_eq!(row.get("variance"), Some(&FieldValue::Number(0.0)));
    assert_eq!(row.style_hint.as_deref(), Some("border-l-exception-qty"));
    assert!(row.children.is_empty());
    assert!(!row.expandable);
}

#[test]
fn test_nested_rows() {
    let row: Row = serde_json::from_str(
        r#"{
            "id": "1",
            "fields": { "cusip": "912828XM5" },
            "expandable": true,
            "children": [
                { "id": "1a", "fields": { "cusip": "912828XM5-A" } },
                { "id": "1b", "fields": { "cusip": "912828XM5-B" } }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(row.children.len(), 2);
    assert_eq!(row.descendant_count(), 2);
    assert_eq!(row.revealable_children().len(), 2);
}

#[test]
fn test_children_without_expandable_stay_hidden() {
    let row: Row = serde_json::from_str(
        r#"{ "id": "1", "children": [{ "id": "1a" }] }"#,
    )
    .unwrap();
    assert!(row.revealable_children().is_empty());

    let mut table = HierarchicalTable::new(vec![Column::new("a", "A")], vec![row]).unwrap();
    table.toggle("1");
    assert_eq!(table.visible_len(), 1);
}

#[test]
fn test_serialize_skips_empty_parts() {
    let row = Row::new("2").field("fund", "Fund B2");
    let json = serde_json::to_value(&row).unwrap();
    assert!(json.get("children").is_none());
    assert!(json.get("style_hint").is_none());
    assert_eq!(json["fields"]["fund"], "Fund B2");
}

#[test]
fn test_deserialized_rows_are_validated() {
    let rows: Vec<Row> =
        serde_json::from_str(r#"[{ "id": "1" }, { "id": "1" }]"#).unwrap();
    assert!(HierarchicalTable::new(vec![], rows).is_err());
}
