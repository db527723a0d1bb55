use datadeck::data::cell::CellValue;
use datadeck::data::row_model::{rows_from_json, Column, Row, RowModel, SortDirection, SortKey};

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "Id"),
        Column::new("name", "Name").editable(),
    ]
}

fn named_rows(names: &[&str]) -> Vec<Row> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Row::new(vec![
                CellValue::Integer(i as i64 + 1),
                CellValue::String((*name).to_string()),
            ])
        })
        .collect()
}

fn page_names(model: &RowModel) -> Vec<String> {
    model
        .page_rows()
        .iter()
        .filter_map(|&i| model.cell(i, 1).map(|c| c.render()))
        .collect()
}

#[test]
fn filter_shrink_clamps_to_a_nonempty_page() {
    // 12 rows, page size 10, standing on page 2 (rows 11-12)
    let names: Vec<String> = (1..=12)
        .map(|i| {
            if i <= 5 {
                format!("keeper{}", i)
            } else {
                format!("other{}", i)
            }
        })
        .collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut model = RowModel::new(columns(), named_rows(&name_refs), 10);
    model.set_page_index(1);
    assert_eq!(model.page_rows().len(), 2);

    // filtering down to 5 rows must land on page 1 showing all 5
    model.set_filter_text("keeper");
    assert_eq!(model.filtered_count(), 5);
    assert_eq!(model.page_index(), 0);
    assert_eq!(model.page_rows().len(), 5);
}

#[test]
fn goto_page_sanitizes_and_clamps() {
    let names: Vec<String> = (1..=12).map(|i| format!("row{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut model = RowModel::new(columns(), named_rows(&name_refs), 10);
    assert_eq!(model.page_count(), 2);

    // digits are extracted, then the request clamps into [1, page_count]
    assert_eq!(model.goto_page("abc3def"), 2);
    assert_eq!(model.page_index(), 1);

    assert_eq!(model.goto_page("abc"), 1);
    assert_eq!(model.page_index(), 0);

    assert_eq!(model.goto_page(""), 1);
    assert_eq!(model.goto_page("0"), 1);
    assert_eq!(model.goto_page("999999999999999999999999"), 2);
}

#[test]
fn sort_cycle_through_header_toggles() {
    let mut model = RowModel::new(
        vec![Column::new("n", "N")],
        vec![
            Row::new(vec![CellValue::Integer(3)]),
            Row::new(vec![CellValue::Integer(1)]),
            Row::new(vec![CellValue::Integer(2)]),
        ],
        10,
    );

    let order = |m: &RowModel| -> Vec<String> {
        m.page_rows()
            .iter()
            .filter_map(|&i| m.cell(i, 0).map(|c| c.render()))
            .collect()
    };

    model.toggle_sort(0).unwrap();
    assert_eq!(order(&model), vec!["1", "2", "3"]);

    model.toggle_sort(0).unwrap();
    assert_eq!(order(&model), vec!["3", "2", "1"]);

    model.toggle_sort(0).unwrap();
    assert_eq!(order(&model), vec!["3", "1", "2"]);
    assert!(model.sort_keys().is_empty());
}

#[test]
fn multi_column_sort_breaks_ties_in_toggle_order() {
    let rows = vec![
        Row::new(vec![
            CellValue::String("b".to_string()),
            CellValue::Integer(2),
        ]),
        Row::new(vec![
            CellValue::String("a".to_string()),
            CellValue::Integer(2),
        ]),
        Row::new(vec![
            CellValue::String("a".to_string()),
            CellValue::Integer(1),
        ]),
    ];
    let mut model = RowModel::new(
        vec![Column::new("k", "K"), Column::new("v", "V")],
        rows,
        10,
    );

    model.toggle_sort(0).unwrap(); // primary: k ascending
    model.toggle_sort(1).unwrap(); // secondary: v ascending
    assert_eq!(
        model.sort_keys(),
        &[
            SortKey {
                column: 0,
                descending: false
            },
            SortKey {
                column: 1,
                descending: false
            },
        ]
    );

    let pairs: Vec<(String, String)> = model
        .page_rows()
        .iter()
        .map(|&i| {
            (
                model.cell(i, 0).map(|c| c.render()).unwrap_or_default(),
                model.cell(i, 1).map(|c| c.render()).unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("a".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn column_hints_seed_the_initial_sort() {
    let model = RowModel::new(
        vec![
            Column::new("k", "K"),
            Column::new("v", "V").with_sort_hint(SortDirection::Descending),
        ],
        vec![
            Row::new(vec![
                CellValue::String("x".to_string()),
                CellValue::Integer(1),
            ]),
            Row::new(vec![
                CellValue::String("y".to_string()),
                CellValue::Integer(3),
            ]),
            Row::new(vec![
                CellValue::String("z".to_string()),
                CellValue::Integer(2),
            ]),
        ],
        10,
    );

    assert_eq!(
        model.sort_keys(),
        &[SortKey {
            column: 1,
            descending: true
        }]
    );
    let values: Vec<String> = model
        .page_rows()
        .iter()
        .filter_map(|&i| model.cell(i, 1).map(|c| c.render()))
        .collect();
    assert_eq!(values, vec!["3", "2", "1"]);
}

#[test]
fn datetime_cells_sort_chronologically() {
    let mut model = RowModel::new(
        vec![Column::new("d", "D")],
        vec![
            Row::new(vec![CellValue::infer_from_string("2024-06-15")]),
            Row::new(vec![CellValue::infer_from_string("2023-12-31")]),
            Row::new(vec![CellValue::infer_from_string("2024-01-01")]),
        ],
        10,
    );
    model.toggle_sort(0).unwrap();

    let dates: Vec<String> = model
        .page_rows()
        .iter()
        .filter_map(|&i| model.cell(i, 0).map(|c| c.render()))
        .collect();
    assert_eq!(
        dates,
        vec![
            "2023-12-31 00:00:00",
            "2024-01-01 00:00:00",
            "2024-06-15 00:00:00"
        ]
    );
}

#[test]
fn cell_edit_replaces_one_cell_without_touching_the_original() {
    let mut model = RowModel::new(columns(), named_rows(&["a", "b", "c"]), 10);
    let before = model.rows();

    model
        .edit_cell(1, 1, CellValue::String("b2".to_string()))
        .unwrap();

    let after = model.rows();
    // exactly one cell differs
    assert_eq!(after[1].cell(1), Some(&CellValue::String("b2".to_string())));
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].cell(0), before[1].cell(0));
    // the original collection is unchanged
    assert_eq!(before[1].cell(1), Some(&CellValue::String("b".to_string())));
}

#[test]
fn edit_out_of_bounds_is_rejected() {
    let mut model = RowModel::new(columns(), named_rows(&["a"]), 10);
    assert!(model.edit_cell(5, 0, CellValue::Null).is_err());
    assert!(model.edit_cell(0, 9, CellValue::Null).is_err());
}

#[test]
fn rows_load_from_json_records() {
    let cols = columns();
    let rows = rows_from_json(
        &cols,
        &serde_json::json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob", "extra": "ignored"},
            {"name": "NoId"}
        ]),
    )
    .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].cell(0), Some(&CellValue::Integer(1)));
    assert_eq!(rows[1].cell(1), Some(&CellValue::String("Bob".to_string())));
    // missing accessor becomes a null cell
    assert_eq!(rows[2].cell(0), Some(&CellValue::Null));

    assert!(rows_from_json(&cols, &serde_json::json!({"not": "an array"})).is_err());
}

#[test]
fn unfiltered_pages_slice_in_order() {
    let names: Vec<String> = (1..=25).map(|i| format!("row{:02}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut model = RowModel::new(columns(), named_rows(&name_refs), 10);

    assert_eq!(model.page_count(), 3);
    assert_eq!(page_names(&model).first().map(String::as_str), Some("row01"));

    model.next_page();
    assert_eq!(page_names(&model).first().map(String::as_str), Some("row11"));

    model.next_page();
    assert_eq!(model.page_rows().len(), 5);

    // clamped at the last page
    model.next_page();
    assert_eq!(model.page_index(), 2);
}
