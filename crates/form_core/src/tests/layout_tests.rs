use super::*;
use shared::domain::CellValue;

#[test]
fn header_uses_short_labels_in_form_order() {
    let labels: Vec<String> = header().into_iter().map(|cell| cell.label).collect();
    assert_eq!(
        labels,
        [
            "Year", "Jan", "Feb", "Mar", "Q1", "Apr", "May", "June", "Q2", "July", "Aug", "Sep",
            "Q3", "Oct", "Nov", "Dec", "Q4", "YTD",
        ]
    );
}

#[test]
fn renders_every_table_with_rows_oldest_first() {
    let state = FormState {
        table_count: 2,
        row_count: 3,
    };
    let view = render(state, &FormValues::new(), 2026, DEFAULT_PRECISION);

    assert_eq!(view.tables.len(), 2);
    assert_eq!(view.tables[1].key, "table-2");
    for table in &view.tables {
        let years: Vec<i32> = table.rows.iter().map(|row| row.year).collect();
        assert_eq!(years, vec![2024, 2025, 2026]);
        assert!(table.rows.iter().all(|row| row.cells.len() == 18));
    }
}

#[test]
fn derived_cells_are_disabled_and_rounded() {
    let mut values = FormValues::new();
    values.set_cell(TableId(1), RowId(1), CellName::Q1, CellValue::Number(6.333_333));
    values.set_cell(TableId(1), RowId(1), CellName::January, CellValue::Number(3.0));

    let view = render(FormState::default(), &values, 2026, DEFAULT_PRECISION);
    let row = &view.tables[0].rows[0];
    let cell = |name: CellName| {
        row.cells
            .iter()
            .find(|cell| cell.name == name)
            .expect("cell rendered")
    };

    assert_eq!(cell(CellName::Year).value, Some(2026.0));
    assert!(cell(CellName::Year).disabled);
    assert_eq!(cell(CellName::Q1).value, Some(6.33));
    assert!(cell(CellName::Q1).disabled);
    assert_eq!(cell(CellName::Q2).value, None);
    assert_eq!(cell(CellName::January).value, Some(3.0));
    assert!(!cell(CellName::January).disabled);
    assert_eq!(cell(CellName::January).step, INPUT_STEP);
}

#[test]
fn year_cell_ignores_submitted_value() {
    let mut values = FormValues::new();
    values.set_cell(TableId(1), RowId(1), CellName::Year, CellValue::Number(1999.0));

    let view = render(FormState::default(), &values, 2026, DEFAULT_PRECISION);
    assert_eq!(view.tables[0].rows[0].cells[0].value, Some(2026.0));
}

#[test]
fn rounding_is_half_away_from_zero() {
    assert_eq!(round_to(20.083_333, 2), 20.08);
    assert_eq!(round_to(2.5, 0), 3.0);
    assert_eq!(round_to(-2.5, 0), -3.0);
    assert_eq!(round_to(15.333_333, 1), 15.3);
}
