use super::*;
use shared::domain::{CellName, CellValue, RowId};

fn months(values: &mut FormValues, table: u32, row: u32, figures: &[f64]) {
    for (name, figure) in CellName::INPUT.into_iter().zip(figures) {
        values.set_cell(TableId(table), RowId(row), name, CellValue::Number(*figure));
    }
}

#[test]
fn accepted_submission_writes_derived_cells() {
    let mut values = FormValues::new();
    months(
        &mut values,
        1,
        1,
        &[3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0, 33.0, 36.0],
    );

    let SubmitOutcome::Accepted { transition, values } =
        submit(FormState::default(), values, 2026)
    else {
        panic!("submission should be accepted");
    };

    assert!(transition.rebuild);
    assert_eq!(transition.status, Some("Valid"));
    assert_eq!(transition.state, FormState::default());

    let cell = |name| values.cell(TableId(1), RowId(1), name).number().expect("derived");
    assert_eq!(cell(CellName::Year), 2026.0);
    assert!((cell(CellName::Q1) - 6.333_333).abs() < 1e-5);
    assert!((cell(CellName::Q2) - 15.333_333).abs() < 1e-5);
    assert!((cell(CellName::Q3) - 24.333_333).abs() < 1e-5);
    assert!((cell(CellName::Q4) - 33.333_333).abs() < 1e-5);
    assert!((cell(CellName::Ytd) - 20.083_333).abs() < 1e-5);
}

#[test]
fn rejected_submission_computes_nothing() {
    let mut values = FormValues::new();
    months(&mut values, 1, 1, &[5.0, 3.0]);
    values.set_cell(TableId(1), RowId(1), CellName::April, CellValue::Number(2.0));

    let outcome = submit(FormState::default(), values, 2026);
    let SubmitOutcome::Rejected(errors) = outcome else {
        panic!("submission should be rejected");
    };
    assert_eq!(errors.messages()[0].message, "Invalid");
}

#[test]
fn every_table_and_year_is_aggregated() {
    let state = FormState {
        table_count: 2,
        row_count: 2,
    };
    let mut values = FormValues::new();
    months(&mut values, 1, 2, &[1.0; 12]);
    months(&mut values, 1, 1, &[1.0; 12]);
    months(&mut values, 2, 2, &[2.0; 12]);
    months(&mut values, 2, 1, &[2.0; 12]);

    let SubmitOutcome::Accepted { values, .. } = submit(state, values, 2026) else {
        panic!("submission should be accepted");
    };

    assert_eq!(values.cell(TableId(1), RowId(2), CellName::Year), CellValue::Number(2025.0));
    assert_eq!(values.cell(TableId(1), RowId(1), CellName::Q1), CellValue::Number(4.0 / 3.0));
    assert_eq!(values.cell(TableId(2), RowId(2), CellName::Q4), CellValue::Number(7.0 / 3.0));
}

#[test]
fn empty_form_is_accepted_with_biased_figures() {
    let SubmitOutcome::Accepted { values, .. } =
        submit(FormState::default(), FormValues::new(), 2026)
    else {
        panic!("empty form should be accepted");
    };
    let third = 1.0 / 3.0;
    assert_eq!(values.cell(TableId(1), RowId(1), CellName::Q1), CellValue::Number(third));
    assert_eq!(
        values.cell(TableId(1), RowId(1), CellName::Ytd),
        CellValue::Number((third + third + third + third + 1.0) / 4.0)
    );
}

#[test]
fn values_outside_the_session_shape_are_dropped() {
    let mut values = FormValues::new();
    months(&mut values, 0, 1, &[9.0]);
    months(&mut values, 4, 1, &[9.0]);

    let SubmitOutcome::Accepted { values, .. } =
        submit(FormState::default(), values, 2026)
    else {
        panic!("submission should be accepted");
    };
    assert_eq!(values.table_ids().collect::<Vec<_>>(), vec![TableId(1)]);
}

#[test]
fn resubmitting_accepted_values_is_stable() {
    let mut values = FormValues::new();
    months(&mut values, 1, 1, &[1.0, 2.0, 3.0]);

    let SubmitOutcome::Accepted { values: first, .. } =
        submit(FormState::default(), values, 2026)
    else {
        panic!("first submission should be accepted");
    };
    let SubmitOutcome::Accepted { values: second, .. } =
        submit(FormState::default(), first.clone(), 2026)
    else {
        panic!("second submission should be accepted");
    };
    assert_eq!(first, second);
}
