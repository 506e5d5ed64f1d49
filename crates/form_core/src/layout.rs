//! Render model of the form: header, tables, and rows oldest year first.

use chrono::{Datelike, Local};
use shared::{
    domain::{CellName, FormState, FormValues, RowId, TableId},
    protocol::{CellView, FormView, HeaderCell, RowView, TableView},
};

/// Input granularity of monthly cells.
pub const INPUT_STEP: f64 = 0.01;

/// Decimals shown for derived cells unless configured otherwise.
pub const DEFAULT_PRECISION: u32 = 2;

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Rounds half away from zero to `precision` decimals.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    (value * factor).round() / factor
}

pub fn header() -> Vec<HeaderCell> {
    CellName::ALL
        .into_iter()
        .map(|name| HeaderCell {
            name,
            label: name.label().to_string(),
        })
        .collect()
}

pub fn render(
    state: FormState,
    values: &FormValues,
    current_year: i32,
    precision: u32,
) -> FormView {
    FormView {
        header: header(),
        tables: state
            .table_ids()
            .map(|table| render_table(state, values, table, current_year, precision))
            .collect(),
    }
}

fn render_table(
    state: FormState,
    values: &FormValues,
    table: TableId,
    current_year: i32,
    precision: u32,
) -> TableView {
    TableView {
        table_id: table,
        key: table.to_string(),
        rows: state
            .row_ids()
            .map(|row| render_row(values, table, row, current_year, precision))
            .collect(),
    }
}

fn render_row(
    values: &FormValues,
    table: TableId,
    row: RowId,
    current_year: i32,
    precision: u32,
) -> RowView {
    let year = row.default_year(current_year);
    let cells = CellName::ALL
        .into_iter()
        .map(|name| {
            let value = match name {
                CellName::Year => Some(f64::from(year)),
                name if name.is_derived() => values
                    .cell(table, row, name)
                    .number()
                    .map(|n| round_to(n, precision)),
                name => values.cell(table, row, name).number(),
            };
            CellView {
                name,
                value,
                disabled: name.is_derived(),
                step: INPUT_STEP,
            }
        })
        .collect();

    RowView {
        row_id: row,
        year,
        cells,
    }
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
