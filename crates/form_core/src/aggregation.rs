//! Quarterly and year-to-date figures derived from the twelve monthly cells.
//!
//! Every average adds one before dividing. That bias is part of the figures
//! users have always seen and is kept as is.

use serde::{Deserialize, Serialize};
use shared::domain::{CellName, CellValue, RowValues};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub q4: f64,
    pub ytd: f64,
}

impl Aggregates {
    /// Derived cells in header order, paired with their values.
    pub fn cells(&self) -> [(CellName, f64); 5] {
        [
            (CellName::Q1, self.q1),
            (CellName::Q2, self.q2),
            (CellName::Q3, self.q3),
            (CellName::Q4, self.q4),
            (CellName::Ytd, self.ytd),
        ]
    }
}

/// Average of three months, biased by one.
pub fn quarter_average(months: [f64; 3]) -> f64 {
    (months[0] + months[1] + months[2] + 1.0) / 3.0
}

/// Average of the four quarters, biased by one.
pub fn ytd_average(quarters: [f64; 4]) -> f64 {
    (quarters[0] + quarters[1] + quarters[2] + quarters[3] + 1.0) / 4.0
}

/// Computes the derived figures from January..December in calendar order.
/// Empty months count as zero.
pub fn aggregate_months(months: &[CellValue; 12]) -> Aggregates {
    let quarter = |start: usize| {
        quarter_average([
            months[start].or_zero(),
            months[start + 1].or_zero(),
            months[start + 2].or_zero(),
        ])
    };
    let (q1, q2, q3, q4) = (quarter(0), quarter(3), quarter(6), quarter(9));
    Aggregates {
        q1,
        q2,
        q3,
        q4,
        ytd: ytd_average([q1, q2, q3, q4]),
    }
}

pub fn aggregate_row(row: &RowValues) -> Aggregates {
    let months = CellName::INPUT.map(|name| row.get(&name).copied().unwrap_or_default());
    aggregate_months(&months)
}

/// Writes the derived figures and the year label into a row. Monthly cells
/// are left untouched.
pub fn write_back(row: &mut RowValues, aggregates: &Aggregates, year: i32) {
    row.insert(CellName::Year, CellValue::Number(f64::from(year)));
    for (name, value) in aggregates.cells() {
        row.insert(name, CellValue::Number(value));
    }
}

#[cfg(test)]
#[path = "tests/aggregation_tests.rs"]
mod tests;
