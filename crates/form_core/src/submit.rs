use shared::domain::{FormState, FormValues, TableId};
use tracing::{debug, info};

use crate::{
    aggregation::{aggregate_row, write_back},
    growth::{apply, FormEvent, Transition},
    validation::{validate, ValidationErrors},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Values passed validation; derived cells hold the computed figures.
    Accepted {
        transition: Transition,
        values: FormValues,
    },
    /// Nothing was computed; the session keeps its previous values.
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// Validates a submission and, when it passes, computes every row's derived
/// cells.
pub fn submit(state: FormState, mut values: FormValues, current_year: i32) -> SubmitOutcome {
    values.conform_to(state);

    let errors = validate(state, &values);
    if !errors.is_empty() {
        info!(errors = errors.len(), "form submission rejected");
        return SubmitOutcome::Rejected(errors);
    }

    // Table indices run 0..=table_count; there is never a table 0.
    for index in 0..=state.table_count {
        let table = TableId(index);
        let Some(rows) = values.table_mut(table) else {
            debug!(%table, "no values for table, skipping aggregation");
            continue;
        };
        for (row, cells) in rows.iter_mut() {
            let aggregates = aggregate_row(cells);
            write_back(cells, &aggregates, row.default_year(current_year));
        }
    }

    let transition = apply(state, FormEvent::Submit);
    info!(
        table_count = state.table_count,
        row_count = state.row_count,
        "form submission accepted"
    );
    SubmitOutcome::Accepted { transition, values }
}

#[cfg(test)]
#[path = "tests/submit_tests.rs"]
mod tests;
