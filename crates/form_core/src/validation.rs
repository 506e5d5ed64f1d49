//! Gap and divergence checks over the monthly cells of every table.
//!
//! A table's monthly cells are flattened row by row, in display order, into
//! one sequence. Once the sequence has started and then hit an empty cell, no
//! later cell may be filled. Every table after the first must also leave the
//! same positions empty as the first table does.

use shared::{
    domain::{CellName, FormState, FormValues, RowId, TableId},
    protocol::ValidationMessage,
};
use thiserror::Error;
use tracing::debug;

const FIRST_TABLE: TableId = TableId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid")]
    Contiguity { table: TableId },
    #[error("Tables are different!")]
    Divergence { table: TableId },
}

impl ValidationError {
    pub fn table(&self) -> TableId {
        match self {
            ValidationError::Contiguity { table } | ValidationError::Divergence { table } => *table,
        }
    }

    pub fn to_message(&self) -> ValidationMessage {
        ValidationMessage {
            table_id: self.table(),
            table: self.table().to_string(),
            message: self.to_string(),
        }
    }
}

/// Errors gathered over one validation pass, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Records an error once; repeats for the same table and kind are dropped.
    pub fn record(&mut self, error: ValidationError) {
        if !self.errors.contains(&error) {
            debug!(table = %error.table(), %error, "form validation error");
            self.errors.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn for_table(&self, table: TableId) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |error| error.table() == table)
    }

    pub fn messages(&self) -> Vec<ValidationMessage> {
        self.errors.iter().map(ValidationError::to_message).collect()
    }
}

/// Filled flags of a table's monthly cells, row-major over `rows`.
pub fn fill_pattern(
    values: &FormValues,
    table: TableId,
    rows: impl IntoIterator<Item = RowId>,
) -> Vec<bool> {
    rows.into_iter()
        .flat_map(|row| {
            CellName::INPUT
                .into_iter()
                .map(move |name| values.cell(table, row, name).is_filled())
        })
        .collect()
}

/// Position of the first filled cell that follows a gap, if any.
pub fn find_gap(pattern: &[bool]) -> Option<usize> {
    let start = pattern.iter().position(|filled| *filled)?;
    let end = start + pattern[start..].iter().position(|filled| !*filled)?;
    pattern[end..]
        .iter()
        .position(|filled| *filled)
        .map(|offset| end + offset)
}

/// Whether two tables leave different positions empty. Positions past the
/// end of the shorter pattern count as empty.
pub fn patterns_differ(reference: &[bool], candidate: &[bool]) -> bool {
    let len = reference.len().max(candidate.len());
    (0..len).any(|i| {
        reference.get(i).copied().unwrap_or(false) != candidate.get(i).copied().unwrap_or(false)
    })
}

/// Checks every table of the form; never stops at the first failure.
pub fn validate(state: FormState, values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let reference = fill_pattern(values, FIRST_TABLE, state.row_ids());

    for table in state.table_ids() {
        let pattern = if table == FIRST_TABLE {
            reference.clone()
        } else {
            fill_pattern(values, table, state.row_ids())
        };

        if table != FIRST_TABLE && patterns_differ(&reference, &pattern) {
            errors.record(ValidationError::Divergence { table });
        }
        if let Some(position) = find_gap(&pattern) {
            debug!(%table, position, "filled cell after gap");
            errors.record(ValidationError::Contiguity { table });
        }
    }

    errors
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
