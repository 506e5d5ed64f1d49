//! Monthly figure tables: aggregation, fill validation, and session growth.

pub mod aggregation;
pub mod growth;
pub mod layout;
pub mod submit;
pub mod validation;

pub use aggregation::{aggregate_months, aggregate_row, Aggregates};
pub use growth::{apply, FormEvent, Transition};
pub use layout::{current_year, render, DEFAULT_PRECISION};
pub use submit::{submit, SubmitOutcome};
pub use validation::{validate, ValidationError, ValidationErrors};
