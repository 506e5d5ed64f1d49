//! Table and year counters of a form session.
//!
//! Transitions take the current [`FormState`] by value and hand back the next
//! one; nothing is mutated in place. Counters only ever grow.

use serde::{Deserialize, Serialize};
use shared::{domain::FormState, protocol::STATUS_VALID};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormEvent {
    AddTable,
    AddYear,
    /// A submission that passed validation.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: FormState,
    pub rebuild: bool,
    pub status: Option<&'static str>,
}

pub fn apply(state: FormState, event: FormEvent) -> Transition {
    let transition = match event {
        FormEvent::AddTable => Transition {
            state: FormState {
                table_count: state.table_count.saturating_add(1),
                ..state
            },
            rebuild: true,
            status: None,
        },
        FormEvent::AddYear => Transition {
            state: FormState {
                row_count: state.row_count.saturating_add(1),
                ..state
            },
            rebuild: true,
            status: None,
        },
        FormEvent::Submit => Transition {
            state,
            rebuild: true,
            status: Some(STATUS_VALID),
        },
    };
    debug!(
        ?event,
        table_count = transition.state.table_count,
        row_count = transition.state.row_count,
        "form state transition"
    );
    transition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_table_and_one_year() {
        assert_eq!(
            FormState::default(),
            FormState {
                table_count: 1,
                row_count: 1
            }
        );
    }

    #[test]
    fn add_table_then_add_year() {
        let after_table = apply(FormState::default(), FormEvent::AddTable);
        assert!(after_table.rebuild);
        assert_eq!(
            after_table.state,
            FormState {
                table_count: 2,
                row_count: 1
            }
        );

        let after_year = apply(after_table.state, FormEvent::AddYear);
        assert!(after_year.rebuild);
        assert_eq!(
            after_year.state,
            FormState {
                table_count: 2,
                row_count: 2
            }
        );
    }

    #[test]
    fn submit_keeps_counters_and_reports_valid() {
        let state = FormState {
            table_count: 3,
            row_count: 2,
        };
        let transition = apply(state, FormEvent::Submit);
        assert_eq!(transition.state, state);
        assert!(transition.rebuild);
        assert_eq!(transition.status, Some("Valid"));
    }

    #[test]
    fn counters_never_decrease() {
        let events = [
            FormEvent::AddYear,
            FormEvent::Submit,
            FormEvent::AddTable,
            FormEvent::AddTable,
            FormEvent::Submit,
            FormEvent::AddYear,
        ];
        let mut state = FormState::default();
        for event in events {
            let next = apply(state, event).state;
            assert!(next.table_count >= state.table_count);
            assert!(next.row_count >= state.row_count);
            state = next;
        }
        assert_eq!(
            state,
            FormState {
                table_count: 3,
                row_count: 3
            }
        );
    }

    #[test]
    fn counters_saturate() {
        let state = FormState {
            table_count: u32::MAX,
            row_count: u32::MAX,
        };
        assert_eq!(apply(state, FormEvent::AddTable).state, state);
        assert_eq!(apply(state, FormEvent::AddYear).state, state);
    }
}
