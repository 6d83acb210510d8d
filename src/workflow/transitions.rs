//! Phase state machine.
//!
//! Answers whether a status change is legal for a phase, using the injected
//! [`TransitionTable`]. Phase names arrive as text from upstream data, so an
//! unrecognised name is a legal input that simply permits nothing.

use crate::config::TransitionTable;
use crate::models::{Phase, Status};

/// Returns true if `phase` may move from `current` to `proposed`.
///
/// A transition to the same status is never legal. Unknown phase names
/// return false.
///
/// # Example
///
/// ```
/// use fiber_workflow::config::TransitionTable;
/// use fiber_workflow::models::Status;
/// use fiber_workflow::workflow::can_transition;
///
/// let table = TransitionTable::standard();
/// assert!(can_transition(&table, "boring", Status::Complete, Status::QcApproved));
/// assert!(!can_transition(&table, "boring", Status::NotStarted, Status::Complete));
/// assert!(!can_transition(&table, "trenching", Status::NotStarted, Status::InProgress));
/// ```
pub fn can_transition(
    table: &TransitionTable,
    phase: &str,
    current: Status,
    proposed: Status,
) -> bool {
    Phase::parse(phase).is_some_and(|phase| is_legal(table, phase, current, proposed))
}

/// Returns the statuses `phase` may move to from `current`.
///
/// Empty for terminal statuses and unknown phase names.
pub fn available_transitions(table: &TransitionTable, phase: &str, current: Status) -> Vec<Status> {
    match Phase::parse(phase) {
        Some(phase) => table.successors(phase, current).to_vec(),
        None => Vec::new(),
    }
}

/// Typed form of [`can_transition`].
pub(crate) fn is_legal(table: &TransitionTable, phase: Phase, current: Status, proposed: Status) -> bool {
    current != proposed && table.successors(phase, current).contains(&proposed)
}
