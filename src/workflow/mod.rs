//! Phase workflow rules.
//!
//! The phase state machine, phase-start prerequisites, combined status
//! change review and progress aggregation. Everything here is a pure
//! function of a unit snapshot and injected configuration.

mod prerequisites;
mod progress;
mod status_change;
mod transitions;

pub use prerequisites::{PhaseStartDecision, can_start_phase};
pub use progress::{ProjectProgress, UnitProgress, current_phase, project_progress, unit_progress};
pub use status_change::{Rejection, StatusChangeDecision, apply_status_change, review_status_change};
pub use transitions::{available_transitions, can_transition};
