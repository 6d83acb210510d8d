//! Phase-start prerequisites.
//!
//! Boring may always begin. Every later phase requires the phase before it to
//! be QC approved. This check is independent of the transition table; a
//! caller must satisfy both before moving a phase out of Not Started.

use serde::{Deserialize, Serialize};

use crate::models::{Phase, Status, WorkUnit};

/// Whether a phase may begin, with a human-readable reason for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStartDecision {
    /// True when the phase may begin.
    pub allowed: bool,
    /// Why the phase may or may not begin.
    pub reason: String,
}

impl PhaseStartDecision {
    fn allowed(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
        }
    }

    fn refused(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Decides whether `phase` may begin on `unit`.
///
/// The predecessor status is read from the unit's own phase map. A splice
/// point does not track pulling, so for splicing it falls back to the
/// pulling status of its feeding cable. A predecessor with no known status
/// is not QC approved.
///
/// # Example
///
/// ```
/// use fiber_workflow::models::{Phase, SegmentDetails, Status, WorkUnit};
/// use fiber_workflow::workflow::can_start_phase;
/// use rust_decimal::Decimal;
///
/// let unit = WorkUnit::segment(
///     "SEG-001",
///     SegmentDetails {
///         footage: Decimal::from(500),
///         actual_footage: None,
///         duct_count: None,
///         fiber_count: None,
///     },
/// )
/// .with_phase_status(Phase::Boring, Status::Complete);
///
/// let decision = can_start_phase(&unit, "pulling");
/// assert!(!decision.allowed);
/// assert_eq!(decision.reason, "boring must be QC Approved before pulling can begin");
/// ```
pub fn can_start_phase(unit: &WorkUnit, phase: &str) -> PhaseStartDecision {
    match Phase::parse(phase) {
        Some(phase) => start_decision(unit, phase),
        None => PhaseStartDecision::refused("Unknown phase"),
    }
}

/// Typed form of [`can_start_phase`].
pub(crate) fn start_decision(unit: &WorkUnit, phase: Phase) -> PhaseStartDecision {
    let Some(predecessor) = phase.predecessor() else {
        return PhaseStartDecision::allowed(format!("{} is the first phase", phase));
    };

    if predecessor_status(unit, predecessor) == Some(Status::QcApproved) {
        PhaseStartDecision::allowed(format!("{} QC approved", predecessor))
    } else {
        PhaseStartDecision::refused(format!(
            "{} must be QC Approved before {} can begin",
            predecessor, phase
        ))
    }
}

fn predecessor_status(unit: &WorkUnit, predecessor: Phase) -> Option<Status> {
    unit.status(predecessor).or_else(|| match predecessor {
        Phase::Pulling => unit
            .as_splice_point()
            .and_then(|details| details.feed_pulling_status),
        Phase::Boring | Phase::Splicing => None,
    })
}
