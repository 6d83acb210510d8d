//! Status change review.
//!
//! Combines the transition table, the phase-start prerequisite and the
//! evidence check into one decision. Every failed check is reported, so a
//! caller can show all of them at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::evidence::{assess_evidence, phase_evidence};
use crate::models::{EvidenceReport, EvidenceSet, Phase, Status, WorkUnit};

use super::prerequisites::start_decision;
use super::transitions::is_legal;

/// Why a proposed status change was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The phase name is not boring, pulling or splicing.
    UnknownPhase {
        /// The name that was supplied.
        phase: String,
    },
    /// The unit does not track this phase.
    PhaseNotTracked {
        /// The phase that was requested.
        phase: Phase,
    },
    /// The transition table does not allow the change.
    IllegalTransition {
        /// Current status.
        from: Status,
        /// Proposed status.
        to: Status,
    },
    /// The previous phase is not QC approved.
    PrerequisiteNotMet {
        /// Human-readable explanation.
        reason: String,
    },
    /// The phase lacks the evidence needed to be marked complete.
    IncompleteEvidence {
        /// What is missing.
        report: EvidenceReport,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownPhase { .. } => write!(f, "Unknown phase"),
            Rejection::PhaseNotTracked { phase } => {
                write!(f, "{} is not tracked for this unit", phase)
            }
            Rejection::IllegalTransition { from, to } => {
                write!(f, "cannot change status from {} to {}", from, to)
            }
            Rejection::PrerequisiteNotMet { reason } => write!(f, "{}", reason),
            Rejection::IncompleteEvidence { report } => write!(
                f,
                "evidence incomplete: {} of {} photos, {} of {} tests{}",
                report.photos.supplied_count,
                report.photos.required_count,
                report.recorded_tests,
                report.required_tests,
                if report.test_artifact_required && !report.test_artifact_present {
                    ", test artifact missing"
                } else {
                    ""
                }
            ),
        }
    }
}

/// Outcome of reviewing a proposed status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeDecision {
    /// True when no check failed.
    pub allowed: bool,
    /// Every failed check, in evaluation order.
    pub rejections: Vec<Rejection>,
}

impl StatusChangeDecision {
    fn from_rejections(rejections: Vec<Rejection>) -> Self {
        Self {
            allowed: rejections.is_empty(),
            rejections,
        }
    }
}

/// Reviews moving `phase` of `unit` to `proposed`.
///
/// Checks, in order: the phase name, whether the unit tracks the phase, the
/// transition table, the start prerequisite (only when leaving Not Started),
/// and evidence completeness (only when moving to Complete). Missing
/// evidence is treated as an empty set. The unit is not modified.
///
/// # Example
///
/// ```
/// use fiber_workflow::config::EngineConfig;
/// use fiber_workflow::models::{SegmentDetails, Status, WorkUnit};
/// use fiber_workflow::workflow::review_status_change;
/// use rust_decimal::Decimal;
///
/// let unit = WorkUnit::segment(
///     "SEG-001",
///     SegmentDetails {
///         footage: Decimal::from(500),
///         actual_footage: None,
///         duct_count: Some(6),
///         fiber_count: Some(288),
///     },
/// );
/// let config = EngineConfig::standard();
///
/// assert!(review_status_change(&unit, "boring", Status::InProgress, None, &config).allowed);
/// assert!(!review_status_change(&unit, "pulling", Status::InProgress, None, &config).allowed);
/// ```
pub fn review_status_change(
    unit: &WorkUnit,
    phase: &str,
    proposed: Status,
    evidence: Option<&EvidenceSet>,
    config: &EngineConfig,
) -> StatusChangeDecision {
    let Some(phase) = Phase::parse(phase) else {
        return StatusChangeDecision::from_rejections(vec![Rejection::UnknownPhase {
            phase: phase.to_string(),
        }]);
    };
    let Some(current) = unit.status(phase) else {
        return StatusChangeDecision::from_rejections(vec![Rejection::PhaseNotTracked { phase }]);
    };

    let mut rejections = Vec::new();

    if !is_legal(config.transitions(), phase, current, proposed) {
        rejections.push(Rejection::IllegalTransition {
            from: current,
            to: proposed,
        });
    }

    if current == Status::NotStarted && proposed == Status::InProgress {
        let decision = start_decision(unit, phase);
        if !decision.allowed {
            rejections.push(Rejection::PrerequisiteNotMet {
                reason: decision.reason,
            });
        }
    }

    if proposed == Status::Complete {
        let requirement = phase_evidence(config.evidence(), phase, unit.as_splice_point());
        let empty = EvidenceSet::default();
        let report = assess_evidence(
            &requirement,
            evidence.unwrap_or(&empty),
            config.power_meter(),
        );
        if !report.complete {
            rejections.push(Rejection::IncompleteEvidence { report });
        }
    }

    StatusChangeDecision::from_rejections(rejections)
}

/// Reviews a status change and, if allowed, returns the next snapshot.
///
/// The returned unit has `phase` set to `proposed` and its version bumped.
/// Persisting it, and re-reviewing after a conflicting write, is up to the
/// caller.
pub fn apply_status_change(
    unit: &WorkUnit,
    phase: &str,
    proposed: Status,
    evidence: Option<&EvidenceSet>,
    config: &EngineConfig,
) -> Result<WorkUnit, Vec<Rejection>> {
    let decision = review_status_change(unit, phase, proposed, evidence, config);
    if !decision.allowed {
        return Err(decision.rejections);
    }

    match Phase::parse(phase) {
        Some(phase) => Ok(unit.transitioned(phase, proposed)),
        None => Err(vec![Rejection::UnknownPhase {
            phase: phase.to_string(),
        }]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SegmentDetails, SpliceDetails, SplicePosition, SpliceType};
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn config() -> EngineConfig {
        EngineConfig::standard()
    }

    fn segment() -> WorkUnit {
        WorkUnit::segment(
            "SEG-001",
            SegmentDetails {
                footage: Decimal::from(500),
                actual_footage: None,
                duct_count: Some(6),
                fiber_count: Some(288),
            },
        )
    }

    fn splice_point() -> WorkUnit {
        WorkUnit::splice_point(
            "SP-001",
            SpliceDetails {
                splice_type: SpliceType::OneByFour,
                position: SplicePosition::MidSpan,
                fiber_count: Some(2),
                tray_count: None,
                test_count: None,
                feed_pulling_status: Some(Status::QcApproved),
            },
        )
    }

    fn full_evidence(unit: &WorkUnit, phase: Phase, config: &EngineConfig) -> EvidenceSet {
        let requirement = phase_evidence(config.evidence(), phase, unit.as_splice_point());
        EvidenceSet {
            photos: requirement
                .labels
                .iter()
                .map(|label| (label.clone(), "photo.jpg".to_string()))
                .collect::<BTreeMap<_, _>>(),
            test_readings: vec![Some(Decimal::new(-18, 0)); requirement.test_count as usize],
            test_artifact: None,
        }
    }

    /// SC-001: boring can start on a fresh segment
    #[test]
    fn test_start_boring_on_fresh_segment() {
        let decision = review_status_change(&segment(), "boring", Status::InProgress, None, &config());
        assert!(decision.allowed);
        assert!(decision.rejections.is_empty());
    }

    /// SC-002: pulling cannot start before boring is QC approved
    #[test]
    fn test_start_pulling_before_boring_approved() {
        let unit = segment().with_phase_status(Phase::Boring, Status::Complete);
        let decision = review_status_change(&unit, "pulling", Status::InProgress, None, &config());

        assert!(!decision.allowed);
        assert_eq!(
            decision.rejections,
            vec![Rejection::PrerequisiteNotMet {
                reason: "boring must be QC Approved before pulling can begin".to_string()
            }]
        );
    }

    #[test]
    fn test_same_status_is_rejected() {
        let unit = segment().with_phase_status(Phase::Boring, Status::InProgress);
        let decision = review_status_change(&unit, "boring", Status::InProgress, None, &config());

        assert_eq!(
            decision.rejections,
            vec![Rejection::IllegalTransition {
                from: Status::InProgress,
                to: Status::InProgress,
            }]
        );
    }

    #[test]
    fn test_unknown_phase_is_rejected() {
        let decision = review_status_change(&segment(), "trenching", Status::InProgress, None, &config());
        assert_eq!(
            decision.rejections,
            vec![Rejection::UnknownPhase {
                phase: "trenching".to_string()
            }]
        );
        assert_eq!(decision.rejections[0].to_string(), "Unknown phase");
    }

    #[test]
    fn test_untracked_phase_is_rejected() {
        let decision = review_status_change(&splice_point(), "boring", Status::InProgress, None, &config());
        assert_eq!(
            decision.rejections,
            vec![Rejection::PhaseNotTracked {
                phase: Phase::Boring
            }]
        );
    }

    /// SC-003: completing without evidence reports what is missing
    #[test]
    fn test_complete_without_evidence_is_rejected() {
        let unit = splice_point().with_phase_status(Phase::Splicing, Status::InProgress);
        let decision = review_status_change(&unit, "splicing", Status::Complete, None, &config());

        assert!(!decision.allowed);
        match &decision.rejections[..] {
            [Rejection::IncompleteEvidence { report }] => {
                assert_eq!(report.photos.missing_labels.len(), 7);
                assert_eq!(report.required_tests, 8);
            }
            other => panic!("Expected IncompleteEvidence, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_with_full_evidence_is_allowed() {
        let config = config();
        let unit = splice_point().with_phase_status(Phase::Splicing, Status::InProgress);
        let evidence = full_evidence(&unit, Phase::Splicing, &config);

        let decision = review_status_change(&unit, "splicing", Status::Complete, Some(&evidence), &config);
        assert!(decision.allowed, "{:?}", decision.rejections);
    }

    #[test]
    fn test_illegal_transition_and_missing_evidence_are_both_reported() {
        let decision = review_status_change(&segment(), "boring", Status::Complete, None, &config());
        assert_eq!(decision.rejections.len(), 2);
        assert!(matches!(
            decision.rejections[0],
            Rejection::IllegalTransition { .. }
        ));
        assert!(matches!(
            decision.rejections[1],
            Rejection::IncompleteEvidence { .. }
        ));
    }

    #[test]
    fn test_issue_back_to_in_progress_skips_prerequisite() {
        // boring is no longer approved, but pulling is resuming, not starting
        let unit = segment()
            .with_phase_status(Phase::Boring, Status::Issue)
            .with_phase_status(Phase::Pulling, Status::Issue);
        let decision = review_status_change(&unit, "pulling", Status::InProgress, None, &config());
        assert!(decision.allowed);
    }

    /// SC-004: applying returns a new snapshot with a bumped version
    #[test]
    fn test_apply_status_change_returns_new_snapshot() {
        let config = config();
        let unit = segment().with_phase_status(Phase::Boring, Status::InProgress);
        let evidence = full_evidence(&unit, Phase::Boring, &config);

        let next = apply_status_change(&unit, "boring", Status::Complete, Some(&evidence), &config)
            .unwrap();
        assert_eq!(next.status(Phase::Boring), Some(Status::Complete));
        assert_eq!(next.version, unit.version + 1);
        assert_eq!(unit.status(Phase::Boring), Some(Status::InProgress));
    }

    #[test]
    fn test_apply_status_change_returns_rejections() {
        let result = apply_status_change(&segment(), "pulling", Status::InProgress, None, &config());
        let rejections = result.unwrap_err();
        assert_eq!(rejections.len(), 1);
        assert_eq!(
            rejections[0].to_string(),
            "boring must be QC Approved before pulling can begin"
        );
    }

    #[test]
    fn test_full_segment_walkthrough() {
        let config = config();
        let mut unit = segment();

        for (phase, status) in [
            ("boring", Status::InProgress),
            ("boring", Status::Complete),
            ("boring", Status::QcApproved),
            ("pulling", Status::InProgress),
            ("pulling", Status::Complete),
            ("pulling", Status::QcApproved),
        ] {
            let parsed = Phase::parse(phase).unwrap();
            let evidence = full_evidence(&unit, parsed, &config);
            unit = apply_status_change(&unit, phase, status, Some(&evidence), &config)
                .unwrap_or_else(|r| panic!("{} -> {}: {:?}", phase, status, r));
        }

        assert_eq!(unit.version, 6);
        assert_eq!(unit.status(Phase::Pulling), Some(Status::QcApproved));
    }
}
