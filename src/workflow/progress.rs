//! Progress aggregation.
//!
//! Turns phase statuses into whole-number completion percentages for units
//! and for a whole project.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::ProgressWeights;
use crate::models::{Phase, Status, WorkUnit};

/// Completion of a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProgress {
    /// Percentage per tracked phase.
    pub phases: BTreeMap<Phase, Decimal>,
    /// Weighted percentage across the tracked phases.
    pub overall: Decimal,
}

/// Completion across many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProgress {
    /// Mean percentage per phase over the units tracking it.
    pub phases: BTreeMap<Phase, Decimal>,
    /// Mean of the unit overall percentages.
    pub overall: Decimal,
    /// Units at 100% overall.
    pub complete: usize,
    /// Units considered.
    pub total: usize,
}

fn whole_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes a unit's progress.
///
/// Only tracked phases contribute. The overall figure is renormalised by the
/// weights of those phases, so a fully approved splice point is at 100%.
///
/// # Example
///
/// ```
/// use fiber_workflow::config::ProgressWeights;
/// use fiber_workflow::models::{Phase, SegmentDetails, Status, WorkUnit};
/// use fiber_workflow::workflow::unit_progress;
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
/// .with_phase_status(Phase::Boring, Status::QcApproved)
/// .with_phase_status(Phase::Pulling, Status::InProgress);
///
/// let progress = unit_progress(&unit, &ProgressWeights::standard());
/// assert_eq!(progress.phases[&Phase::Boring], Decimal::from(100));
/// assert_eq!(progress.phases[&Phase::Pulling], Decimal::from(50));
/// // (1.0 * 0.4 + 0.5 * 0.3) / 0.7 = 78.57%
/// assert_eq!(progress.overall, Decimal::from(79));
/// ```
pub fn unit_progress(unit: &WorkUnit, weights: &ProgressWeights) -> UnitProgress {
    let mut phases = BTreeMap::new();
    let mut weighted = Decimal::ZERO;
    let mut weight_sum = Decimal::ZERO;

    for (phase, status) in &unit.phase_status {
        let fraction = weights.status_weight(*status);
        let phase_weight = weights.phase_weight(*phase);
        phases.insert(*phase, whole_percent(fraction * Decimal::ONE_HUNDRED));
        weighted += fraction * phase_weight;
        weight_sum += phase_weight;
    }

    let overall = if weight_sum.is_zero() {
        Decimal::ZERO
    } else {
        whole_percent(weighted / weight_sum * Decimal::ONE_HUNDRED)
    };

    UnitProgress { phases, overall }
}

/// Computes progress across units.
///
/// Each phase is averaged over the units that track it; phases no unit
/// tracks are reported as zero. Empty input yields all zeros.
pub fn project_progress(units: &[WorkUnit], weights: &ProgressWeights) -> ProjectProgress {
    let mut sums: BTreeMap<Phase, (Decimal, u32)> =
        Phase::ALL.into_iter().map(|p| (p, (Decimal::ZERO, 0))).collect();
    let mut overall_sum = Decimal::ZERO;
    let mut complete = 0;

    for unit in units {
        let progress = unit_progress(unit, weights);
        for (phase, percent) in &progress.phases {
            if let Some((sum, count)) = sums.get_mut(phase) {
                *sum += *percent;
                *count += 1;
            }
        }
        if progress.overall == Decimal::ONE_HUNDRED {
            complete += 1;
        }
        overall_sum += progress.overall;
    }

    let phases = sums
        .into_iter()
        .map(|(phase, (sum, count))| {
            let mean = if count == 0 {
                Decimal::ZERO
            } else {
                whole_percent(sum / Decimal::from(count))
            };
            (phase, mean)
        })
        .collect();

    let overall = if units.is_empty() {
        Decimal::ZERO
    } else {
        whole_percent(overall_sum / Decimal::from(units.len()))
    };

    ProjectProgress {
        phases,
        overall,
        complete,
        total: units.len(),
    }
}

/// The first tracked phase that is not yet QC approved.
///
/// `None` once every tracked phase is approved.
pub fn current_phase(unit: &WorkUnit) -> Option<Phase> {
    Phase::ALL
        .into_iter()
        .find(|phase| unit.status(*phase).is_some_and(|s| s != Status::QcApproved))
}
