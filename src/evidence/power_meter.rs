//! Power meter reading evaluation.

use rust_decimal::Decimal;

use crate::config::PmThresholds;
use crate::models::PmClassification;

/// Classifies a single reading in dBm.
///
/// Checks run in a fixed order: absent readings are pending, readings
/// stronger than `pass_max` fail, readings weaker than `fail_weak_max` fail,
/// readings weaker than `warn_max` warn, and everything else passes. There is
/// no warning band on the strong side.
///
/// # Example
///
/// ```
/// use fiber_workflow::config::PmThresholds;
/// use fiber_workflow::evidence::evaluate;
/// use fiber_workflow::models::PmClassification;
/// use rust_decimal::Decimal;
///
/// let thresholds = PmThresholds::standard();
/// assert_eq!(evaluate(Some(Decimal::from(-18)), &thresholds), PmClassification::Pass);
/// assert_eq!(evaluate(None, &thresholds), PmClassification::Pending);
/// ```
pub fn evaluate(reading: Option<Decimal>, thresholds: &PmThresholds) -> PmClassification {
    match reading {
        None => PmClassification::Pending,
        Some(dbm) if dbm > thresholds.pass_max => PmClassification::Fail,
        Some(dbm) if dbm < thresholds.fail_weak_max => PmClassification::Fail,
        Some(dbm) if dbm < thresholds.warn_max => PmClassification::Warning,
        Some(_) => PmClassification::Pass,
    }
}

/// Classifies every reading slot, preserving order.
pub fn evaluate_all(readings: &[Option<Decimal>], thresholds: &PmThresholds) -> Vec<PmClassification> {
    readings
        .iter()
        .map(|reading| evaluate(*reading, thresholds))
        .collect()
}
