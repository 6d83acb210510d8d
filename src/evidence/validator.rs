//! Evidence completeness checks.

use std::collections::BTreeMap;

use crate::config::{EvidenceRules, PmThresholds};
use crate::models::{EvidenceReport, EvidenceRequirement, EvidenceSet, PhotoValidation, SpliceType};

use super::power_meter::evaluate_all;
use super::requirements::required_evidence;

/// Checks supplied photos against a required label list.
///
/// A label is supplied when it has an entry in `supplied`. Extra photos are
/// ignored.
pub fn check_photos(required: &[String], supplied: &BTreeMap<String, String>) -> PhotoValidation {
    let missing_labels: Vec<String> = required
        .iter()
        .filter(|label| !supplied.contains_key(label.as_str()))
        .cloned()
        .collect();

    PhotoValidation {
        valid: missing_labels.is_empty(),
        supplied_count: required.len() - missing_labels.len(),
        required_count: required.len(),
        missing_labels,
    }
}

/// Checks supplied photos for a splice point of the given type and tray count.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use fiber_workflow::config::EvidenceRules;
/// use fiber_workflow::evidence::validate_photos;
/// use fiber_workflow::models::SpliceType;
///
/// let mut photos = BTreeMap::new();
/// photos.insert("Basket".to_string(), "s3://photos/sp-1/basket.jpg".to_string());
///
/// let result = validate_photos(&EvidenceRules::standard(), SpliceType::OneByFour, None, &photos);
/// assert!(!result.valid);
/// assert_eq!(result.supplied_count, 1);
/// assert_eq!(result.required_count, 7);
/// ```
pub fn validate_photos(
    rules: &EvidenceRules,
    splice_type: SpliceType,
    tray_count: Option<u32>,
    supplied: &BTreeMap<String, String>,
) -> PhotoValidation {
    check_photos(&required_evidence(rules, splice_type, tray_count), supplied)
}

/// Assesses an evidence set against a requirement.
///
/// Complete only when every photo is present, enough numeric readings are
/// recorded, and the test artifact is attached if required. Reading
/// classifications are reported but do not affect completeness.
pub fn assess_evidence(
    requirement: &EvidenceRequirement,
    evidence: &EvidenceSet,
    thresholds: &PmThresholds,
) -> EvidenceReport {
    let photos = check_photos(&requirement.labels, &evidence.photos);
    let recorded_tests = evidence.recorded_test_count();
    let test_artifact_present = evidence.test_artifact.is_some();

    let complete = photos.supplied_count >= photos.required_count
        && recorded_tests >= requirement.test_count
        && (test_artifact_present || !requirement.requires_test_artifact);

    EvidenceReport {
        photos,
        recorded_tests,
        required_tests: requirement.test_count,
        test_artifact_required: requirement.requires_test_artifact,
        test_artifact_present,
        readings: evaluate_all(&evidence.test_readings, thresholds),
        complete,
    }
}
