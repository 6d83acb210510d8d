//! Evidence models.
//!
//! Evidence is the photographic and test proof that must be supplied before a
//! phase may be marked complete.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a single optical power meter reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PmClassification {
    /// Reading inside the pass band.
    Pass,
    /// Marginal reading above the weak-failure boundary.
    Warning,
    /// Too weak, or strong enough to overload the receiver.
    Fail,
    /// No reading recorded yet (fiber not lit).
    Pending,
}

/// The evidence a phase requires before it may be marked complete.
///
/// Derived on demand from configuration; never stored on a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRequirement {
    /// Ordered, distinct photo labels.
    pub labels: Vec<String>,
    /// Number of numeric power meter readings required.
    pub test_count: u32,
    /// Whether an external test artifact (OTDR trace) must be attached.
    pub requires_test_artifact: bool,
}

/// Evidence supplied by the upload/form collaborator.
///
/// Presence is explicit: a label is supplied when it has an entry in `photos`,
/// and a reading is recorded when it is `Some`, even if its value is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSet {
    /// Photo label to stored reference (URL, blob key, ...).
    #[serde(default)]
    pub photos: BTreeMap<String, String>,
    /// Power meter entries in dBm; `None` marks an empty slot.
    #[serde(default)]
    pub test_readings: Vec<Option<Decimal>>,
    /// Reference to the attached test artifact, if any.
    #[serde(default)]
    pub test_artifact: Option<String>,
}

impl EvidenceSet {
    /// Number of readings that carry a numeric value.
    pub fn recorded_test_count(&self) -> u32 {
        self.test_readings.iter().flatten().count() as u32
    }
}

/// Result of checking supplied photos against the required label list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoValidation {
    /// True when no required label is missing.
    pub valid: bool,
    /// Required labels with no supplied photo, in requirement order.
    pub missing_labels: Vec<String>,
    /// Number of required labels that were supplied.
    pub supplied_count: usize,
    /// Number of required labels.
    pub required_count: usize,
}

/// Full completeness report for a phase's evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceReport {
    /// Photo check against the required labels.
    pub photos: PhotoValidation,
    /// Readings with a numeric value.
    pub recorded_tests: u32,
    /// Readings required.
    pub required_tests: u32,
    /// Whether a test artifact is required.
    pub test_artifact_required: bool,
    /// Whether a test artifact was supplied.
    pub test_artifact_present: bool,
    /// Classification of each supplied reading slot, in order.
    pub readings: Vec<PmClassification>,
    /// True only when photos, tests and artifact are all satisfied.
    pub complete: bool,
}

impl EvidenceReport {
    /// Number of readings classified as [`PmClassification::Fail`].
    pub fn failing_readings(&self) -> usize {
        self.readings
            .iter()
            .filter(|c| **c == PmClassification::Fail)
            .count()
    }
}
