//! Evidence validation and power meter evaluation.
//!
//! # Example
//!
//! ```
//! use fiber_workflow::config::{EvidenceRules, PmThresholds};
//! use fiber_workflow::evidence::{assess_evidence, phase_evidence};
//! use fiber_workflow::models::{EvidenceSet, Phase};
//!
//! let rules = EvidenceRules::standard();
//! let requirement = phase_evidence(&rules, Phase::Pulling, None);
//! let report = assess_evidence(&requirement, &EvidenceSet::default(), &PmThresholds::standard());
//! assert!(!report.complete);
//! assert_eq!(report.photos.missing_labels.len(), 4);
//! ```

mod power_meter;
mod requirements;
mod validator;

pub use power_meter::{evaluate, evaluate_all};
pub use requirements::{
    phase_evidence, required_evidence, required_photo_count, required_test_count,
    splice_requirement,
};
pub use validator::{assess_evidence, check_photos, validate_photos};
