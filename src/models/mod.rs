//! Core data models for the fiber workflow engine.
//!
//! This module contains the domain vocabulary and the value types exchanged
//! with the engine's callers.

mod billing;
mod evidence;
mod status;
mod work_unit;

pub use billing::{BillingResult, LineItem, MAX_BILLABLE_AMOUNT, Unbillable};
pub use evidence::{
    EvidenceReport, EvidenceRequirement, EvidenceSet, PhotoValidation, PmClassification,
};
pub use status::{Phase, Status};
pub use work_unit::{
    SegmentDetails, SpliceDetails, SplicePosition, SpliceType, UnitDetails, WorkUnit,
};
