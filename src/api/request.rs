//! Request types for the fiber workflow engine API.
//!
//! Domain values ([`WorkUnit`], [`EvidenceSet`], ...) are accepted in their
//! serde form; these wrappers add the per-endpoint parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::billing::InvoiceOptions;
use crate::models::{EvidenceSet, Phase, SpliceDetails, SplicePosition, Status, WorkUnit};

/// Request body for `POST /transitions/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCheckRequest {
    /// Phase name; unknown names permit nothing.
    pub phase: String,
    /// Current status of the phase.
    pub current_status: Status,
    /// Status to check, if any.
    #[serde(default)]
    pub proposed_status: Option<Status>,
}

/// Request body for `POST /phases/can-start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStartRequest {
    /// Unit snapshot.
    pub unit: WorkUnit,
    /// Phase name to start.
    pub phase: String,
}

/// Request body for `POST /status-changes/review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    /// Unit snapshot the change applies to.
    pub unit: WorkUnit,
    /// Phase name.
    pub phase: String,
    /// Requested status.
    pub proposed_status: Status,
    /// Evidence supplied so far.
    #[serde(default)]
    pub evidence: Option<EvidenceSet>,
}

/// Request body for `POST /evidence/assess`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceAssessRequest {
    /// Phase the evidence is for.
    pub phase: Phase,
    /// Splice point details, for splicing.
    #[serde(default)]
    pub splice: Option<SpliceDetails>,
    /// Evidence supplied.
    #[serde(default)]
    pub evidence: EvidenceSet,
}

/// Request body for `POST /pm/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmEvaluateRequest {
    /// Readings in dBm; `null` marks an unlit fiber.
    pub readings: Vec<Option<Decimal>>,
}

/// Request body for `POST /billing/boring`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoringBillingRequest {
    /// Rate card to price against.
    pub rate_card_id: String,
    /// Bored linear feet.
    pub footage: Decimal,
    /// Ducts placed.
    pub duct_count: u32,
}

/// Request body for `POST /billing/pulling`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullingBillingRequest {
    /// Rate card to price against.
    pub rate_card_id: String,
    /// Pulled linear feet.
    pub footage: Decimal,
    /// Cable fiber count.
    pub fiber_count: u32,
}

/// Request body for `POST /billing/splicing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplicingBillingRequest {
    /// Rate card to price against.
    pub rate_card_id: String,
    /// Splice point position.
    pub position: SplicePosition,
    /// Fibers fusion spliced.
    #[serde(default)]
    pub fiber_count: u32,
    /// Power meter tests performed.
    #[serde(default)]
    pub test_count: u32,
}

/// Request body for `POST /billing/structure`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureBillingRequest {
    /// Rate card to price against.
    pub rate_card_id: String,
    /// Handhole dimensions, e.g. "17x30x18".
    pub dimensions: String,
    /// Whether a ground rod was installed.
    #[serde(default)]
    pub ground_rod: bool,
}

/// Request body for `POST /billing/units`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitBillingRequest {
    /// Rate card to price against.
    pub rate_card_id: String,
    /// Units to bill.
    pub units: Vec<WorkUnit>,
}

/// Request body for `POST /invoices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Rate card to price against.
    pub rate_card_id: String,
    /// Units to invoice.
    pub units: Vec<WorkUnit>,
    /// Invoice options.
    #[serde(default)]
    pub options: InvoiceOptions,
}

/// Request body for `POST /progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRequest {
    /// Units to aggregate.
    pub units: Vec<WorkUnit>,
}
