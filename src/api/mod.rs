//! HTTP API module for the fiber workflow engine.
//!
//! This module exposes the workflow, evidence and billing rules as stateless
//! JSON endpoints over a shared, immutable configuration.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BoringBillingRequest, EvidenceAssessRequest, InvoiceRequest, PhaseStartRequest,
    PmEvaluateRequest, ProgressRequest, PullingBillingRequest, SplicingBillingRequest,
    StatusChangeRequest, StructureBillingRequest, TransitionCheckRequest, UnitBillingRequest,
};
pub use response::{
    ApiError, EvidenceAssessResponse, PmEvaluateResponse, ProgressResponse, StatusChangeResponse,
    TransitionCheckResponse, UnitBillingEntry, UnitBillingResponse, UnitProgressEntry,
};
pub use state::AppState;
