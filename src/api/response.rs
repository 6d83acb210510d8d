//! Response types for the fiber workflow engine API.
//!
//! This module defines the endpoint response bodies, the error response
//! structure and the mapping from [`EngineError`] to HTTP errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::billing::UnitBilling;
use crate::error::EngineError;
use crate::models::{EvidenceReport, EvidenceRequirement, Phase, PmClassification, Status, WorkUnit};
use crate::workflow::{ProjectProgress, Rejection, UnitProgress};

/// Response body for `POST /transitions/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCheckResponse {
    /// Whether the proposed status is reachable; absent when none was proposed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
    /// Every status reachable from the current one.
    pub available_transitions: Vec<Status>,
}

/// Response body for `POST /status-changes/review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeResponse {
    /// True when no check failed.
    pub allowed: bool,
    /// Failed checks.
    pub rejections: Vec<Rejection>,
    /// Human-readable form of each rejection, for display.
    pub messages: Vec<String>,
    /// Next unit snapshot, when allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<WorkUnit>,
}

/// Response body for `POST /evidence/assess`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceAssessResponse {
    /// The evidence the phase requires.
    pub requirement: EvidenceRequirement,
    /// How the supplied evidence measures up.
    pub report: EvidenceReport,
}

/// Response body for `POST /pm/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmEvaluateResponse {
    /// One classification per reading, in order.
    pub classifications: Vec<PmClassification>,
}

/// Billing for one unit in a `POST /billing/units` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitBillingEntry {
    /// Unit billed.
    pub unit_id: String,
    /// Its billing.
    pub billing: UnitBilling,
}

/// Response body for `POST /billing/units`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitBillingResponse {
    /// Per unit billing, in request order.
    pub units: Vec<UnitBillingEntry>,
    /// Sum of every unit total.
    pub grand_total: Decimal,
}

/// Progress of one unit in a `POST /progress` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitProgressEntry {
    /// Unit id.
    pub unit_id: String,
    /// Its progress.
    pub progress: UnitProgress,
    /// First phase not yet QC approved.
    pub current_phase: Option<Phase>,
}

/// Response body for `POST /progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Project-wide figures.
    pub project: ProjectProgress,
    /// Per unit figures, in request order.
    pub units: Vec<UnitProgressEntry>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a rate card not found error response.
    pub fn rate_card_not_found(id: &str) -> Self {
        Self::with_details(
            "RATE_CARD_NOT_FOUND",
            format!("Rate card not found: {}", id),
            format!("No rate card with id '{}' is loaded", id),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::RateCardNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::rate_card_not_found(&id),
            },
            EngineError::UnknownStatus { value } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(format!("Unknown status: {}", value)),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfiguration { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
        }
    }
}
