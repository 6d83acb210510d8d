//! HTTP request handlers for the fiber workflow engine API.
//!
//! Every endpoint is a `POST` that takes a JSON snapshot and returns a JSON
//! decision. Rejected status changes and incomplete evidence are ordinary
//! `200` responses; only malformed requests and unknown rate cards are errors.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::billing::{
    build_invoice, calculate_boring, calculate_pulling, calculate_splicing, calculate_structure,
    calculate_unit_billing, SpliceQuantities,
};
use crate::config::RateCard;
use crate::error::EngineError;
use crate::evidence::{assess_evidence, evaluate_all, phase_evidence};
use crate::workflow::{
    apply_status_change, available_transitions, can_start_phase, can_transition, current_phase,
    project_progress, unit_progress,
};

use super::request::{
    BoringBillingRequest, EvidenceAssessRequest, InvoiceRequest, PhaseStartRequest,
    PmEvaluateRequest, ProgressRequest, PullingBillingRequest, SplicingBillingRequest,
    StatusChangeRequest, StructureBillingRequest, TransitionCheckRequest, UnitBillingRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, EvidenceAssessResponse, PmEvaluateResponse, ProgressResponse,
    StatusChangeResponse, TransitionCheckResponse, UnitBillingEntry, UnitBillingResponse,
    UnitProgressEntry,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/transitions/check", post(check_transition_handler))
        .route("/phases/can-start", post(can_start_handler))
        .route("/status-changes/review", post(review_status_change_handler))
        .route("/evidence/assess", post(assess_evidence_handler))
        .route("/pm/evaluate", post(evaluate_pm_handler))
        .route("/billing/boring", post(boring_billing_handler))
        .route("/billing/pulling", post(pulling_billing_handler))
        .route("/billing/splicing", post(splicing_billing_handler))
        .route("/billing/structure", post(structure_billing_handler))
        .route("/billing/units", post(unit_billing_handler))
        .route("/invoices", post(invoice_handler))
        .route("/progress", post(progress_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps a JSON payload, turning extractor rejections into `400` responses.
fn parse_payload<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // body_text carries serde's message, including the field path
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(json_response(StatusCode::BAD_REQUEST, error))
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn lookup_rate_card<'a>(
    state: &'a AppState,
    correlation_id: Uuid,
    id: &str,
) -> Result<&'a RateCard, Response> {
    state
        .rate_card(id)
        .map_err(|err| engine_error_response(correlation_id, err))
}

/// Handler for POST /transitions/check.
async fn check_transition_handler(
    State(state): State<AppState>,
    payload: Result<Json<TransitionCheckRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing transition check");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let table = state.config().transitions();
    let response = TransitionCheckResponse {
        allowed: request
            .proposed_status
            .map(|proposed| can_transition(table, &request.phase, request.current_status, proposed)),
        available_transitions: available_transitions(table, &request.phase, request.current_status),
    };

    json_response(StatusCode::OK, response)
}

/// Handler for POST /phases/can-start.
async fn can_start_handler(payload: Result<Json<PhaseStartRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing phase start check");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let decision = can_start_phase(&request.unit, &request.phase);
    info!(
        correlation_id = %correlation_id,
        unit_id = %request.unit.id,
        phase = %request.phase,
        allowed = decision.allowed,
        "Phase start checked"
    );

    json_response(StatusCode::OK, decision)
}

/// Handler for POST /status-changes/review.
///
/// Runs every check and, when the change is allowed, returns the next unit
/// snapshot with its version bumped.
async fn review_status_change_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing status change review");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let outcome = apply_status_change(
        &request.unit,
        &request.phase,
        request.proposed_status,
        request.evidence.as_ref(),
        state.config(),
    );

    let response = match outcome {
        Ok(next) => StatusChangeResponse {
            allowed: true,
            rejections: Vec::new(),
            messages: Vec::new(),
            unit: Some(next),
        },
        Err(rejections) => StatusChangeResponse {
            allowed: false,
            messages: rejections.iter().map(ToString::to_string).collect(),
            rejections,
            unit: None,
        },
    };

    info!(
        correlation_id = %correlation_id,
        unit_id = %request.unit.id,
        phase = %request.phase,
        proposed = %request.proposed_status,
        allowed = response.allowed,
        rejections = response.rejections.len(),
        "Status change reviewed"
    );

    json_response(StatusCode::OK, response)
}

/// Handler for POST /evidence/assess.
async fn assess_evidence_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvidenceAssessRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evidence assessment");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let requirement = phase_evidence(config.evidence(), request.phase, request.splice.as_ref());
    let report = assess_evidence(&requirement, &request.evidence, config.power_meter());

    json_response(StatusCode::OK, EvidenceAssessResponse { requirement, report })
}

/// Handler for POST /pm/evaluate.
async fn evaluate_pm_handler(
    State(state): State<AppState>,
    payload: Result<Json<PmEvaluateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing power meter evaluation");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let classifications = evaluate_all(&request.readings, state.config().power_meter());
    json_response(StatusCode::OK, PmEvaluateResponse { classifications })
}

/// Handler for POST /billing/boring.
async fn boring_billing_handler(
    State(state): State<AppState>,
    payload: Result<Json<BoringBillingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing boring billing");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let rate_card = match lookup_rate_card(&state, correlation_id, &request.rate_card_id) {
        Ok(card) => card,
        Err(response) => return response,
    };

    let result = calculate_boring(
        request.footage,
        request.duct_count,
        rate_card,
        &state.config().billing_codes().boring,
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /billing/pulling.
async fn pulling_billing_handler(
    State(state): State<AppState>,
    payload: Result<Json<PullingBillingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing pulling billing");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let rate_card = match lookup_rate_card(&state, correlation_id, &request.rate_card_id) {
        Ok(card) => card,
        Err(response) => return response,
    };

    let result = calculate_pulling(
        request.footage,
        request.fiber_count,
        rate_card,
        &state.config().billing_codes().pulling,
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /billing/splicing.
async fn splicing_billing_handler(
    State(state): State<AppState>,
    payload: Result<Json<SplicingBillingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing splicing billing");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let rate_card = match lookup_rate_card(&state, correlation_id, &request.rate_card_id) {
        Ok(card) => card,
        Err(response) => return response,
    };

    let quantities = SpliceQuantities {
        position: request.position,
        fiber_count: request.fiber_count,
        test_count: request.test_count,
    };
    let result = calculate_splicing(
        &quantities,
        rate_card,
        &state.config().billing_codes().splicing,
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /billing/structure.
async fn structure_billing_handler(
    State(state): State<AppState>,
    payload: Result<Json<StructureBillingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing structure billing");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let rate_card = match lookup_rate_card(&state, correlation_id, &request.rate_card_id) {
        Ok(card) => card,
        Err(response) => return response,
    };

    let result = calculate_structure(
        &request.dimensions,
        request.ground_rod,
        rate_card,
        &state.config().billing_codes().structure,
    );
    if !result.is_fully_billed() {
        warn!(
            correlation_id = %correlation_id,
            dimensions = %request.dimensions,
            "Structure not fully billable"
        );
    }
    json_response(StatusCode::OK, result)
}

/// Handler for POST /billing/units.
async fn unit_billing_handler(
    State(state): State<AppState>,
    payload: Result<Json<UnitBillingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing unit billing");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let rate_card = match lookup_rate_card(&state, correlation_id, &request.rate_card_id) {
        Ok(card) => card,
        Err(response) => return response,
    };

    let config = state.config();
    let units: Vec<UnitBillingEntry> = request
        .units
        .iter()
        .map(|unit| UnitBillingEntry {
            unit_id: unit.id.clone(),
            billing: calculate_unit_billing(
                unit,
                rate_card,
                config.billing_codes(),
                config.evidence(),
            ),
        })
        .collect();
    let grand_total: Decimal = units.iter().map(|entry| entry.billing.total()).sum();

    info!(
        correlation_id = %correlation_id,
        units = units.len(),
        grand_total = %grand_total,
        "Unit billing completed"
    );

    json_response(StatusCode::OK, UnitBillingResponse { units, grand_total })
}

/// Handler for POST /invoices.
async fn invoice_handler(
    State(state): State<AppState>,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing invoice request");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let rate_card = match lookup_rate_card(&state, correlation_id, &request.rate_card_id) {
        Ok(card) => card,
        Err(response) => return response,
    };

    let config = state.config();
    let start_time = Instant::now();
    let invoice = build_invoice(
        &request.units,
        rate_card,
        config.billing_codes(),
        config.evidence(),
        &request.options,
    );
    let duration = start_time.elapsed();

    info!(
        correlation_id = %correlation_id,
        rate_card = %invoice.rate_card_id,
        units = request.units.len(),
        sections = invoice.sections.len(),
        unbillable = invoice.unbillable.len(),
        grand_total = %invoice.grand_total,
        duration_us = duration.as_micros(),
        "Invoice built successfully"
    );

    json_response(StatusCode::OK, invoice)
}

/// Handler for POST /progress.
async fn progress_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing progress request");

    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let weights = state.config().progress();
    let units = request
        .units
        .iter()
        .map(|unit| UnitProgressEntry {
            unit_id: unit.id.clone(),
            progress: unit_progress(unit, weights),
            current_phase: current_phase(unit),
        })
        .collect();
    let project = project_progress(&request.units, weights);

    json_response(StatusCode::OK, ProgressResponse { project, units })
}
