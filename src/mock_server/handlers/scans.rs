//! Scan, summary and validation endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{
    authorize, bad_request, collection_response, injected_failure, not_found, paged_response,
    LinkStyle, ListParams, SharedState,
};
use crate::{Scan, ValidationRequest};

/// GET /posture/v2/scans/validations/latest_scans
pub async fn list_latest_scans(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let params = match ListParams::parse(raw) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if let Err(resp) = injected_failure(&state, &params) {
        return resp;
    }

    let scans: Vec<&Scan> = state.latest_scans.iter().collect();
    collection_response(
        "scans/validations/latest_scans",
        "latest_scans",
        &scans,
        &params,
    )
}

/// GET /posture/v2/scans/validations/summaries
pub async fn list_summaries(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let params = match ListParams::parse(raw) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if let Err(resp) = injected_failure(&state, &params) {
        return resp;
    }

    let summaries = state.list_summaries(params.filter("scope_id"), params.filter("profile_id"));
    paged_response(
        "scans/validations/summaries",
        "summaries",
        &summaries,
        &params,
        LinkStyle::StartToken,
    )
}

/// GET /posture/v2/scans/validations/{scan_id}/summary
pub async fn get_summary(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(scan_id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.summaries.iter().find(|s| s.scan_id == scan_id) {
        Some(summary) => (StatusCode::OK, Json(summary.clone())).into_response(),
        None => not_found("scan", &scan_id),
    }
}

/// POST /posture/v2/scans/validations
pub async fn create_validation(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<ValidationRequest>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    if !state.scopes.iter().any(|s| s.id == body.scope_id) {
        return bad_request(format!("Unknown scope_id: {}", body.scope_id));
    }
    if !state.profiles.iter().any(|p| p.id == body.profile_id) {
        return bad_request(format!("Unknown profile_id: {}", body.profile_id));
    }

    state.validations.push(body);
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "result": true,
            "message": "Validation scan queued"
        })),
    )
        .into_response()
}
