//! Scope endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::{
    authorize, bad_request, collection_response, injected_failure, not_found, ListParams,
    SharedState,
};
use crate::{EnvironmentType, Scope};

/// Body of a scope create request.
#[derive(Debug, Deserialize)]
pub struct CreateScopeBody {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub collector_ids: Vec<String>,
    pub credential_id: String,
    pub credential_type: EnvironmentType,
}

/// Body of a scope update request.
#[derive(Debug, Deserialize)]
pub struct UpdateScopeBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /posture/v2/scopes
pub async fn list_scopes(
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

    let scopes: Vec<&Scope> = state.scopes.iter().collect();
    collection_response("scopes", "scopes", &scopes, &params)
}

/// GET /posture/v2/scopes/{id}
pub async fn get_scope(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.scopes.iter().find(|s| s.id == id) {
        Some(scope) => (StatusCode::OK, Json(scope.clone())).into_response(),
        None => not_found("scope", &id),
    }
}

/// POST /posture/v2/scopes
pub async fn create_scope(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateScopeBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    if !state.credentials.iter().any(|c| c.id == body.credential_id) {
        return bad_request(format!("Unknown credential_id: {}", body.credential_id));
    }

    let scope = Scope {
        id: state.allocate_id(),
        name: body.name,
        description: body.description,
        uuid: None,
        partner_uuid: None,
        credential_id: Some(body.credential_id),
        credential_type: Some(body.credential_type),
        collector_ids: body.collector_ids,
        created_by: Some("mock".to_string()),
        modified_by: None,
        created_at: Some(Utc::now()),
        modified_at: None,
    };
    state.scopes.push(scope.clone());

    (StatusCode::CREATED, Json(scope)).into_response()
}

/// PATCH /posture/v2/scopes/{id}
pub async fn update_scope(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateScopeBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.update_scope(&id, body.name, body.description) {
        Some(scope) => (StatusCode::OK, Json(scope.clone())).into_response(),
        None => not_found("scope", &id),
    }
}

/// DELETE /posture/v2/scopes/{id}
pub async fn delete_scope(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let before = state.scopes.len();
    state.scopes.retain(|s| s.id != id);
    if state.scopes.len() == before {
        return not_found("scope", &id);
    }
    StatusCode::NO_CONTENT.into_response()
}
