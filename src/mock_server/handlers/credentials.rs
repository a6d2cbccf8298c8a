//! Credential endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::{authorize, collection_response, injected_failure, not_found, ListParams, SharedState};
use crate::{Credential, CredentialPurpose, CredentialType};

/// Body of a credential create request.
#[derive(Debug, Deserialize)]
pub struct CreateCredentialBody {
    pub name: String,
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    #[serde(default)]
    pub enabled: bool,
    pub description: Option<String>,
    pub purpose: Option<CredentialPurpose>,
    #[allow(dead_code)] // Secrets are accepted but never echoed
    pub display_fields: Option<serde_json::Value>,
}

/// Body of a credential update request.
#[derive(Debug, Deserialize)]
pub struct UpdateCredentialBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

/// GET /posture/v2/credentials
pub async fn list_credentials(
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

    let credentials = state.list_credentials(params.filter("name"));
    collection_response("credentials", "credentials", &credentials, &params)
}

/// GET /posture/v2/credentials/{id}
pub async fn get_credential(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.credentials.iter().find(|c| c.id == id) {
        Some(credential) => (StatusCode::OK, Json(credential.clone())).into_response(),
        None => not_found("credential", &id),
    }
}

/// POST /posture/v2/credentials
pub async fn create_credential(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateCredentialBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let credential = Credential {
        id: state.allocate_id(),
        name: body.name,
        description: body.description,
        credential_type: body.credential_type,
        enabled: body.enabled,
        purpose: body.purpose,
        display_fields: None,
        created_by: Some("mock".to_string()),
        created_at: Some(Utc::now()),
        updated_by: None,
        updated_at: None,
    };
    state.credentials.push(credential.clone());

    (StatusCode::CREATED, Json(credential)).into_response()
}

/// PATCH /posture/v2/credentials/{id}
pub async fn update_credential(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateCredentialBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.update_credential(&id, body.name, body.description, body.enabled) {
        Some(credential) => (StatusCode::OK, Json(credential.clone())).into_response(),
        None => not_found("credential", &id),
    }
}

/// DELETE /posture/v2/credentials/{id}
pub async fn delete_credential(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let before = state.credentials.len();
    state.credentials.retain(|c| c.id != id);
    if state.credentials.len() == before {
        return not_found("credential", &id);
    }
    StatusCode::NO_CONTENT.into_response()
}
