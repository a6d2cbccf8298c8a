//! Profile endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, collection_response, injected_failure, not_found, ListParams, SharedState};
use crate::Profile;

/// GET /posture/v2/profiles
pub async fn list_profiles(
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

    let profiles: Vec<&Profile> = state.profiles.iter().collect();
    collection_response("profiles", "profiles", &profiles, &params)
}

/// GET /posture/v2/profiles/{id}
pub async fn get_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.profiles.iter().find(|p| p.id == id) {
        Some(profile) => (StatusCode::OK, Json(profile.clone())).into_response(),
        None => not_found("profile", &id),
    }
}
