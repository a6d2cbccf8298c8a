//! Collector endpoint handlers.

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
use crate::Collector;

/// Body of a collector create request.
#[derive(Debug, Deserialize)]
pub struct CreateCollectorBody {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub managed_by: String,
}

/// Body of a collector update request.
#[derive(Debug, Deserialize)]
pub struct UpdateCollectorBody {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub use_private_endpoint: Option<bool>,
}

/// GET /posture/v2/collectors
pub async fn list_collectors(
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

    let collectors: Vec<&Collector> = state.collectors.iter().collect();
    collection_response("collectors", "collectors", &collectors, &params)
}

/// GET /posture/v2/collectors/{id}
pub async fn get_collector(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.collectors.iter().find(|c| c.id == id) {
        Some(collector) => (StatusCode::OK, Json(collector.clone())).into_response(),
        None => not_found("collector", &id),
    }
}

/// POST /posture/v2/collectors
pub async fn create_collector(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateCollectorBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let collector = Collector {
        id: state.allocate_id(),
        name: body.name,
        display_name: None,
        description: body.description,
        status: Some("ready_to_install".to_string()),
        status_description: None,
        collector_type: Some("managed".to_string()),
        enabled: true,
        is_public: body.is_public,
        use_private_endpoint: false,
        managed_by: Some(body.managed_by),
        hostname: None,
        collector_version: None,
        failure_count: 0,
        last_heartbeat: None,
        created_by: Some("mock".to_string()),
        created_at: Some(Utc::now()),
        updated_by: None,
        updated_at: None,
    };
    state.collectors.push(collector.clone());

    (StatusCode::CREATED, Json(collector)).into_response()
}

/// PATCH /posture/v2/collectors/{id}
pub async fn update_collector(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateCollectorBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.update_collector(
        &id,
        body.display_name,
        body.description,
        body.use_private_endpoint,
    ) {
        Some(collector) => (StatusCode::OK, Json(collector.clone())).into_response(),
        None => not_found("collector", &id),
    }
}

/// DELETE /posture/v2/collectors/{id}
pub async fn delete_collector(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let before = state.collectors.len();
    state.collectors.retain(|c| c.id != id);
    if state.collectors.len() == before {
        return not_found("collector", &id);
    }
    StatusCode::NO_CONTENT.into_response()
}
