//! HTTP request handlers for the mock server.

pub mod collectors;
pub mod credentials;
pub mod profiles;
pub mod scans;
pub mod scopes;

pub use collectors::*;
pub use credentials::*;
pub use profiles::*;
pub use scans::*;
pub use scopes::*;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// State handle shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Page size when the request has no `limit`.
pub const DEFAULT_LIMIT: u32 = 50;

/// Largest page the mock serves.
pub const MAX_LIMIT: u32 = 200;

/// Parsed `offset`/`limit` plus remaining filters of a list request.
#[derive(Debug)]
pub struct ListParams {
    pub offset: u64,
    pub limit: u32,
    pub filters: HashMap<String, String>,
}

impl ListParams {
    /// Split raw query parameters, answering 400 for bad numbers.
    pub fn parse(mut raw: HashMap<String, String>) -> Result<Self, Response> {
        // Summaries links carry `start`; accept it as the offset too
        let start = raw.remove("start");
        let offset = match raw.remove("offset").or(start) {
            Some(v) => v
                .parse()
                .map_err(|_| bad_request(format!("offset '{v}' is not a number")))?,
            None => 0,
        };
        let limit = match raw.remove("limit") {
            Some(v) => match v.parse::<u32>() {
                Ok(0) | Err(_) => return Err(bad_request(format!("limit '{v}' is invalid"))),
                Ok(n) => n.min(MAX_LIMIT),
            },
            None => DEFAULT_LIMIT,
        };
        raw.remove("account_id");

        Ok(Self {
            offset,
            limit,
            filters: raw,
        })
    }

    /// Value of a filter parameter.
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }
}

/// How a collection envelope points at other pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `href` with an `offset` query parameter.
    Offset,
    /// `href` with a `start` query parameter plus a `start` token.
    StartToken,
}

fn link(path: &str, offset: u64, limit: u32, style: LinkStyle) -> serde_json::Value {
    match style {
        LinkStyle::Offset => serde_json::json!({
            "href": format!("/posture/v2/{path}?offset={offset}&limit={limit}")
        }),
        LinkStyle::StartToken => serde_json::json!({
            "href": format!("/posture/v2/{path}?start={offset}&limit={limit}"),
            "start": offset.to_string()
        }),
    }
}

/// Build a collection envelope holding one page of `items`.
pub fn collection_response<T: Serialize>(
    path: &str,
    key: &str,
    items: &[&T],
    params: &ListParams,
) -> Response {
    paged_response(path, key, items, params, LinkStyle::Offset)
}

/// Build a collection envelope whose links use `style`.
pub fn paged_response<T: Serialize>(
    path: &str,
    key: &str,
    items: &[&T],
    params: &ListParams,
    style: LinkStyle,
) -> Response {
    let total = items.len() as u64;
    let limit = u64::from(params.limit);
    let start = params.offset.min(total);
    let end = (start + limit).min(total);
    let page: Vec<&T> = items[start as usize..end as usize].to_vec();

    let last_offset = if total == 0 {
        0
    } else {
        ((total - 1) / limit) * limit
    };

    let mut body = serde_json::json!({
        "offset": params.offset,
        "limit": params.limit,
        "total_count": total,
        "first": link(path, 0, params.limit, style),
        "last": link(path, last_offset, params.limit, style),
    });

    if params.offset > 0 {
        body["previous"] = link(path, params.offset.saturating_sub(limit), params.limit, style);
    }
    if end < total {
        body["next"] = link(path, end, params.limit, style);
    }
    body[key] = serde_json::to_value(page).unwrap_or_default();

    (StatusCode::OK, Json(body)).into_response()
}

/// Reject requests without the configured bearer token.
pub fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(required) = &state.required_token else {
        return Ok(());
    };

    let expected = format!("Bearer {required}");
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "Invalid token".to_string()))
    }
}

/// Fail list requests at the configured offset.
pub fn injected_failure(state: &MockState, params: &ListParams) -> Result<(), Response> {
    match state.fail_at_offset {
        Some(offset) if offset == params.offset => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Injected failure at offset {offset}"),
        )),
        _ => Ok(()),
    }
}

/// Error body in the service's `errors` envelope.
pub fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "errors": [{ "code": status.as_u16(), "message": message }]
        })),
    )
        .into_response()
}

/// 404 for an unknown entity.
pub fn not_found(entity: &str, id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("No {entity} found with id: {id}"),
    )
}

/// 400 for an invalid request.
pub fn bad_request(message: String) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}
