//! Mock posture management API server.
//!
//! Provides an axum-based HTTP server that simulates the `/posture/v2` API.

use std::io;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock posture management API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> io::Result<Self> {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> io::Result<Self> {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> io::Result<Self> {
        let shared_state = state.shared();
        let app = router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });

        Ok(Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        })
    }

    /// Get the base URL of the mock server.
    ///
    /// Pass this to `ClientConfig::with_base_url`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        state_from_scenario(Fixtures::default_scenario())
    }
}

/// Load every entity of a scenario into fresh state.
pub fn state_from_scenario(scenario: DefaultScenario) -> MockState {
    let mut state = MockState::new();
    state.credentials = scenario.credentials;
    state.collectors = scenario.collectors;
    state.scopes = scenario.scopes;
    state.profiles = scenario.profiles;
    state.latest_scans = scenario.latest_scans;
    state.summaries = scenario.summaries;
    state
}

/// Create the axum router with all routes.
pub fn router(state: Arc<RwLock<MockState>>) -> Router {
    Router::new()
        // Credential routes
        .route(
            "/posture/v2/credentials",
            get(handlers::list_credentials).post(handlers::create_credential),
        )
        .route(
            "/posture/v2/credentials/:id",
            get(handlers::get_credential)
                .patch(handlers::update_credential)
                .delete(handlers::delete_credential),
        )
        // Collector routes
        .route(
            "/posture/v2/collectors",
            get(handlers::list_collectors).post(handlers::create_collector),
        )
        .route(
            "/posture/v2/collectors/:id",
            get(handlers::get_collector)
                .patch(handlers::update_collector)
                .delete(handlers::delete_collector),
        )
        // Scope routes
        .route(
            "/posture/v2/scopes",
            get(handlers::list_scopes).post(handlers::create_scope),
        )
        .route(
            "/posture/v2/scopes/:id",
            get(handlers::get_scope)
                .patch(handlers::update_scope)
                .delete(handlers::delete_scope),
        )
        // Profile routes
        .route("/posture/v2/profiles", get(handlers::list_profiles))
        .route("/posture/v2/profiles/:id", get(handlers::get_profile))
        // Scan routes
        .route(
            "/posture/v2/scans/validations",
            post(handlers::create_validation),
        )
        .route(
            "/posture/v2/scans/validations/latest_scans",
            get(handlers::list_latest_scans),
        )
        .route(
            "/posture/v2/scans/validations/summaries",
            get(handlers::list_summaries),
        )
        .route(
            "/posture/v2/scans/validations/:scan_id/summary",
            get(handlers::get_summary),
        )
        // Health check
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
