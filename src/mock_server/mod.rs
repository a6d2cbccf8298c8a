//! In-memory mock of the posture management API.
//!
//! Unlike wiremock, which stubs individual requests per test, this server
//! keeps state across requests and pages its collections the way the real
//! service does, so whole workflows can run against it.
//!
//! # Example
//!
//! ```ignore
//! use postureapi::mock_server::MockServer;
//! use postureapi::{ClientConfig, Credential, List, PageRequest, PostureClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await.unwrap();
//!     let config = ClientConfig::new("test-token").with_base_url(server.url());
//!     let client = PostureClient::new(config).unwrap();
//!
//!     let all = Credential::list_all(&client, PageRequest::new().with_limit(1))
//!         .await
//!         .unwrap();
//!     assert_eq!(all.len(), 3);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{router, state_from_scenario, MockServer};
pub use state::MockState;
