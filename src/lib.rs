//! Posture management API client library.
//!
//! A Rust library for interacting with a cloud posture management REST API
//! using a trait-based architecture where each operation (Get, List, Create,
//! Update, Delete) is defined as a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use postureapi::{Credential, Get, List, PageRequest, PostureClient, Scope};
//!
//! #[tokio::main]
//! async fn main() -> postureapi::Result<()> {
//!     // Create client from environment variables
//!     let client = PostureClient::from_env()?;
//!
//!     // Get a scope by ID
//!     let scope = Scope::get(&client, "3".to_string()).await?;
//!     println!("Scope: {}", scope.name);
//!
//!     // List all credentials, 50 per request
//!     let credentials = Credential::list_all(&client, PageRequest::new().with_limit(50)).await?;
//!     println!("Found {} credentials", credentials.len());
//!
//!     // Or walk the pages yourself
//!     let mut pages = Scope::paginate(&client, PageRequest::new().with_limit(10));
//!     while let Some(page) = pages.next_page().await? {
//!         println!("{} scopes, next offset {:?}", page.len(), page.next_offset);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Get`] - Fetch a single entity by ID
//! - [`List`] - Fetch offset-paginated collections of entities
//! - [`Create`], [`Update`], [`Delete`] - Modify entities
//!
//! Every list endpoint shares one pagination contract: a [`PageRequest`]
//! goes in, a [`Page`] comes out, and the page's `next_offset` feeds the
//! next request. [`Paginator`] drives that loop, one request at a time.
//!
//! # Configuration
//!
//! [`PostureClient::new`] takes an explicit [`ClientConfig`].
//! [`PostureClient::from_env`] reads:
//!
//! - `POSTURE_API_KEY` (required) - Bearer credential
//! - `POSTURE_API_URL` (optional) - Service URL
//! - `POSTURE_ACCOUNT_ID` (optional) - Sent as `account_id` on every request
//! - `POSTURE_TIMEOUT_SECS` (optional) - Request timeout

pub mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod pagination;
mod paginator;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{PostureClient, ACCOUNT_ID_PARAM};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use error::{ErrorKind, PostureError, Result};
pub use pagination::{Collection, Page, PageLink, PageRequest, LIMIT_PARAM, OFFSET_PARAM};
pub use paginator::Paginator;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update};

// Re-export output formatting
pub use output::PrettyPrint;

// Re-export models
pub use models::{
    // Credential types
    Credential,
    CredentialCreateParams,
    CredentialPurpose,
    CredentialType,
    CredentialUpdateParams,
    // Collector types
    Collector,
    CollectorCreateParams,
    CollectorUpdateParams,
    // Scope types
    EnvironmentType,
    Scope,
    ScopeCreateParams,
    ScopeUpdateParams,
    // Profile types
    Profile,
    ProfileType,
    // Scan types
    Scan,
    ScanResult,
    ScanStatus,
    ScanSummary,
    Validation,
    ValidationRequest,
};
