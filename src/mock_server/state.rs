//! Mock server state management.
//!
//! Provides the in-memory data store for the mock posture management API.
//! Collections are kept in insertion order so pages are stable.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Collector, Credential, Profile, Scan, ScanSummary, Scope, ValidationRequest};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    pub credentials: Vec<Credential>,
    pub collectors: Vec<Collector>,
    pub scopes: Vec<Scope>,
    pub profiles: Vec<Profile>,
    pub latest_scans: Vec<Scan>,
    pub summaries: Vec<ScanSummary>,

    /// Validation requests received, oldest first.
    pub validations: Vec<ValidationRequest>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// List requests at this offset fail with a 500.
    pub fail_at_offset: Option<u64>,

    /// Last ID handed out by a create.
    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            next_id: 1000,
            ..Self::default()
        }
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a credential to the state.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credentials.push(credential);
        self
    }

    /// Add a collector to the state.
    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collectors.push(collector);
        self
    }

    /// Add a scope to the state.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Add a profile to the state.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Add a latest scan to the state.
    pub fn with_latest_scan(mut self, scan: Scan) -> Self {
        self.latest_scans.push(scan);
        self
    }

    /// Add a scan summary to the state.
    pub fn with_summary(mut self, summary: ScanSummary) -> Self {
        self.summaries.push(summary);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Make list requests at `offset` fail.
    pub fn with_failure_at_offset(mut self, offset: u64) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    /// Hand out a fresh ID.
    pub fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    /// List credentials, optionally filtered by name substring.
    pub fn list_credentials(&self, name_filter: Option<&str>) -> Vec<&Credential> {
        self.credentials
            .iter()
            .filter(|c| {
                name_filter
                    .map(|n| c.name.to_lowercase().contains(&n.to_lowercase()))
                    .unwrap_or(true)
            })
            .collect()
    }

    /// List scan summaries matching the scope and profile filters.
    pub fn list_summaries(
        &self,
        scope_id: Option<&str>,
        profile_id: Option<&str>,
    ) -> Vec<&ScanSummary> {
        self.summaries
            .iter()
            .filter(|s| scope_id.map_or(true, |id| s.scope_id.as_deref() == Some(id)))
            .filter(|s| profile_id.map_or(true, |id| s.profile_id.as_deref() == Some(id)))
            .collect()
    }

    /// Update a credential and return the updated version.
    pub fn update_credential(
        &mut self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
        enabled: Option<bool>,
    ) -> Option<&Credential> {
        let credential = self.credentials.iter_mut().find(|c| c.id == id)?;
        if let Some(n) = name {
            credential.name = n;
        }
        if let Some(d) = description {
            credential.description = Some(d);
        }
        if let Some(e) = enabled {
            credential.enabled = e;
        }
        Some(credential)
    }

    /// Update a scope and return the updated version.
    pub fn update_scope(
        &mut self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> Option<&Scope> {
        let scope = self.scopes.iter_mut().find(|s| s.id == id)?;
        if let Some(n) = name {
            scope.name = n;
        }
        if let Some(d) = description {
            scope.description = Some(d);
        }
        Some(scope)
    }

    /// Update a collector and return the updated version.
    pub fn update_collector(
        &mut self,
        id: &str,
        display_name: Option<String>,
        description: Option<String>,
        use_private_endpoint: Option<bool>,
    ) -> Option<&Collector> {
        let collector = self.collectors.iter_mut().find(|c| c.id == id)?;
        if let Some(n) = display_name {
            collector.display_name = Some(n);
        }
        if let Some(d) = description {
            collector.description = Some(d);
        }
        if let Some(p) = use_private_endpoint {
            collector.use_private_endpoint = p;
        }
        Some(collector)
    }
}
