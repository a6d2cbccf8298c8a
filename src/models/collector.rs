//! Collector model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{entity_path, PostureClient};
use crate::error::Result;
use crate::pagination::{fetch_collection, Collection, Page, PageRequest};
use crate::traits::{Create, Delete, Get, List, Update};

const PATH: &str = "collectors";

/// An agent that gathers facts from the resources in a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    /// Collector ID.
    pub id: String,

    /// Internal collector name.
    pub name: String,

    /// Name shown to users.
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Lifecycle state (e.g. "ready_to_install", "active").
    #[serde(default)]
    pub status: Option<String>,

    /// Human-readable detail for `status`.
    #[serde(default)]
    pub status_description: Option<String>,

    /// "managed" or "unmanaged".
    #[serde(rename = "type", default)]
    pub collector_type: Option<String>,

    #[serde(default)]
    pub enabled: bool,

    /// Whether the collector reaches the service over the public network.
    #[serde(default)]
    pub is_public: bool,

    #[serde(default)]
    pub use_private_endpoint: bool,

    /// "ibm" or "customer".
    #[serde(default)]
    pub managed_by: Option<String>,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub collector_version: Option<String>,

    /// Consecutive failed heartbeats.
    #[serde(default)]
    pub failure_count: u32,

    #[serde(default)]
    pub last_heartbeat: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Collector {
    /// Name to show: the display name when set, the internal name otherwise.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether the collector has reported in and is usable.
    pub fn is_active(&self) -> bool {
        self.enabled && self.status.as_deref() == Some("active")
    }
}

/// Parameters for registering a collector.
#[derive(Debug, Clone, Serialize)]
pub struct CollectorCreateParams {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub is_public: bool,

    /// "ibm" or "customer".
    pub managed_by: String,

    /// Protects the collector's key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ubi_image: Option<bool>,
}

/// Parameters for updating a collector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectorUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_private_endpoint: Option<bool>,
}

/// API response wrapper for listing collectors.
#[derive(Debug, Deserialize)]
struct CollectorList {
    #[serde(flatten)]
    collection: Collection,
    collectors: Vec<Collector>,
}

#[async_trait]
impl Get for Collector {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &PostureClient, id: String) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.get(&path).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl List for Collector {
    #[tracing::instrument(skip(client))]
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>> {
        let data: CollectorList = fetch_collection(client, PATH, request).await?;
        data.collection.into_page(data.collectors)
    }
}

#[async_trait]
impl Create for Collector {
    type Params = CollectorCreateParams;
    type Output = Self;

    #[tracing::instrument(skip(client, params), fields(name = %params.name))]
    async fn create(client: &PostureClient, params: Self::Params) -> Result<Self> {
        let response = client.post(PATH, &params).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl Update for Collector {
    type Id = String;
    type Params = CollectorUpdateParams;

    #[tracing::instrument(skip(client, params))]
    async fn update(client: &PostureClient, id: String, params: Self::Params) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.patch(&path, &params).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl Delete for Collector {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &PostureClient, id: String) -> Result<()> {
        let path = entity_path(PATH, &id)?;
        client.delete(&path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_deserialize_minimal() {
        let collector: Collector = serde_json::from_value(serde_json::json!({
            "id": "12",
            "name": "collector-east"
        }))
        .unwrap();

        assert_eq!(collector.label(), "collector-east");
        assert!(!collector.is_active());
        assert_eq!(collector.failure_count, 0);
    }

    #[test]
    fn test_collector_active() {
        let collector: Collector = serde_json::from_value(serde_json::json!({
            "id": "12",
            "name": "collector-east",
            "display_name": "East",
            "status": "active",
            "enabled": true,
            "type": "managed",
            "last_heartbeat": "2024-05-01T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(collector.label(), "East");
        assert!(collector.is_active());
        assert_eq!(collector.collector_type.as_deref(), Some("managed"));
    }
}
