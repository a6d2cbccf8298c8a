//! Scope model and trait implementations.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{entity_path, PostureClient};
use crate::error::Result;
use crate::pagination::{fetch_collection, Collection, Page, PageRequest};
use crate::traits::{Create, Delete, Get, List, Update};

use super::scan::{ScanSummary, Validation, ValidationRequest};

const PATH: &str = "scopes";

/// A set of resources that is discovered and validated together.
///
/// A scope ties a credential to the collectors that use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// Scope ID.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub uuid: Option<String>,

    #[serde(default)]
    pub partner_uuid: Option<String>,

    /// Credential used to reach the resources.
    #[serde(default)]
    pub credential_id: Option<String>,

    /// Environment the resources live in.
    #[serde(default)]
    pub credential_type: Option<EnvironmentType>,

    /// IDs of the collectors assigned to the scope.
    #[serde(default)]
    pub collector_ids: Vec<String>,

    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Environments a scope can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentType {
    Ibm,
    Aws,
    Azure,
    Gcp,
    OnPremise,
    Hosted,
    Services,
    Openstack,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ibm => "ibm",
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
            Self::OnPremise => "on_premise",
            Self::Hosted => "hosted",
            Self::Services => "services",
            Self::Openstack => "openstack",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl Scope {
    /// Scan summaries of this scope for one profile.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let scope = Scope::get(&client, "3".to_string()).await?;
    /// for summary in scope.summaries(&client, "48").await? {
    ///     println!("{}: {:?}", summary.scan_id, summary.status);
    /// }
    /// ```
    pub async fn summaries(
        &self,
        client: &PostureClient,
        profile_id: &str,
    ) -> Result<Vec<ScanSummary>> {
        let request = PageRequest::new()
            .with_filter("scope_id", self.id.as_str())
            .with_filter("profile_id", profile_id);
        ScanSummary::list_all(client, request).await
    }

    /// Request a validation scan of this scope against a profile.
    pub async fn validate(&self, client: &PostureClient, profile_id: &str) -> Result<Validation> {
        let request = ValidationRequest::new(self.id.clone(), profile_id);
        Validation::create(client, request).await
    }
}

/// Parameters for creating a scope.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeCreateParams {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub collector_ids: Vec<String>,

    pub credential_id: String,

    pub credential_type: EnvironmentType,
}

/// Parameters for updating a scope.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScopeUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// API response wrapper for listing scopes.
#[derive(Debug, Deserialize)]
struct ScopeList {
    #[serde(flatten)]
    collection: Collection,
    scopes: Vec<Scope>,
}

#[async_trait]
impl Get for Scope {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &PostureClient, id: String) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.get(&path).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl List for Scope {
    #[tracing::instrument(skip(client))]
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>> {
        let data: ScopeList = fetch_collection(client, PATH, request).await?;
        data.collection.into_page(data.scopes)
    }
}

#[async_trait]
impl Create for Scope {
    type Params = ScopeCreateParams;
    type Output = Self;

    #[tracing::instrument(skip(client, params), fields(name = %params.name))]
    async fn create(client: &PostureClient, params: Self::Params) -> Result<Self> {
        let response = client.post(PATH, &params).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl Update for Scope {
    type Id = String;
    type Params = ScopeUpdateParams;

    #[tracing::instrument(skip(client, params))]
    async fn update(client: &PostureClient, id: String, params: Self::Params) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.patch(&path, &params).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl Delete for Scope {
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
    fn test_scope_deserialize() {
        let scope: Scope = serde_json::from_value(serde_json::json!({
            "id": "3",
            "name": "Production",
            "credential_id": "5",
            "credential_type": "on_premise",
            "collector_ids": ["12", "13"],
            "created_at": "2024-02-10T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(scope.credential_type, Some(EnvironmentType::OnPremise));
        assert_eq!(scope.collector_ids.len(), 2);
    }

    #[test]
    fn test_create_params_serialize() {
        let params = ScopeCreateParams {
            name: "Staging".to_string(),
            description: None,
            collector_ids: vec!["12".to_string()],
            credential_id: "5".to_string(),
            credential_type: EnvironmentType::Aws,
        };

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Staging",
                "collector_ids": ["12"],
                "credential_id": "5",
                "credential_type": "aws"
            })
        );
    }
}
