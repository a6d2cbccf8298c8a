//! Credential model and trait implementations.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{entity_path, PostureClient};
use crate::error::Result;
use crate::pagination::{fetch_collection, Collection, Page, PageRequest};
use crate::traits::{Create, Delete, Get, List, Update};

const PATH: &str = "credentials";

/// Secrets a collector uses to reach the resources in a scope.
///
/// Secret values are never returned by the API; `display_fields` only holds
/// the non-sensitive parts (user names, masked keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Credential ID.
    pub id: String,

    /// Credential name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// What kind of environment the credential authenticates against.
    #[serde(rename = "type")]
    pub credential_type: CredentialType,

    /// Whether the credential can be used.
    #[serde(default)]
    pub enabled: bool,

    /// What the credential may be used for.
    #[serde(default)]
    pub purpose: Option<CredentialPurpose>,

    /// Non-sensitive display fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_fields: Option<serde_json::Value>,

    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Credential kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    AwsCloud,
    AzureCloud,
    Database,
    IbmCloud,
    KerberosWindows,
    #[serde(rename = "ms_365")]
    Ms365,
    OpenstackCloud,
    UserNamePem,
    UsernamePassword,
    Windows,
    /// A kind this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwsCloud => "aws_cloud",
            Self::AzureCloud => "azure_cloud",
            Self::Database => "database",
            Self::IbmCloud => "ibm_cloud",
            Self::KerberosWindows => "kerberos_windows",
            Self::Ms365 => "ms_365",
            Self::OpenstackCloud => "openstack_cloud",
            Self::UserNamePem => "user_name_pem",
            Self::UsernamePassword => "username_password",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Credential usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPurpose {
    DiscoveryCollection,
    DiscoveryFactCollection,
    DiscoveryFactCollectionRemediation,
    Remediation,
    #[serde(other)]
    Unknown,
}

impl Credential {
    /// Whether the credential is for a cloud provider account.
    pub fn is_cloud(&self) -> bool {
        matches!(
            self.credential_type,
            CredentialType::AwsCloud
                | CredentialType::AzureCloud
                | CredentialType::IbmCloud
                | CredentialType::OpenstackCloud
        )
    }
}

/// Parameters for creating a credential.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialCreateParams {
    pub name: String,

    #[serde(rename = "type")]
    pub credential_type: CredentialType,

    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<CredentialPurpose>,

    /// Type-specific fields, secrets included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_fields: Option<serde_json::Value>,
}

/// Parameters for updating a credential.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CredentialUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<CredentialPurpose>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_fields: Option<serde_json::Value>,
}

/// API response wrapper for listing credentials.
#[derive(Debug, Deserialize)]
struct CredentialList {
    #[serde(flatten)]
    collection: Collection,
    credentials: Vec<Credential>,
}

#[async_trait]
impl Get for Credential {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &PostureClient, id: String) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.get(&path).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl List for Credential {
    #[tracing::instrument(skip(client))]
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>> {
        let data: CredentialList = fetch_collection(client, PATH, request).await?;
        data.collection.into_page(data.credentials)
    }
}

#[async_trait]
impl Create for Credential {
    type Params = CredentialCreateParams;
    type Output = Self;

    #[tracing::instrument(skip(client, params), fields(name = %params.name))]
    async fn create(client: &PostureClient, params: Self::Params) -> Result<Self> {
        let response = client.post(PATH, &params).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl Update for Credential {
    type Id = String;
    type Params = CredentialUpdateParams;

    #[tracing::instrument(skip(client, params))]
    async fn update(client: &PostureClient, id: String, params: Self::Params) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.patch(&path, &params).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl Delete for Credential {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &PostureClient, id: String) -> Result<()> {
        let path = entity_path(PATH, &id)?;
        client.delete(&path).await?;
        Ok(())
    }
}
