//! Profile model and trait implementations.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{entity_path, PostureClient};
use crate::error::Result;
use crate::pagination::{fetch_collection, Collection, Page, PageRequest};
use crate::traits::{Get, List};

const PATH: &str = "profiles";

/// A set of controls a scope is validated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile ID.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub version: Option<u32>,

    #[serde(rename = "type", default)]
    pub profile_type: Option<ProfileType>,

    /// Profile this one was derived from.
    #[serde(default)]
    pub base_profile: Option<String>,

    /// Number of controls in the profile.
    #[serde(default)]
    pub no_of_controls: Option<u32>,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where a profile comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Predefined,
    Custom,
    TemplateProfile,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Predefined => "predefined",
            Self::Custom => "custom",
            Self::TemplateProfile => "template_profile",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl Profile {
    /// Whether the profile ships with the service.
    pub fn is_predefined(&self) -> bool {
        self.profile_type == Some(ProfileType::Predefined)
    }
}

/// API response wrapper for listing profiles.
#[derive(Debug, Deserialize)]
struct ProfileList {
    #[serde(flatten)]
    collection: Collection,
    profiles: Vec<Profile>,
}

#[async_trait]
impl Get for Profile {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &PostureClient, id: String) -> Result<Self> {
        let path = entity_path(PATH, &id)?;
        let response = client.get(&path).await?;
        PostureClient::decode(response).await
    }
}

#[async_trait]
impl List for Profile {
    #[tracing::instrument(skip(client))]
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>> {
        let data: ProfileList = fetch_collection(client, PATH, request).await?;
        data.collection.into_page(data.profiles)
    }
}
