//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::PostureClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier.
///
/// # Example
///
/// ```ignore
/// use postureapi::{PostureClient, Scope, Get};
///
/// let client = PostureClient::from_env()?;
/// let scope = Scope::get(&client, "1".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The posture management API client
    /// * `id` - The entity identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &PostureClient, id: Self::Id) -> Result<Self>;
}
