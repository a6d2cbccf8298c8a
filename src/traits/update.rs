//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::PostureClient;
use crate::error::Result;

/// Update an existing entity.
///
/// Implement this trait for entity types that can be modified
/// after creation. Only the fields set in the parameters are sent.
///
/// # Example
///
/// ```ignore
/// use postureapi::{PostureClient, Scope, Update, ScopeUpdateParams};
///
/// let client = PostureClient::from_env()?;
/// let updated = Scope::update(
///     &client,
///     "1".to_string(),
///     ScopeUpdateParams {
///         name: Some("Production".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id;

    /// Parameters for the update.
    type Params;

    /// Update the entity and return the updated version.
    ///
    /// # Arguments
    ///
    /// * `client` - The posture management API client
    /// * `id` - The entity identifier
    /// * `params` - Update parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &PostureClient, id: Self::Id, params: Self::Params) -> Result<Self>;
}
