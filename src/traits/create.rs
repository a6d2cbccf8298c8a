//! Create trait for adding new entities.

use async_trait::async_trait;

use crate::client::PostureClient;
use crate::error::Result;

/// Create a new entity.
#[async_trait]
pub trait Create: Sized {
    /// Parameters for the new entity.
    type Params: Send + Sync;

    /// The value the endpoint answers with.
    type Output;

    /// Create the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the parameters or the
    /// request fails.
    async fn create(client: &PostureClient, params: Self::Params) -> Result<Self::Output>;
}
