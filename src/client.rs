//! Posture management API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{PostureError, Result};

/// Prefix of every posture management API path.
pub(crate) const API_PREFIX: &str = "posture/v2/";

/// Query parameter carrying the configured account id.
pub const ACCOUNT_ID_PARAM: &str = "account_id";

/// Path of one entity under `collection`, with the id percent-encoded.
///
/// Empty, `.` and `..` ids are rejected: URL resolution would treat them as
/// dot segments and address a different resource.
pub(crate) fn entity_path(collection: &str, id: &str) -> Result<String> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(PostureError::InvalidRequest(format!("'{id}' is not a valid id")));
    }
    Ok(format!("{collection}/{}", urlencoding::encode(id)))
}

/// Low-level posture management API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use postureapi::{ClientConfig, PostureClient};
///
/// # fn example() -> postureapi::Result<()> {
/// // Create from environment variables
/// let client = PostureClient::from_env()?;
///
/// // Or configure explicitly
/// let config = ClientConfig::new("your-api-key").with_account_id("abc123");
/// let client = PostureClient::new(config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PostureClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    account_id: Option<String>,
}

impl std::fmt::Debug for PostureClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostureClient")
            .field("base_url", &self.base_url.as_str())
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl PostureClient {
    /// Create a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if `POSTURE_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a new client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if config.base_url.ends_with('/') {
            config.base_url.clone()
        } else {
            format!("{}/", config.base_url)
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout)
            .build()
            .map_err(PostureError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: config.api_key,
            account_id: config.account_id,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the configured account id.
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Resolve an API path (relative to `posture/v2/`) against the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.join(API_PREFIX)?.join(path)?;
        if let Some(account_id) = &self.account_id {
            url.query_pairs_mut().append_pair(ACCOUNT_ID_PARAM, account_id);
        }
        Ok(url)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(PostureError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.url(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(PostureError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url(path)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(PostureError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a PATCH request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url(path)?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(PostureError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.url(path)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(PostureError::HttpError)?;

        Self::check_response(response).await
    }

    /// Read a response body and decode it as JSON.
    ///
    /// Failing to read the body is a transport error; a body that does not
    /// match `T` is a parse error.
    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await.map_err(PostureError::HttpError)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(PostureError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        Err(PostureError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    ///
    /// Understands both `{"message": ..}` and the
    /// `{"errors": [{"message": ..}]}` envelope.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(msg) = json
                .get("errors")
                .and_then(|e| e.get(0))
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}
