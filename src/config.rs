//! Client configuration.
//!
//! All settings the client needs are carried in an explicit [`ClientConfig`]
//! value. [`ClientConfig::from_env`] is a convenience for programs that keep
//! their settings in environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{PostureError, Result};

/// Default service endpoint.
pub const DEFAULT_API_URL: &str = "https://us-south.compliance.cloud.ibm.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "POSTURE_API_KEY";
/// Environment variable overriding the service URL.
pub const ENV_API_URL: &str = "POSTURE_API_URL";
/// Environment variable holding the account id.
pub const ENV_ACCOUNT_ID: &str = "POSTURE_ACCOUNT_ID";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "POSTURE_TIMEOUT_SECS";

/// Settings for a [`PostureClient`](crate::PostureClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use postureapi::ClientConfig;
///
/// let config = ClientConfig::new("my-api-key")
///     .with_base_url("https://eu-de.compliance.cloud.ibm.com")
///     .with_account_id("abc123")
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(config.account_id.as_deref(), Some("abc123"));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Service URL; API paths are resolved against it.
    pub base_url: String,
    /// Account id added as the `account_id` query parameter, when set.
    pub account_id: Option<String>,
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Create a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            account_id: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("postureapi/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read configuration from environment variables.
    ///
    /// Uses `POSTURE_API_KEY` (required), `POSTURE_API_URL`,
    /// `POSTURE_ACCOUNT_ID` and `POSTURE_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `POSTURE_API_KEY` is not set or the timeout is
    /// not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| {
            PostureError::ConfigMissing(format!("{ENV_API_KEY} environment variable not set"))
        })?;

        let mut config = Self::new(api_key);

        if let Ok(url) = env::var(ENV_API_URL) {
            config.base_url = url;
        }
        config.account_id = env::var(ENV_ACCOUNT_ID).ok().filter(|s| !s.is_empty());

        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            config.timeout = parse_timeout(&secs)?;
        }

        Ok(config)
    }

    /// Set the service URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the account id.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_timeout(secs: &str) -> Result<Duration> {
    let secs: u64 = secs.trim().parse().map_err(|_| {
        PostureError::InvalidConfig(format!(
            "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{secs}'"
        ))
    })?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.account_id.is_none());
        assert!(config.user_agent.starts_with("postureapi/"));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("45").unwrap(), Duration::from_secs(45));

        // Malformed, not missing
        let err = parse_timeout("soon").unwrap_err();
        assert!(matches!(err, PostureError::InvalidConfig(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ClientConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("ClientConfig"));
        assert!(!debug.contains("super-secret"));
    }
}
