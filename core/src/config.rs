//! Client configuration.

use std::time::Duration;

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Domain under which every nation has its own subdomain.
pub const DEFAULT_HOST: &str = "nationbuilder.com";

/// Connection settings for one nation.
///
/// # Example
///
/// ```
/// use nation_core::ClientConfig;
///
/// let config = ClientConfig::new("acme", "T");
/// assert_eq!(config.base_url(), "https://acme.nationbuilder.com/api/v1/");
///
/// let local = ClientConfig::new("acme", "T").with_origin("http://127.0.0.1:3000/");
/// assert_eq!(local.base_url(), "http://127.0.0.1:3000/api/v1/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Nation slug, the subdomain of the API host.
    pub account_slug: String,
    /// API token, sent as the `access_token` query parameter.
    pub access_token: String,
    /// Version path segment, `v1` unless overridden.
    pub api_version: String,
    /// Host that nation subdomains live under.
    pub host: String,
    /// Scheme and authority replacing `https://{slug}.{host}`.
    pub origin: Option<String>,
    /// Request timeout applied by the transport.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(account_slug: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            account_slug: account_slug.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            host: DEFAULT_HOST.to_string(),
            origin: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Point the client at a fixed origin such as a local mock server.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base endpoint, always ending in a slash.
    pub fn base_url(&self) -> String {
        let version = self.api_version.trim_matches('/');
        match &self.origin {
            Some(origin) => format!("{}/api/{version}/", origin.trim_end_matches('/')),
            None => format!("https://{}.{}/api/{version}/", self.account_slug, self.host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("acme", "T");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.host, "nationbuilder.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.origin.is_none());
    }

    #[test]
    fn base_url_from_slug_and_version() {
        let config = ClientConfig::new("acme", "T");
        assert_eq!(config.base_url(), "https://acme.nationbuilder.com/api/v1/");

        let config = ClientConfig::new("acme", "T").with_api_version("v2");
        assert_eq!(config.base_url(), "https://acme.nationbuilder.com/api/v2/");
    }

    #[test]
    fn custom_host() {
        let config = ClientConfig::new("acme", "T").with_host("nationbuilder.test");
        assert_eq!(config.base_url(), "https://acme.nationbuilder.test/api/v1/");
    }

    #[test]
    fn origin_override_ignores_slug() {
        let config = ClientConfig::new("acme", "T").with_origin("http://localhost:3000");
        assert_eq!(config.base_url(), "http://localhost:3000/api/v1/");
    }
}
