//! HTTP client with connection pooling, scoped auth and range translation

use crate::auth::AuthScopeResolver;
use apkfetch_config::Config;
use apkfetch_errors::{Error, NetworkError};
use apkfetch_types::ByteRange;
use reqwest::header::RANGE;
use reqwest::{Client, Request, Response};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // 5 minutes for large data segments
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: format!("apkfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetConfig {
    /// Take timeouts and user agent from the loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            user_agent: config.network.user_agent.clone(),
            ..Self::default()
        }
    }
}

/// HTTP client wrapper
///
/// Requests are sent exactly once. A URL fragment following the
/// `#_apk_range_bytes_A-B` convention is stripped and sent as a `Range`
/// header, and basic-auth credentials are attached when the resolver scopes
/// them to the URL.
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    auth: AuthScopeResolver,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig, auth: AuthScopeResolver) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self {
            client,
            auth,
            config,
        })
    }

    /// Create with default configuration and no credentials
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default(), AuthScopeResolver::none())
    }

    /// Build a client from the loaded configuration, parsing `HTTP_AUTH`
    ///
    /// # Errors
    ///
    /// Returns an error if the auth descriptor is malformed or the client
    /// cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let auth = AuthScopeResolver::new(config.http_auth.as_deref())?;
        Self::new(NetConfig::from_config(config), auth)
    }

    /// Execute a GET request for `range`, or for the range encoded in the
    /// URL fragment when `range` is `None`
    ///
    /// # Errors
    ///
    /// Returns an error on timeouts, connection failures, a malformed URL, or
    /// when both an explicit range and a range fragment are given.
    pub async fn get_range(&self, url: &str, range: Option<&ByteRange>) -> Result<Response, Error> {
        let request = self.build_request(url, range)?;
        tracing::debug!(
            url = %request.url(),
            range = ?request.headers().get(RANGE),
            "sending request"
        );
        self.client.execute(request).await.map_err(map_request_error)
    }

    /// Resolve the range and credentials of `url` into a request
    ///
    /// Credentials are scoped against the URL without its fragment, so both
    /// range strategies authenticate the same way.
    fn build_request(&self, url: &str, range: Option<&ByteRange>) -> Result<Request, Error> {
        let (base, fragment) = split_fragment(url);
        let fragment_range = fragment.and_then(ByteRange::from_fragment);

        let range = match (range, fragment_range.as_ref()) {
            (Some(_), Some(_)) => {
                return Err(NetworkError::InvalidRange(format!(
                    "{url} carries a range fragment and an explicit range"
                ))
                .into())
            }
            (Some(range), None) | (None, Some(range)) => Some(range),
            (None, None) => None,
        };

        let target = crate::parse_url(base)?;
        match target.scheme() {
            "http" | "https" => {}
            other => {
                return Err(NetworkError::UnsupportedProtocol {
                    protocol: other.to_string(),
                }
                .into())
            }
        }

        let mut request = self.client.get(target);
        if let Some(range) = range {
            request = request.header(RANGE, range.header_value());
        }
        if let Some(credentials) = self.auth.credentials_for(base) {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        request.build().map_err(map_request_error)
    }
}

impl std::fmt::Debug for NetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetClient")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Split `url` at the first `#`
pub(crate) fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    }
}

pub(crate) fn map_request_error(e: reqwest::Error) -> Error {
    let url = e
        .url()
        .map(std::string::ToString::to_string)
        .unwrap_or_default();
    if e.is_timeout() {
        NetworkError::Timeout { url }.into()
    } else if e.is_connect() {
        NetworkError::ConnectionRefused(e.to_string()).into()
    } else {
        NetworkError::DownloadFailed(e.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_split_fragment() {
        assert_eq!(
            split_fragment("https://example.dev/a.apk#_apk_range_bytes_0-0"),
            ("https://example.dev/a.apk", Some("_apk_range_bytes_0-0"))
        );
        assert_eq!(split_fragment("https://example.dev/a.apk"), ("https://example.dev/a.apk", None));
    }

    #[test]
    fn test_config_from_loaded_config() {
        let config = Config::default();
        let net = NetConfig::from_config(&config);
        assert_eq!(net.timeout, config.timeout());
        assert!(net.user_agent.starts_with("apkfetch/"));
    }

    #[tokio::test]
    async fn test_rejects_conflicting_ranges() {
        let client = NetClient::with_defaults().unwrap();
        let range = ByteRange::first_byte();
        let err = client
            .get_range("https://example.dev/a.apk#_apk_range_bytes_0-0", Some(&range))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(NetworkError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let client = NetClient::with_defaults().unwrap();
        let err = client.get_range("ftp://example.dev/a.apk", None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::UnsupportedProtocol { .. })
        ));
    }

    fn scoped_client() -> NetClient {
        let auth = AuthScopeResolver::new(Some("basic:packages.example.dev:alice:secret")).unwrap();
        NetClient::new(NetConfig::default(), auth).unwrap()
    }

    #[test]
    fn test_fragment_range_becomes_header_and_keeps_credentials() {
        let client = scoped_client();
        let request = client
            .build_request(
                "https://packages.example.dev/os/x86_64/a.apk#_apk_range_bytes_669-1082",
                None,
            )
            .unwrap();

        assert_eq!(request.url().as_str(), "https://packages.example.dev/os/x86_64/a.apk");
        assert_eq!(request.url().fragment(), None);
        assert_eq!(request.headers()[RANGE], "bytes=669-1082");
        // base64("alice:secret")
        assert_eq!(request.headers()[AUTHORIZATION], "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn test_out_of_realm_request_has_no_credentials() {
        let client = scoped_client();
        let range = ByteRange::first_byte();
        for (url, range) in [
            ("https://other.dev/os/x86_64/a.apk", Some(&range)),
            ("https://other.dev/os/x86_64/a.apk#_apk_range_bytes_0-0", None),
            ("http://packages.example.dev/os/x86_64/a.apk", Some(&range)),
        ] {
            let request = client.build_request(url, range).unwrap();
            assert!(request.headers().get(AUTHORIZATION).is_none(), "{url}");
            assert_eq!(request.headers()[RANGE], "bytes=0-0");
        }
    }
}
