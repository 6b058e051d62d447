//! HTTP transport shared by every resource binding.
//!
//! [`ServiceClient`] issues exactly one request per call: it does not retry,
//! it does not authenticate beyond forwarding a configured token, and it
//! reports any status outside the accepted set as
//! [`Error::UnexpectedStatus`] without interpreting it further.

use crate::config::LbaasClientConfig;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

const USER_AGENT: &str = concat!("lbaas-core/", env!("CARGO_PKG_VERSION"));

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-request overrides.
#[derive(Debug, Clone)]
pub struct RequestOpts {
    ok_codes: Option<Vec<u16>>,
    json_response: bool,
}

impl RequestOpts {
    /// Options using the method's default accepted codes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ok_codes: None,
            json_response: true,
        }
    }

    /// Replace the accepted status codes.
    #[must_use]
    pub fn with_ok_codes(mut self, codes: &[u16]) -> Self {
        self.ok_codes = Some(codes.to_vec());
        self
    }

    /// Whether the response body should be parsed as JSON.
    #[must_use]
    pub const fn with_json_response(mut self, parse: bool) -> Self {
        self.json_response = parse;
        self
    }

    /// Accepted codes for `method`, taking overrides into account.
    #[must_use]
    pub fn ok_codes_for(&self, method: &Method) -> Vec<u16> {
        self.ok_codes
            .clone()
            .unwrap_or_else(|| default_ok_codes(method).to_vec())
    }
}

impl Default for RequestOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Status codes accepted when a call does not override them.
#[must_use]
pub fn default_ok_codes(method: &Method) -> &'static [u16] {
    match *method {
        Method::POST | Method::PUT => &[201, 202],
        Method::PATCH => &[200, 202, 204],
        Method::DELETE => &[202, 204],
        _ => &[200],
    }
}

/// A response whose status was accepted.
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code returned by the server
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `None` for empty or unparsed bodies
    pub body: Option<Value>,
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    endpoint: Url,
    http_config: ClientConfig,
    user_agent: String,
    token: Option<String>,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
}

impl ServiceClientBuilder {
    /// Create a builder for the given service endpoint.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        let mut endpoint = Url::parse(endpoint.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid LBaaS endpoint `{}`: {err}",
                endpoint.as_ref()
            ))
        })?;

        if endpoint.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "`{endpoint}` cannot be used as a base URL"
            )));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        Ok(Self {
            endpoint,
            http_config: ClientConfig::new(),
            user_agent: USER_AGENT.to_string(),
            token: None,
            tls_verify: true,
            tls_ca_cert: None,
        })
    }

    /// Create a builder from a validated [`LbaasClientConfig`].
    pub fn from_config(config: &LbaasClientConfig) -> Result<Self> {
        let mut builder = Self::new(&config.endpoint)?
            .with_timeout(config.timeout())
            .with_tls_verify(config.tls_verify);

        if let Some(token) = &config.token {
            builder = builder.with_token(token.clone());
        }
        if let Some(path) = &config.tls_ca_cert {
            builder = builder.with_ca_cert(path.clone());
        }
        Ok(builder)
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config = self.http_config.with_timeout(timeout);
        self
    }

    /// Configure an X-Auth-Token header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM encoded CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_str())
            .timeout(self.http_config.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        if !self.tls_verify {
            warn!("TLS verification disabled for LBaaS client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading LBaaS CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build LBaaS HTTP client: {err}"))
        })?;

        Ok(ServiceClient {
            http,
            endpoint: self.endpoint,
            token: self.token.map(|token| Arc::new(SecretString::from(token))),
            logging: self.http_config.enable_logging,
        })
    }
}

/// Transport used by every resource operation.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    http: Client,
    endpoint: Url,
    token: Option<Arc<SecretString>>,
    logging: bool,
}

impl ServiceClient {
    /// Construct a client directly from the endpoint URL.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        ServiceClientBuilder::new(endpoint)?.build()
    }

    /// Return the endpoint, always ending in `/`.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Join path segments onto the endpoint.
    #[must_use]
    pub fn service_url(&self, parts: &[&str]) -> String {
        format!("{}{}", self.endpoint, parts.join("/"))
    }

    /// Issue a GET request.
    pub async fn get(&self, url: &str, opts: RequestOpts) -> Result<Response> {
        self.request::<()>(Method::GET, url, None, opts).await
    }

    /// Issue a POST request with a JSON body.
    pub async fn post<B>(&self, url: &str, body: &B, opts: RequestOpts) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, url, Some(body), opts).await
    }

    /// Issue a PUT request with a JSON body.
    pub async fn put<B>(&self, url: &str, body: &B, opts: RequestOpts) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, url, Some(body), opts).await
    }

    /// Issue a DELETE request. The response body is never parsed.
    pub async fn delete(&self, url: &str, opts: RequestOpts) -> Result<Response> {
        self.request::<()>(Method::DELETE, url, None, opts.with_json_response(false))
            .await
    }

    /// Issue a request against an absolute URL.
    pub async fn request<B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        opts: RequestOpts,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let target = Url::parse(url)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid request URL `{url}`: {err}")))?;
        let ok_codes = opts.ok_codes_for(&method);

        let mut request = self
            .http
            .request(method.clone(), target)
            .header(ACCEPT, "application/json");

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|err| {
                Error::ConfigError(format!("Token is not a valid header value: {err}"))
            })?;
            value.set_sensitive(true);
            request = request.header(AUTH_TOKEN_HEADER, value);
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        if self.logging {
            debug!(method = %method, url, "LBaaS request");
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        if self.logging {
            debug!(method = %method, url, status = status.as_u16(), "LBaaS response");
        }

        if !ok_codes.contains(&status.as_u16()) {
            return Err(Error::UnexpectedStatus {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                expected: ok_codes,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let body = if opts.json_response {
            decode_body(url, status, &bytes)?
        } else {
            None
        };

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn decode_body(url: &str, status: StatusCode, bytes: &[u8]) -> Result<Option<Value>> {
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|err| Error::DecodeError(format!("Failed to parse response from `{url}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_logging(false)
            .with_compression(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.enable_logging);
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT));
        assert!(config.enable_logging);
    }

    #[test]
    fn test_default_ok_codes() {
        assert_eq!(default_ok_codes(&Method::GET), &[200]);
        assert_eq!(default_ok_codes(&Method::POST), &[201, 202]);
        assert_eq!(default_ok_codes(&Method::PUT), &[201, 202]);
        assert_eq!(default_ok_codes(&Method::DELETE), &[202, 204]);
    }

    #[test]
    fn test_request_opts_override() {
        let opts = RequestOpts::new().with_ok_codes(&[200, 202]);
        assert_eq!(opts.ok_codes_for(&Method::PUT), vec![200, 202]);
        assert_eq!(RequestOpts::default().ok_codes_for(&Method::PUT), vec![201, 202]);
    }

    #[test]
    fn test_service_url_appends_segments() {
        let client = ServiceClient::new("http://network.example.com:9696/v2.0").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://network.example.com:9696/v2.0/");
        assert_eq!(
            client.service_url(&["lbaas", "loadbalancers"]),
            "http://network.example.com:9696/v2.0/lbaas/loadbalancers"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            ServiceClient::new("not a url"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            ServiceClient::new("mailto:ops@example.com"),
            Err(Error::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_builder_from_config() {
        let config = LbaasClientConfig::new("https://network.example.com/v2.0")
            .unwrap()
            .with_token("tok")
            .with_timeout(5);
        let client = ServiceClientBuilder::from_config(&config)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(client.endpoint().path(), "/v2.0/");
        assert!(client.token.is_some());
    }

    #[tokio::test]
    async fn get_parses_json_and_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/1"))
            .and(header("X-Auth-Token", "tok"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"thing": {"id": "1"}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ServiceClientBuilder::new(server.uri())
            .unwrap()
            .with_token("tok")
            .build()
            .unwrap();
        let url = client.service_url(&["things", "1"]);
        let response = client.get(&url, RequestOpts::new()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Some(json!({"thing": {"id": "1"}})));
    }

    #[tokio::test]
    async fn status_outside_ok_codes_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/things"))
            .and(body_json(json!({"thing": {"name": "a"}})))
            .respond_with(ResponseTemplate::new(409).set_body_string("already exists"))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let url = client.service_url(&["things"]);
        let err = client
            .post(&url, &json!({"thing": {"name": "a"}}), RequestOpts::new())
            .await
            .unwrap_err();

        match err {
            Error::UnexpectedStatus {
                method,
                status,
                expected,
                body,
                ..
            } => {
                assert_eq!(method, "POST");
                assert_eq!(status, 409);
                assert_eq!(expected, vec![201, 202]);
                assert_eq!(body, "already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let err = client
            .get(&client.service_url(&["things"]), RequestOpts::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[tokio::test]
    async fn delete_ignores_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/things/1"))
            .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let response = client
            .delete(&client.service_url(&["things", "1"]), RequestOpts::new())
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::ACCEPTED);
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn slow_response_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thing": {"id": "1"}}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = ServiceClientBuilder::new(server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client
            .get(&client.service_url(&["things", "1"]), RequestOpts::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
