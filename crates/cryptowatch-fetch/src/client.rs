//! Blocking API client with retry and allowance bookkeeping.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use cryptowatch_types::{Allowance, ApiError, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::url::BASE_URL;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// Total attempts per call, including the first one.
    pub max_attempts: u32,
    /// Fixed delay before retrying a rate-limited call.
    pub retry_delay: Duration,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            max_attempts: 5,
            retry_delay: Duration::from_secs(3),
            timeout: Duration::from_secs(30),
            user_agent: format!("cryptowatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Status and body of a raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl RawResponse {
    /// Creates a new raw response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues a single HTTP GET and returns the raw response.
pub trait HttpBackend {
    /// Sends a GET request with the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn send(&self, url: &str, params: &[(&str, String)]) -> Result<RawResponse>;
}

impl HttpBackend for reqwest::blocking::Client {
    fn send(&self, url: &str, params: &[(&str, String)]) -> Result<RawResponse> {
        let response = self
            .get(url)
            .query(params)
            .send()
            .map_err(|e| ApiError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// The request capability shared by the directory and market clients.
///
/// Implementations return the unwrapped `result` payload of a call and keep the
/// allowance reported by the latest classified response.
pub trait Transport {
    /// Issues a GET to `url` and returns the `result` payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the call is rejected, rate limited past the retry
    /// budget, answered with an unexpected status, or cannot be decoded.
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value>;

    /// Returns the allowance reported by the latest classified response.
    fn allowance(&self) -> Option<Allowance>;

    /// Returns the base URL the API is addressed at.
    fn base_url(&self) -> &str;

    /// Returns the cost of the latest call.
    fn latest_cost(&self) -> Option<f64> {
        self.allowance().map(|a| a.cost)
    }

    /// Returns the remaining allowance after the latest call.
    fn latest_remaining(&self) -> Option<f64> {
        self.allowance().map(|a| a.remaining)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        (**self).get(url, params)
    }

    fn allowance(&self) -> Option<Allowance> {
        (**self).allowance()
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        (**self).get(url, params)
    }

    fn allowance(&self) -> Option<Allowance> {
        (**self).allowance()
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        (**self).get(url, params)
    }

    fn allowance(&self) -> Option<Allowance> {
        (**self).allowance()
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

/// Blocking API client with fixed-delay retries on rate limiting.
///
/// The latest cost and remaining allowance are plain `Cell`s overwritten by every
/// `200` or `400` response. They are advisory only: the client is not `Sync`, and
/// each clone tracks its own allowance.
#[derive(Debug, Clone)]
pub struct ApiClient<B = reqwest::blocking::Client> {
    backend: B,
    config: ClientConfig,
    latest_cost: Cell<Option<f64>>,
    latest_remaining: Cell<Option<f64>>,
}

impl ApiClient {
    /// Creates a new API client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Ok(Self::with_backend(backend, config))
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Creates a client that sends requests through the given backend.
    #[must_use]
    pub const fn with_backend(backend: B, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            latest_cost: Cell::new(None),
            latest_remaining: Cell::new(None),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the HTTP backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the cost of the latest call.
    #[must_use]
    pub fn latest_cost(&self) -> Option<f64> {
        self.latest_cost.get()
    }

    /// Returns the remaining allowance after the latest call.
    #[must_use]
    pub fn latest_remaining(&self) -> Option<f64> {
        self.latest_remaining.get()
    }

    /// Parses a classified response body and records its allowance.
    ///
    /// A body without an allowance, or one that cannot be parsed, clears the
    /// previous values.
    fn record(&self, body: &str) -> Result<Envelope> {
        let envelope = Envelope::parse(body);
        let allowance = envelope.as_ref().ok().and_then(|e| e.allowance);
        self.latest_cost.set(allowance.map(|a| a.cost));
        self.latest_remaining.set(allowance.map(|a| a.remaining));
        envelope
    }

    /// Issues a GET with retries and returns the `result` payload.
    ///
    /// `429` responses are retried after the configured delay until
    /// `max_attempts` is spent. `400` fails immediately with the API's message.
    /// Any other non-`200` status waits the delay once and then fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RateLimitExceeded`], [`ApiError::Client`],
    /// [`ApiError::Status`], or a transport/decoding error.
    pub fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            debug!(url, attempt, "GET");
            let response = self.backend.send(url, params)?;

            match response.status {
                200 => return self.record(&response.body)?.into_result(),
                400 => {
                    let message = match self.record(&response.body) {
                        Ok(envelope) => envelope.error.unwrap_or(response.body),
                        Err(_) => response.body,
                    };
                    return Err(ApiError::Client { message });
                }
                429 => {
                    warn!(url, attempt, attempts, "rate limited");
                    if attempt < attempts {
                        std::thread::sleep(self.config.retry_delay);
                    }
                }
                status => {
                    warn!(url, status, "unexpected status");
                    std::thread::sleep(self.config.retry_delay);
                    return Err(ApiError::Status { status });
                }
            }
        }

        Err(ApiError::RateLimitExceeded { attempts })
    }
}

impl<B: HttpBackend> Transport for ApiClient<B> {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        Self::get(self, url, params)
    }

    fn allowance(&self) -> Option<Allowance> {
        Some(Allowance::new(self.latest_cost()?, self.latest_remaining()?))
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedBackend;
    use approx::assert_relative_eq;
    use std::time::Instant;
    use serde_json::json;

    fn scripted_client(backend: ScriptedBackend) -> ApiClient<ScriptedBackend> {
        ApiClient::with_backend(
            backend,
            ClientConfig {
                retry_delay: Duration::ZERO,
                ..ClientConfig::default()
            },
        )
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.cryptowat.ch");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
        assert!(config.user_agent.starts_with("cryptowatch/"));
    }

    #[test]
    fn test_client_creation() {
        assert!(ApiClient::with_defaults().is_ok());
    }

    #[test]
    fn test_success_returns_result_and_allowance() {
        let backend = ScriptedBackend::new();
        backend.push(
            200,
            r#"{"result": {"price": 100.5}, "allowance": {"cost": 0.25, "remaining": 7.75}}"#,
        );
        let client = scripted_client(backend);

        let result = client.get("https://api.test/price", &[]).unwrap();
        assert_eq!(result, json!({"price": 100.5}));
        assert_relative_eq!(client.latest_cost().unwrap(), 0.25);
        assert_relative_eq!(client.latest_remaining().unwrap(), 7.75);
        assert_eq!(client.backend().requests().len(), 1);
    }

    #[test]
    fn test_rate_limited_on_every_attempt() {
        let backend = ScriptedBackend::new();
        for _ in 0..10 {
            backend.push(429, "");
        }
        let client = scripted_client(backend);

        let err = client.get("https://api.test/markets", &[]).unwrap_err();
        assert!(matches!(err, ApiError::RateLimitExceeded { attempts: 5 }));
        assert_eq!(client.backend().requests().len(), 5);
        assert_eq!(client.backend().remaining(), 5);
    }

    #[test]
    fn test_success_after_two_rate_limits() {
        let backend = ScriptedBackend::new();
        backend.push(429, "");
        backend.push(429, "");
        backend.push(
            200,
            r#"{"result": [1, 2, 3], "allowance": {"cost": 0.003, "remaining": 3.5}}"#,
        );
        let client = scripted_client(backend);

        let result = client.get("https://api.test/trades", &[]).unwrap();
        assert_eq!(result, json!([1, 2, 3]));
        assert_eq!(client.backend().requests().len(), 3);
        assert_eq!(
            Transport::allowance(&client),
            Some(Allowance::new(0.003, 3.5))
        );
    }

    #[test]
    fn test_bad_request_fails_without_retry() {
        let backend = ScriptedBackend::new();
        backend.push(
            400,
            r#"{"error": "Market not found", "allowance": {"cost": 0.001, "remaining": 9.0}}"#,
        );
        backend.push(200, r#"{"result": 1}"#);
        let client = scripted_client(backend);

        let err = client.get("https://api.test/markets/x/y", &[]).unwrap_err();
        match err {
            ApiError::Client { message } => assert_eq!(message, "Market not found"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.backend().requests().len(), 1);
        assert_relative_eq!(client.latest_cost().unwrap(), 0.001);
        assert_relative_eq!(client.latest_remaining().unwrap(), 9.0);
    }

    #[test]
    fn test_bad_request_with_plain_body() {
        let backend = ScriptedBackend::new();
        backend.push(400, "bad request");
        let client = scripted_client(backend);

        let err = client.get("https://api.test/x", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Client { message } if message == "bad request"));
        assert_eq!(client.latest_cost(), None);
    }

    #[test]
    fn test_bad_request_without_allowance_clears_previous() {
        let backend = ScriptedBackend::new();
        backend.push(
            200,
            r#"{"result": 1, "allowance": {"cost": 0.5, "remaining": 9.5}}"#,
        );
        backend.push(400, r#"{"error": "bad"}"#);
        let client = scripted_client(backend);

        client.get("https://api.test/a", &[]).unwrap();
        assert!(Transport::allowance(&client).is_some());

        let err = client.get("https://api.test/b", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Client { message } if message == "bad"));
        assert_eq!(Transport::allowance(&client), None);
        assert_eq!(client.latest_cost(), None);
        assert_eq!(client.latest_remaining(), None);
    }

    #[test]
    fn test_retry_delay_between_rate_limits() {
        let delay = Duration::from_millis(20);
        let backend = ScriptedBackend::new();
        for _ in 0..5 {
            backend.push(429, "");
        }
        let client = ApiClient::with_backend(
            backend,
            ClientConfig {
                retry_delay: delay,
                ..ClientConfig::default()
            },
        );

        let started = Instant::now();
        let err = client.get("https://api.test/x", &[]).unwrap_err();
        assert!(err.is_rate_limited());
        assert!(started.elapsed() >= delay * 4);
    }

    #[test]
    fn test_retry_delay_before_status_failure() {
        let delay = Duration::from_millis(20);
        let backend = ScriptedBackend::new();
        backend.push(503, "");
        let client = ApiClient::with_backend(
            backend,
            ClientConfig {
                retry_delay: delay,
                ..ClientConfig::default()
            },
        );

        let started = Instant::now();
        let err = client.get("https://api.test/x", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503 }));
        assert!(started.elapsed() >= delay);
    }

    #[test]
    fn test_base_url_comes_from_config() {
        let client = ApiClient::with_backend(
            ScriptedBackend::new(),
            ClientConfig {
                base_url: "http://localhost:9999".to_string(),
                ..ClientConfig::default()
            },
        );
        assert_eq!(Transport::base_url(&client), "http://localhost:9999");
        assert_eq!(Transport::base_url(&&client), "http://localhost:9999");
    }

    #[test]
    fn test_unexpected_status_fails_after_one_attempt() {
        let backend = ScriptedBackend::new();
        backend.push(503, "Service Unavailable");
        backend.push(200, r#"{"result": 1}"#);
        let client = scripted_client(backend);

        let err = client.get("https://api.test/x", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503 }));
        assert_eq!(client.backend().requests().len(), 1);
    }

    #[test]
    fn test_rate_limit_then_unexpected_status() {
        let backend = ScriptedBackend::new();
        backend.push(429, "");
        backend.push(500, "");
        let client = scripted_client(backend);

        let err = client.get("https://api.test/x", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500 }));
        assert_eq!(client.backend().requests().len(), 2);
    }

    #[test]
    fn test_allowance_reflects_latest_call_only() {
        let backend = ScriptedBackend::new();
        backend.push(
            200,
            r#"{"result": 1, "allowance": {"cost": 0.5, "remaining": 9.5}}"#,
        );
        backend.push(
            200,
            r#"{"result": 2, "allowance": {"cost": 0.25, "remaining": 9.25}}"#,
        );
        let client = scripted_client(backend);

        client.get("https://api.test/a", &[]).unwrap();
        client.get("https://api.test/b", &[]).unwrap();
        assert_eq!(
            Transport::allowance(&client),
            Some(Allowance::new(0.25, 9.25))
        );
    }

    #[test]
    fn test_query_params_are_forwarded() {
        let backend = ScriptedBackend::new();
        backend.push(200, r#"{"result": []}"#);
        let client = scripted_client(backend);

        client
            .get("https://api.test/trades", &[("limit", "10".to_string())])
            .unwrap();
        let requests = client.backend().requests();
        assert_eq!(requests[0].url, "https://api.test/trades");
        assert_eq!(
            requests[0].params,
            vec![("limit".to_string(), "10".to_string())]
        );
    }

    #[test]
    fn test_zero_attempts_still_sends_once() {
        let backend = ScriptedBackend::new();
        backend.push(200, r#"{"result": true}"#);
        let client = ApiClient::with_backend(
            backend,
            ClientConfig {
                max_attempts: 0,
                retry_delay: Duration::ZERO,
                ..ClientConfig::default()
            },
        );
        assert_eq!(client.get("https://api.test/x", &[]).unwrap(), json!(true));
    }
}
