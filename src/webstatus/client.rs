use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::NetworkConfig;
use crate::error::{BaselineError, Result};

use super::types::QueryResponse;

/// Transport seam for the webstatus API. Production uses `reqwest`; tests
/// substitute fakes to simulate failures without I/O.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the response body for a fully formed request URL. Non-2xx
    /// statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BaselineError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| BaselineError::Network(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| BaselineError::Network(e.to_string()))
    }
}

/// Network-gated client for the webstatus feature-search service.
///
/// When disabled it returns `None` without any I/O. When enabled it keeps
/// a per-session cache keyed by the filter expression; cache writes are
/// last-write-wins per key, which is safe because results are idempotent.
/// A failed lookup is "no opinion", never an error to the caller.
pub struct WebstatusClient {
    config: NetworkConfig,
    cache: Mutex<HashMap<String, QueryResponse>>,
    transport: Box<dyn Transport>,
}

impl WebstatusClient {
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_transport(config, Box::new(HttpTransport::new()))
    }

    pub fn with_transport(config: NetworkConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
            transport,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Query features matching a filter expression.
    ///
    /// Retries up to `retry.max_attempts` times with a linearly growing
    /// delay (`attempt * base_delay_ms`) between attempts, then gives up
    /// with `None`.
    pub async fn query(&self, filter: &str) -> Option<QueryResponse> {
        if !self.config.enabled {
            return None;
        }

        if let Some(hit) = self.cache.lock().get(filter) {
            debug!(filter, "Webstatus cache hit");
            return Some(hit.clone());
        }

        let url = match self.request_url(filter) {
            Ok(url) => url,
            Err(e) => {
                warn!(filter, error = %e, "Could not build webstatus URL");
                return None;
            }
        };

        let max_attempts = self.config.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.fetch_once(&url).await {
                Ok(response) => {
                    debug!(filter, results = response.data.len(), "Webstatus query succeeded");
                    self.cache
                        .lock()
                        .insert(filter.to_string(), response.clone());
                    return Some(response);
                }
                Err(e) => {
                    warn!(filter, attempt, error = %e, "Webstatus query failed");
                }
            }
            if attempt < max_attempts {
                let delay = self.config.retry.base_delay_ms * attempt as u64;
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        None
    }

    async fn fetch_once(&self, url: &str) -> Result<QueryResponse> {
        let body = self.transport.fetch(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn request_url(&self, filter: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.config.base_url,
            &[("q", filter), ("limit", &self.config.limit.to_string())],
        )
        .map_err(|e| BaselineError::Network(e.to_string()))?;
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::RetryConfig;

    struct FakeTransport {
        calls: AtomicUsize,
        /// Number of leading attempts that fail before a success.
        failures: usize,
        body: String,
    }

    impl FakeTransport {
        fn failing(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                body: r#"{ "data": [ { "feature_id": "grid",
                                      "baseline": { "status": "widely" } } ] }"#
                    .to_string(),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn fetch(&self, _url: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(BaselineError::Network("HTTP 503".to_string()))
            } else {
                Ok(self.body.clone())
            }
        }
    }

    #[async_trait]
    impl<T: Transport> Transport for Arc<T> {
        async fn fetch(&self, url: &str) -> Result<String> {
            (**self).fetch(url).await
        }
    }

    fn test_config(enabled: bool) -> NetworkConfig {
        NetworkConfig {
            enabled,
            retry: RetryConfig {
                max_attempts: 3,
                base_delay_ms: 0,
            },
            ..NetworkConfig::default()
        }
    }

    fn client(enabled: bool, failures: usize) -> (WebstatusClient, Arc<FakeTransport>) {
        let transport = Arc::new(FakeTransport::failing(failures));
        let client =
            WebstatusClient::with_transport(test_config(enabled), Box::new(transport.clone()));
        (client, transport)
    }

    #[tokio::test]
    async fn test_disabled_client_never_calls_transport() {
        let (client, transport) = client(false, 0);

        assert!(client.query("group:css").await.is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_three_failures_then_give_up() {
        let (client, transport) = client(true, usize::MAX);

        assert!(client.query("group:css").await.is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_recovers_within_budget() {
        let (client, transport) = client(true, 2);

        let response = client.query("group:css").await.unwrap();
        assert_eq!(response.data[0].feature_id, "grid");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cached_query_skips_transport() {
        let (client, transport) = client(true, 0);

        assert!(client.query("group:css").await.is_some());
        assert!(client.query("group:css").await.is_some());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        // A different filter is a separate cache key.
        assert!(client.query("id:grid").await.is_some());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_counts_as_failure() {
        let transport = Box::new(StaticTransport("not json".to_string()));
        let client = WebstatusClient::with_transport(test_config(true), transport);

        assert!(client.query("group:css").await.is_none());
    }

    struct StaticTransport(String);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_request_url_encodes_filter() {
        let client = WebstatusClient::with_transport(
            test_config(true),
            Box::new(StaticTransport(String::new())),
        );
        let url = client
            .request_url("group:css AND -baseline_status:limited")
            .unwrap();

        assert!(url.starts_with("https://api.webstatus.dev/v1/features?q="));
        assert!(!url.contains(' '));
        assert!(url.ends_with("&limit=100"));
    }
}
