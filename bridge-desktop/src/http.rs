//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("turbospeed-files/", env!("CARGO_PKG_VERSION"));

/// Reqwest-based HTTP client implementation
///
/// Sends each request once over a pooled TLS connection. Non-2xx statuses
/// are returned as responses; only transport failures become errors.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client configuration");
                Client::new()
            });

        Self { client }
    }

    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(Self::convert_method(request.method), &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    fn transport_error(e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::OperationFailed("Request timed out".to_string())
        } else if e.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", e))
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = ?request.method, url = %request.url, "Executing HTTP request");

        let response = self.build_request(request).send().await.map_err(|e| {
            warn!(error = %e, "HTTP request failed");
            Self::transport_error(e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::transport_error)?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let _client = ReqwestHttpClient::new();
        let _client = ReqwestHttpClient::default();
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn test_user_agent_names_project() {
        assert!(USER_AGENT.starts_with("turbospeed-files/"));
    }

    #[test]
    fn test_build_request_carries_headers_and_timeout() {
        let client = ReqwestHttpClient::new();
        let request = HttpRequest::new(HttpMethod::Delete, "https://example.com/assets/3")
            .bearer_token("t")
            .timeout(Duration::from_secs(5));

        let built = client.build_request(request).build().unwrap();

        assert_eq!(built.method(), reqwest::Method::DELETE);
        assert_eq!(built.url().as_str(), "https://example.com/assets/3");
        assert_eq!(built.headers()["authorization"], "Bearer t");
        assert_eq!(built.timeout(), Some(&Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(2));
        // nothing listens on port 9 of the loopback interface
        let err = client
            .execute(HttpRequest::new(HttpMethod::Get, "http://127.0.0.1:9/"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::OperationFailed(_)));
    }
}
