//! Reqwest-based HTTP transport implementation.

use super::http::{HttpTransport, HttpRequest, HttpResponse, HttpMethod};
use super::error::TransportError;
use crate::auth::is_credential_header;
use crate::config::TranslatorConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Reqwest-based HTTP transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport with the given timeouts.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create a transport using the timeouts of a translator configuration.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TransportError> {
        Self::new(config.timeout, config.connect_timeout)
    }

    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    fn convert_headers(headers: HashMap<String, String>) -> reqwest::header::HeaderMap {
        let mut header_map = reqwest::header::HeaderMap::new();
        for (key, value) in headers {
            if let (Ok(name), Ok(mut val)) = (
                reqwest::header::HeaderName::from_bytes(key.as_bytes()),
                reqwest::header::HeaderValue::from_str(&value),
            ) {
                val.set_sensitive(is_credential_header(&key));
                header_map.insert(name, val);
            } else {
                tracing::warn!(header = %key, "Dropping header with invalid name or value");
            }
        }
        header_map
    }

    fn extract_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = Self::convert_method(request.method);
        let headers = Self::convert_headers(request.headers);

        let mut req_builder = self.client
            .request(method, &request.url)
            .headers(headers);

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    // The URL carries the API key as a query parameter.
                    TransportError::Connection(e.without_url().to_string())
                }
            })?;

        let status = response.status().as_u16();
        let response_headers = Self::extract_headers(response.headers());
        let body = response.bytes().await
            .map_err(|e| TransportError::Request(format!("Failed to read response body: {}", e.without_url())))?;

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_transport_creation() {
        let transport = ReqwestTransport::new(
            Duration::from_secs(30),
            Duration::from_secs(10),
        );
        assert!(transport.is_ok());
    }

    #[test]
    fn test_invalid_headers_are_dropped() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("bad header".to_string(), "value".to_string());

        let converted = ReqwestTransport::convert_headers(headers);
        assert_eq!(converted.len(), 1);
        assert!(converted.contains_key("content-type"));
    }

    #[test]
    fn test_convert_method() {
        assert_eq!(ReqwestTransport::convert_method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(ReqwestTransport::convert_method(HttpMethod::Post), reqwest::Method::POST);
    }

    #[test]
    fn test_api_key_header_is_sensitive() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("x-goog-api-key".to_string(), "secret".to_string());

        let converted = ReqwestTransport::convert_headers(headers);

        assert!(converted["x-goog-api-key"].is_sensitive());
        assert!(!converted["content-type"].is_sensitive());
        assert!(!format!("{converted:?}").contains("secret"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let transport = ReqwestTransport::new(
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
        .unwrap();

        let result = transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: "http://127.0.0.1:9/unreachable".to_string(),
                headers: HashMap::new(),
                body: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(TransportError::Connection(_)) | Err(TransportError::Timeout)
        ));
    }
}
