//! HTTP request builder for the Gemini API.
//!
//! This module provides the `RequestBuilder` for constructing HTTP requests
//! with proper authentication, headers, and URL formatting.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::auth::AuthManager;
use crate::error::PolyglotError;
use super::http::{HttpRequest, HttpMethod};

/// Builder for constructing HTTP requests to the Gemini API.
///
/// The `RequestBuilder` handles:
/// - URL construction with API version prefixes
/// - Authentication via the configured auth manager
/// - Request body serialization and its Content-Type header
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    api_version: String,
    auth_manager: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a new request builder.
    ///
    /// # Example
    ///
    /// ```
    /// use polyglot_chat::transport::RequestBuilder;
    /// use polyglot_chat::auth::ApiKeyAuthManager;
    /// use polyglot_chat::config::TranslatorConfig;
    /// use secrecy::SecretString;
    /// use std::sync::Arc;
    ///
    /// let config = TranslatorConfig::builder()
    ///     .api_key(SecretString::new("test-key".into()))
    ///     .build()
    ///     .unwrap();
    ///
    /// let builder = RequestBuilder::new(
    ///     config.base_url.clone(),
    ///     config.api_version.clone(),
    ///     Arc::new(ApiKeyAuthManager::from_config(&config)),
    /// );
    /// let request = builder
    ///     .build_json_post("/models/gemini-pro:generateContent", &serde_json::json!({}))
    ///     .unwrap();
    /// assert!(request.url.starts_with(
    ///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key="
    /// ));
    /// ```
    pub fn new(
        base_url: Url,
        api_version: String,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        Self {
            base_url,
            api_version,
            auth_manager,
        }
    }

    /// Builds a complete URL for the given path.
    ///
    /// Prepends the API version and joins with the base URL. Credentials are
    /// not attached here; see [`RequestBuilder::build_request`].
    pub fn build_url(&self, path: &str) -> Result<Url, PolyglotError> {
        let path = path.trim_start_matches('/');
        let full_path = format!("{}/{}", self.api_version, path);

        Ok(self.base_url.join(&full_path)?)
    }

    /// Builds an HTTP request with an optional JSON body.
    pub fn build_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
    ) -> Result<HttpRequest, PolyglotError> {
        let mut url = self.build_url(path)?;

        let mut headers = HashMap::new();

        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        self.auth_manager.authorize(&mut url, &mut headers);

        let body_bytes = match body {
            Some(body) => Some(Bytes::from(serde_json::to_vec(body)?)),
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body_bytes,
        })
    }

    /// Builds a POST request with a JSON body.
    pub fn build_json_post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<HttpRequest, PolyglotError> {
        self.build_request(HttpMethod::Post, path, Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ApiKeyAuthManager, API_KEY_HEADER};
    use crate::config::{AuthMethod, TranslatorConfig};
    use crate::mocks::MockAuthManager;
    use secrecy::SecretString;

    #[derive(Serialize)]
    struct TestBody {
        message: String,
    }

    fn create_test_builder(auth_method: AuthMethod) -> RequestBuilder {
        let config = TranslatorConfig::builder()
            .api_key(SecretString::new("test-api-key".into()))
            .auth_method(auth_method)
            .build()
            .unwrap();

        let auth_manager = ApiKeyAuthManager::from_config(&config);

        RequestBuilder::new(
            config.base_url,
            config.api_version,
            Arc::new(auth_manager),
        )
    }

    #[test]
    fn test_build_url_with_version() {
        let builder = create_test_builder(AuthMethod::Header);
        let url = builder.build_url("/models/gemini-pro:generateContent").unwrap();

        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_build_url_carries_no_credentials() {
        let builder = create_test_builder(AuthMethod::QueryParam);
        let url = builder.build_url("/models").unwrap();

        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_build_request_with_query_param_auth() {
        let builder = create_test_builder(AuthMethod::QueryParam);
        let request = builder
            .build_request::<TestBody>(HttpMethod::Get, "/models", None)
            .unwrap();

        assert!(request.url.ends_with("/v1beta/models?key=test-api-key"));
        assert!(!request.headers.contains_key(API_KEY_HEADER));
    }

    #[test]
    fn test_auth_manager_authorizes_each_request_once() {
        // Arrange
        let auth = Arc::new(MockAuthManager::new("mock-key"));
        let builder = RequestBuilder::new(
            url::Url::parse("https://example.test/").unwrap(),
            "v1beta".to_string(),
            auth.clone(),
        );
        let body = TestBody {
            message: "hi".to_string(),
        };

        // Act
        let request = builder.build_json_post("models/m:generateContent", &body).unwrap();

        // Assert
        assert_eq!(auth.authorize_count(), 1);
        assert_eq!(request.headers.get(API_KEY_HEADER).unwrap(), "mock-key");
        assert_eq!(request.url, "https://example.test/v1beta/models/m:generateContent");
    }

    #[test]
    fn test_build_url_strips_leading_slash() {
        let builder = create_test_builder(AuthMethod::Header);
        let url1 = builder.build_url("/models").unwrap();
        let url2 = builder.build_url("models").unwrap();

        assert_eq!(url1, url2);
    }

    #[test]
    fn test_build_json_post() {
        let builder = create_test_builder(AuthMethod::QueryParam);
        let body = TestBody {
            message: "test".to_string(),
        };

        let request = builder
            .build_json_post("/models/gemini-pro:generateContent", &body)
            .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
        assert!(!request.headers.contains_key(API_KEY_HEADER));
        assert_eq!(request.body.unwrap().as_ref(), br#"{"message":"test"}"#);
    }

    #[test]
    fn test_build_request_with_header_auth() {
        let builder = create_test_builder(AuthMethod::Header);
        let request = builder
            .build_request::<TestBody>(HttpMethod::Get, "/models", None)
            .unwrap();

        assert_eq!(request.headers.get(API_KEY_HEADER).unwrap(), "test-api-key");
        assert!(!request.url.contains("key="));
    }

    #[test]
    fn test_build_request_without_body() {
        let builder = create_test_builder(AuthMethod::Header);
        let request = builder
            .build_request::<TestBody>(HttpMethod::Get, "/models", None)
            .unwrap();

        assert!(!request.headers.contains_key("Content-Type"));
        assert!(request.body.is_none());
    }
}
