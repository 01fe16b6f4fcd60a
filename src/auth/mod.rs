//! API key placement and credential redaction for translation requests.
//!
//! The Gemini endpoint accepts the key either as the `key` query parameter
//! or in the `x-goog-api-key` header. Whichever placement is configured,
//! the key must never reach logs, so this module also owns the helpers that
//! mask it in URLs and mark the header as sensitive.

use std::collections::HashMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::{AuthMethod, TranslatorConfig};

/// Header carrying the API key when [`AuthMethod::Header`] is configured.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Query parameter carrying the API key when [`AuthMethod::QueryParam`] is configured.
pub const API_KEY_QUERY_PARAM: &str = "key";

const REDACTED: &str = "REDACTED";

/// Attaches credentials to an outgoing request.
pub trait AuthManager: Send + Sync {
    /// Adds the credential to the request URL or headers.
    ///
    /// Called once per request, after the URL has been joined and before the
    /// request is handed to the executor.
    fn authorize(&self, url: &mut Url, headers: &mut HashMap<String, String>);
}

/// Places a Gemini API key according to the configured [`AuthMethod`].
pub struct ApiKeyAuthManager {
    api_key: SecretString,
    placement: AuthMethod,
}

impl ApiKeyAuthManager {
    /// Create a manager for the given key and placement.
    pub fn new(api_key: SecretString, placement: AuthMethod) -> Self {
        Self { api_key, placement }
    }

    /// Create a manager from a translator configuration.
    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(config.api_key.clone(), config.auth_method)
    }

    /// Where the key is placed on outgoing requests.
    pub fn placement(&self) -> AuthMethod {
        self.placement
    }
}

impl fmt::Debug for ApiKeyAuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuthManager")
            .field("api_key", &"<redacted>")
            .field("placement", &self.placement)
            .finish()
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn authorize(&self, url: &mut Url, headers: &mut HashMap<String, String>) {
        let key = self.api_key.expose_secret();
        match self.placement {
            AuthMethod::Header => {
                headers.insert(API_KEY_HEADER.to_string(), key.clone());
            }
            AuthMethod::QueryParam => {
                // Replace rather than append so a key never appears twice.
                let kept: Vec<(String, String)> = url
                    .query_pairs()
                    .filter(|(name, _)| name != API_KEY_QUERY_PARAM)
                    .map(|(name, value)| (name.into_owned(), value.into_owned()))
                    .collect();
                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(kept)
                    .append_pair(API_KEY_QUERY_PARAM, key);
            }
        }
    }
}

/// Returns true for headers that carry a credential.
pub fn is_credential_header(name: &str) -> bool {
    name.eq_ignore_ascii_case(API_KEY_HEADER)
}

/// Masks the API key query parameter of a URL for logging.
///
/// Other query parameters are kept. A string that does not parse as a URL
/// loses its whole query.
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.split_once('?').map_or(url, |(path, _)| path).to_string();
    };

    if !parsed.query_pairs().any(|(name, _)| name == API_KEY_QUERY_PARAM) {
        return url.to_string();
    }

    let masked: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == API_KEY_QUERY_PARAM {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(masked);
    parsed.into()
}
