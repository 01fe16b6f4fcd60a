//! User identity bootstrap.
//!
//! A session needs one stable user id. [`resolve_identity`] tries the
//! configured token first, then anonymous sign-in, and finally mints a
//! local id so the chat remains usable when the provider is unreachable.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::error::IdentityError;

/// Prefix of ids minted locally when no provider could sign the user in.
pub const LOCAL_ID_PREFIX: &str = "anon-local-";

/// Prefix of anonymous ids issued by [`LocalIdentityProvider`].
pub const ANONYMOUS_ID_PREFIX: &str = "anon-";

/// Prefix of ids derived from a sign-in token by [`LocalIdentityProvider`].
pub const TOKEN_ID_PREFIX: &str = "user-";

/// Signs users in and hands back an opaque user id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with an externally issued token.
    async fn sign_in_with_token(&self, token: &SecretString) -> Result<String, IdentityError>;

    /// Sign in without credentials.
    async fn sign_in_anonymously(&self) -> Result<String, IdentityError>;
}

/// How a [`UserIdentity`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    /// Signed in with the configured token.
    Token,
    /// Signed in anonymously through the provider.
    Anonymous,
    /// Minted locally after the provider failed.
    Local,
}

/// The signed-in user of a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Opaque, stable user id.
    pub user_id: String,
    /// How the id was obtained.
    pub kind: IdentityKind,
}

impl UserIdentity {
    /// Creates an identity.
    pub fn new(user_id: impl Into<String>, kind: IdentityKind) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
        }
    }

    /// Name shown next to this user's messages: `User-` and the first eight
    /// characters of the id.
    pub fn display_name(&self) -> String {
        let short: String = self.user_id.chars().take(8).collect();
        format!("User-{}", short)
    }
}

/// Resolves the session identity, never failing.
pub async fn resolve_identity(
    provider: &dyn IdentityProvider,
    token: Option<&SecretString>,
) -> UserIdentity {
    if let Some(token) = token {
        match provider.sign_in_with_token(token).await {
            Ok(user_id) => {
                tracing::info!(kind = "token", "Signed in");
                return UserIdentity::new(user_id, IdentityKind::Token);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token sign-in failed, falling back to anonymous sign-in");
            }
        }
    }

    match provider.sign_in_anonymously().await {
        Ok(user_id) => {
            tracing::info!(kind = "anonymous", "Signed in");
            UserIdentity::new(user_id, IdentityKind::Anonymous)
        }
        Err(e) => {
            let user_id = local_user_id();
            tracing::error!(
                error = %e,
                user_id = %user_id,
                "Anonymous sign-in failed, using a local identity"
            );
            UserIdentity::new(user_id, IdentityKind::Local)
        }
    }
}

/// `anon-local-` followed by eight hex characters.
fn local_user_id() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{}{}", LOCAL_ID_PREFIX, &simple[..8])
}

/// In-process identity provider.
///
/// Anonymous sign-in always succeeds with a fresh id. Token sign-in accepts
/// any non-blank token and maps it to the same id every time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalIdentityProvider;

impl LocalIdentityProvider {
    /// Creates a provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in_with_token(&self, token: &SecretString) -> Result<String, IdentityError> {
        let token = token.expose_secret().trim();
        if token.is_empty() {
            return Err(IdentityError::TokenRejected {
                message: "token is blank".to_string(),
            });
        }

        let digest = blake3::hash(token.as_bytes()).to_hex();
        Ok(format!("{}{}", TOKEN_ID_PREFIX, &digest.as_str()[..16]))
    }

    async fn sign_in_anonymously(&self) -> Result<String, IdentityError> {
        Ok(format!("{}{}", ANONYMOUS_ID_PREFIX, Uuid::new_v4().simple()))
    }
}
