//! Port for bearer-credential verification.
//!
//! Verifying a credential is an external capability; this port only adapts
//! its outcome into "a user, or nothing". `None` means the token did not
//! resolve to anyone — the distinction between rejecting the request and
//! proceeding anonymously belongs to the extractors composed per route.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{UserId, UserIdValidationError};

/// Errors raised by token verifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenVerifierError {
    /// The verification backend itself failed.
    #[error("token verification failed: {message}")]
    Verification { message: String },
}

impl TokenVerifierError {
    /// Create a verification error with the given message.
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
        }
    }
}

/// Port resolving a bearer token into a user identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve `token` to a user, or `None` when it is unknown or invalid.
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError>;
}

/// Fixed token→user map for development and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenVerifier {
    /// Verifier that resolves no tokens at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a verifier from `(token, user id)` pairs.
    ///
    /// Fails when a user id is invalid, including the reserved
    /// `"anonymous"` name.
    pub fn from_pairs<I, T, U>(pairs: I) -> Result<Self, UserIdValidationError>
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let mut tokens = HashMap::new();
        for (token, user) in pairs {
            tokens.insert(token.into(), UserId::new(user.into())?);
        }
        Ok(Self { tokens })
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError> {
        Ok(self.tokens.get(token).cloned())
    }
}
