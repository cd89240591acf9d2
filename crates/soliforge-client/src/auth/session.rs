/*
[INPUT]:  Access tokens from login or from a persisted session
[OUTPUT]: Shared bearer-token state for authenticated requests
[POS]:    Auth layer - explicit auth context handed to the HTTP client
[UPDATE]: When token lifecycle or expiry handling changes
*/

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use super::claims::decode_claims;

/// Stored token data with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Build a token record, reading `sub`/`exp` from the JWT when possible
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let claims = decode_claims(&access_token).ok();
        Self {
            subject: claims.as_ref().and_then(|c| c.subject.clone()),
            expires_at: claims.and_then(|c| c.expires_at),
            access_token,
            token_type: token_type.into(),
        }
    }

    /// A bearer token with no further metadata
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new(access_token, "bearer")
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// Thread-safe auth context shared by the client and the views that own it
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    data: Arc<RwLock<Option<SessionToken>>>,
}

impl AuthContext {
    /// Create an empty (signed-out) context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that already holds a token
    pub fn with_token(token: SessionToken) -> Self {
        let context = Self::new();
        context.set_token(token);
        context
    }

    /// Install a new token
    pub fn set_token(&self, token: SessionToken) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token);
    }

    /// Get the current access token if available
    pub fn access_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|data| data.access_token.clone())
    }

    /// Get token data if available
    pub fn token(&self) -> Option<SessionToken> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// True when a token is held and its known expiry has not passed
    pub fn is_authenticated(&self) -> bool {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => !token.is_expired_at(Utc::now()),
            None => false,
        }
    }

    /// Clear the stored token
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::make_test_jwt;

    #[test]
    fn test_new_context_is_signed_out() {
        let context = AuthContext::new();
        assert!(context.access_token().is_none());
        assert!(!context.is_authenticated());
    }

    #[test]
    fn test_set_and_clear_token() {
        let context = AuthContext::new();
        context.set_token(SessionToken::bearer("opaque"));
        assert_eq!(context.access_token(), Some("opaque".to_string()));
        assert!(context.is_authenticated());

        context.clear();
        assert!(context.access_token().is_none());
        assert!(!context.is_authenticated());
    }

    #[test]
    fn test_clones_share_state() {
        let context = AuthContext::new();
        let view_handle = context.clone();
        context.set_token(SessionToken::bearer("shared"));
        assert_eq!(view_handle.access_token(), Some("shared".to_string()));
        view_handle.clear();
        assert!(context.access_token().is_none());
    }

    #[test]
    fn test_expired_jwt_is_not_authenticated() {
        let expired = make_test_jwt("alice", 1_000);
        let context = AuthContext::with_token(SessionToken::bearer(expired));
        assert!(!context.is_authenticated());

        let fresh = make_test_jwt("alice", 4_000_000_000);
        let token = SessionToken::bearer(fresh);
        assert_eq!(token.subject.as_deref(), Some("alice"));
        context.set_token(token);
        assert!(context.is_authenticated());
    }
}
