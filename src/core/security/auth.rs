//! Bearer-token authentication for the HTTP transport.
//!
//! Every request is checked once, before routing. Paths on the public
//! allow-list pass straight through; everything else must carry
//! `Authorization: Bearer <token>` with the configured token.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

/// Paths that never require authentication.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/health"];

const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    Malformed,

    #[error("Invalid token")]
    InvalidToken,
}

/// Immutable auth filter settings.
#[derive(Clone)]
pub struct AuthConfig {
    token: Arc<str>,
    public_paths: Arc<HashSet<String>>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"[REDACTED]")
            .field("public_paths", &self.public_paths)
            .finish()
    }
}

impl AuthConfig {
    /// Create a filter expecting `token`, with the given public paths.
    pub fn new(token: impl Into<String>, public_paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            token: Arc::from(token.into()),
            public_paths: Arc::new(public_paths.into_iter().collect()),
        }
    }

    /// Create a filter with the default public paths.
    pub fn with_default_paths(token: impl Into<String>) -> Self {
        Self::new(token, DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()))
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }

    /// Decide whether a request to `path` with the given header may proceed.
    ///
    /// `header` is `None` when the header is absent. An empty header counts
    /// as absent.
    pub fn check(&self, path: &str, header: Option<&str>) -> Result<(), AuthError> {
        if self.is_public(path) {
            debug!("Public path, skipping auth: {}", path);
            return Ok(());
        }

        let header = header.filter(|h| !h.is_empty()).ok_or(AuthError::Missing)?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::Malformed)?;

        if token != &*self.token {
            return Err(AuthError::InvalidToken);
        }

        Ok(())
    }
}

#[cfg(feature = "sse")]
mod middleware {
    use axum::{
        Json,
        extract::{Request, State},
        http::{StatusCode, header::AUTHORIZATION},
        middleware::Next,
        response::{IntoResponse, Response},
    };
    use tracing::warn;

    use super::{AuthConfig, AuthError};

    impl IntoResponse for AuthError {
        fn into_response(self) -> Response {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": self.to_string() })),
            )
                .into_response()
        }
    }

    /// Axum middleware enforcing [`AuthConfig`].
    ///
    /// Install with `axum::middleware::from_fn_with_state(auth, require_bearer)`.
    pub async fn require_bearer(
        State(auth): State<AuthConfig>,
        request: Request,
        next: Next,
    ) -> Response {
        let path = request.uri().path();
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()));

        match auth.check(path, header.as_deref()) {
            Ok(()) => next.run(request).await,
            Err(e) => {
                warn!("Rejected {} {}: {}", request.method(), path, e);
                e.into_response()
            }
        }
    }
}

#[cfg(feature = "sse")]
pub use middleware::require_bearer;

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig::with_default_paths("fz-test-123456")
    }

    #[test]
    fn test_public_path_needs_no_header() {
        assert_eq!(auth().check("/health", None), Ok(()));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(auth().check("/", None), Err(AuthError::Missing));
        assert_eq!(auth().check("/", Some("")), Err(AuthError::Missing));
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(auth().check("/", Some("Basic xyz")), Err(AuthError::Malformed));
        assert_eq!(
            auth().check("/", Some("bearer fz-test-123456")),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn test_wrong_token() {
        assert_eq!(
            auth().check("/sse", Some("Bearer wrong")),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            auth().check("/sse", Some("Bearer  fz-test-123456")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_valid_token() {
        assert_eq!(auth().check("/", Some("Bearer fz-test-123456")), Ok(()));
        assert_eq!(auth().check("/messages/", Some("Bearer fz-test-123456")), Ok(()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AuthError::Missing.to_string(), "Missing Authorization header");
        assert_eq!(
            AuthError::Malformed.to_string(),
            "Invalid Authorization header format. Expected: Bearer <token>"
        );
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug_str = format!("{:?}", auth());
        assert!(!debug_str.contains("fz-test-123456"));
    }
}
