//! Security module for request authentication.
//!
//! The HTTP transport guards its routes with a static bearer token; see
//! [`auth`] for the filter rules.

pub mod auth;

#[cfg(feature = "sse")]
pub use auth::require_bearer;
pub use auth::{AuthConfig, AuthError, DEFAULT_PUBLIC_PATHS};
