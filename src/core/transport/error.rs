//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur while starting or running a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error during transport.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Server initialization error.
    #[error("Server initialization error: {0}")]
    InitError(String),

    /// HTTP-specific error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Service error from rmcp.
    #[error("Service error: {0}")]
    ServiceError(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::InitError(msg.into())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::HttpError(msg.into())
    }
}

/// Per-request failures of the SSE gateway.
///
/// None of these touch an open stream; they are answered on the HTTP
/// request that caused them.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("session_id is required")]
    MissingSessionId,

    #[error("Invalid session ID")]
    InvalidSessionId(String),

    #[error("Could not find session")]
    UnknownSession(String),

    #[error("Could not parse message")]
    InvalidMessage(#[source] serde_json::Error),
}

#[cfg(feature = "sse")]
impl GatewayError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            Self::MissingSessionId | Self::InvalidSessionId(_) | Self::InvalidMessage(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnknownSession(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(feature = "sse")]
impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!("Gateway request failed: {:?}", self);
        (
            self.status(),
            axum::Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
