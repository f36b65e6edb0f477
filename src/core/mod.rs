//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, bearer-token auth, the server
//! handler, and the transport layer.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{AuthConfig, AuthError};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportError, TransportService};
