//! Transport layer for the MCP server.
//!
//! This module provides two transport implementations:
//! - **SSE**: HTTP server with one event stream per session and JSON-RPC
//!   messages posted alongside it - feature: `sse`
//! - **STDIO**: Standard input/output through rmcp - feature: `stdio`
//!
//! Both dispatch into the same tool registry held by [`McpServer`].
//!
//! [`McpServer`]: crate::core::McpServer

mod config;
mod error;
mod service;

#[cfg(feature = "sse")]
pub mod jsonrpc;

#[cfg(feature = "sse")]
pub mod session;

#[cfg(feature = "sse")]
pub mod sse;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{GatewayError, TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "sse")]
pub use config::SseConfig;
