//! Textbook MCP Server Library
//!
//! A Model Context Protocol server that exposes a small catalog of static
//! tools over HTTP + Server-Sent Events, guarded by a bearer token. The same
//! registry can also be served over STDIO.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, auth filter, the server
//!   handler and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **profiles**: which tool catalog a server instance exposes
//!   - **tools**: tool definitions, parameter schemas and the registry
//!
//! # Example
//!
//! ```rust,no_run
//! use textbook_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let auth = config.security.auth();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport, auth).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
