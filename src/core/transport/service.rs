//! Transport service - starts the configured transport.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;
use crate::core::security::AuthConfig;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "sse")]
use super::sse::SseTransport;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
    auth: Option<AuthConfig>,
}

impl TransportService {
    /// Create a new transport service.
    ///
    /// `auth` only applies to the SSE transport.
    pub fn new(config: TransportConfig, auth: Option<AuthConfig>) -> Self {
        Self { config, auth }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Start the transport with the given MCP server.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => {
                if self.auth.is_some() {
                    info!("Bearer auth does not apply to STDIO; ignoring token");
                }
                StdioTransport::run(server).await
            }
            #[cfg(feature = "sse")]
            TransportConfig::Sse(cfg) => SseTransport::new(cfg, self.auth).run(server).await,
        }
    }
}
