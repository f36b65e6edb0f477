//! STDIO transport implementation.
//!
//! Serves the same tool registry over stdin/stdout through rmcp. There is
//! no authentication here; the parent process owns the pipe.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - communicating via stdin/stdout ({} tool(s))",
            server.registry().len()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
