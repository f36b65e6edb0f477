//! MCP Server implementation.
//!
//! [`McpServer`] owns the configuration and the tool registry for the
//! process. The SSE gateway calls [`McpServer::call_tool`] directly; the
//! STDIO transport goes through rmcp's `ServerHandler`, whose `ToolRouter`
//! is built from the same registry.

use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    model::{Implementation, JsonObject, ServerCapabilities, ServerInfo},
    tool_handler,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error;
use crate::domains::profiles::ServerProfile;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Every tool this server exposes.
    registry: Arc<ToolRegistry>,

    /// Tool router for rmcp-served transports.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails if the profile's tool list cannot be registered.
    pub fn new(config: Config) -> error::Result<Self> {
        let registry = Arc::new(ToolRegistry::for_profile(config.profile)?);
        info!(
            "Registered {} tool(s) for profile {}: {}",
            registry.len(),
            config.profile,
            registry.tool_names().join(", ")
        );

        Ok(Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            registry,
            config: Arc::new(config),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn profile(&self) -> ServerProfile {
        self.config.profile
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Instructions returned from `initialize`.
    pub fn instructions(&self) -> &'static str {
        self.config.profile.instructions()
    }

    /// List all available tools (for the SSE transport).
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry
            .get_all_tools()
            .into_iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for the SSE transport).
    #[instrument(skip(self, arguments))]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<Value, ToolError> {
        self.registry.invoke(name, arguments)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
