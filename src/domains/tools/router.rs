//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! The stdio transport is served by rmcp, which dispatches through a
//! `ToolRouter`. Every route here forwards to [`ToolRegistry::invoke`], so
//! both transports share one source of truth for names, schemas and handlers.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content},
};
use serde_json::Value;

use super::error::ToolError;
use super::registry::{ToolDefinition, ToolRegistry};

/// Wrap a handler result as an MCP tool result.
///
/// The value is sent both as JSON text content and as structured content.
pub fn to_call_tool_result(value: Value) -> Result<CallToolResult, serde_json::Error> {
    let text = serde_json::to_string_pretty(&value)?;
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = Some(value);
    Ok(result)
}

/// Map a tool error onto the MCP error space.
pub fn to_mcp_error(error: &ToolError) -> McpError {
    if error.is_client_error() {
        McpError::invalid_params(error.to_string(), None)
    } else {
        McpError::internal_error(error.to_string(), None)
    }
}

/// Build the tool router with every tool in the registry.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .iter()
        .fold(ToolRouter::new(), |router, definition| {
            router.with_route(create_route(registry.clone(), definition))
        })
}

fn create_route<S>(registry: Arc<ToolRegistry>, definition: &ToolDefinition) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = definition.name;
    ToolRoute::new_dyn(definition.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone();
        let registry = registry.clone();
        async move {
            let value = registry.invoke(name, args).map_err(|e| to_mcp_error(&e))?;
            to_call_tool_result(value).map_err(|e| McpError::internal_error(e.to_string(), None))
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::profiles::ServerProfile;
    use serde_json::json;

    struct TestServer {}

    fn registry(profile: ServerProfile) -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::for_profile(profile).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(registry(ServerProfile::Character));
        let tools = router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_character_info");
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = registry(ServerProfile::Textbook);
        let router: ToolRouter<TestServer> = build_tool_router(registry.clone());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry.tool_names(), router_names);
    }

    #[test]
    fn test_call_tool_result() {
        let result = to_call_tool_result(json!({ "success": true })).unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content, Some(json!({ "success": true })));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_error_mapping() {
        let unknown = to_mcp_error(&ToolError::unknown("x"));
        assert_eq!(unknown.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let failed = to_mcp_error(&ToolError::execution_failed("boom"));
        assert_eq!(failed.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}
