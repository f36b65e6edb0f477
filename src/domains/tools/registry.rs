//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The [`ToolDefinition`] record (name, description, schema, handler)
//! - A registry of all available tools, in registration order
//! - Dispatch with argument validation
//! - Tool metadata for listing

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::definitions::{CharacterInfoTool, MetadataDiscoveryTool};
use super::error::ToolError;
use super::schema::ParamSchema;
use crate::domains::profiles::ServerProfile;

/// Signature shared by every tool handler.
///
/// Handlers receive arguments that already passed schema validation, with
/// defaults filled in. They must not block.
pub type ToolHandler = fn(&JsonObject) -> Result<Value, ToolError>;

/// A registered tool.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: ParamSchema,
    pub handler: ToolHandler,
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    pub fn new(
        name: &'static str,
        description: &'static str,
        params: ParamSchema,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name,
            description,
            params,
            handler,
        }
    }

    /// Create a Tool model for this definition (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: Arc::new(self.params.to_json_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Short description used by the root info page.
    pub fn summary(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.params.summary(),
        })
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - owns every tool definition for the process.
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: IndexMap<&'static str, ToolDefinition>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for a server profile.
    pub fn for_profile(profile: ServerProfile) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        match profile {
            ServerProfile::Textbook => {
                registry.register(MetadataDiscoveryTool::definition())?;
            }
            ServerProfile::Character => {
                registry.register(CharacterInfoTool::definition())?;
            }
        }
        Ok(registry)
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), ToolError> {
        if self.tools.contains_key(definition.name) {
            return Err(ToolError::duplicate(definition.name));
        }
        debug!("Registered tool: {}", definition.name);
        self.tools.insert(definition.name, definition);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both the SSE gateway and the rmcp router use this listing.
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.iter().map(ToolDefinition::to_tool).collect()
    }

    /// Summaries for the root info page.
    pub fn summaries(&self) -> Vec<Value> {
        self.iter().map(ToolDefinition::summary).collect()
    }

    /// Validate `arguments` against the tool's schema and run its handler.
    pub fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> Result<Value, ToolError> {
        let Some(definition) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::unknown(name));
        };

        let arguments = definition.params.validate(arguments).inspect_err(|e| {
            warn!("Rejected arguments for {}: {}", name, e);
        })?;

        (definition.handler)(&arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::schema::ParamSpec;

    fn echo(arguments: &JsonObject) -> Result<Value, ToolError> {
        Ok(Value::Object(arguments.clone()))
    }

    fn failing(_: &JsonObject) -> Result<Value, ToolError> {
        Err(ToolError::execution_failed("boom"))
    }

    fn echo_tool(name: &'static str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            "Echo arguments back",
            ParamSchema::empty().param(ParamSpec::string("text", "Text to echo").required()),
            echo,
        )
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo")).unwrap();
        let err = registry.register(echo_tool("echo")).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(ref n) if n == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("b")).unwrap();
        registry.register(echo_tool("a")).unwrap();
        assert_eq!(registry.tool_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_invoke_unknown() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("missing", None).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }

    #[test]
    fn test_invoke_validates_before_handler() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo")).unwrap();

        let err = registry.invoke("echo", None).unwrap_err();
        assert!(matches!(err, ToolError::ParameterValidation { .. }));

        let ok = registry
            .invoke("echo", json!({ "text": "hi" }).as_object().cloned())
            .unwrap();
        assert_eq!(ok, json!({ "text": "hi" }));
    }

    #[test]
    fn test_handler_errors_propagate() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDefinition::new("fail", "Always fails", ParamSchema::empty(), failing))
            .unwrap();
        let err = registry.invoke("fail", None).unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }

    #[test]
    fn test_profile_registries() {
        let textbook = ToolRegistry::for_profile(ServerProfile::Textbook).unwrap();
        assert_eq!(textbook.tool_names(), vec!["metadata_discovery"]);

        let character = ToolRegistry::for_profile(ServerProfile::Character).unwrap();
        assert_eq!(character.tool_names(), vec!["get_character_info"]);
    }

    #[test]
    fn test_every_tool_returns_json() {
        for profile in [ServerProfile::Textbook, ServerProfile::Character] {
            let registry = ToolRegistry::for_profile(profile).unwrap();
            for name in registry.tool_names() {
                let value = registry.invoke(name, None).unwrap();
                assert!(value.is_object(), "{name} should return an object");
                assert!(serde_json::to_string(&value).is_ok());
            }
        }
    }

    #[test]
    fn test_tool_models() {
        let registry = ToolRegistry::for_profile(ServerProfile::Character).unwrap();
        let tools = registry.get_all_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_character_info");
        assert_eq!(tools[0].input_schema["type"], json!("object"));
    }

    #[test]
    fn test_summaries() {
        let registry = ToolRegistry::for_profile(ServerProfile::Textbook).unwrap();
        let summaries = registry.summaries();
        assert_eq!(summaries[0]["name"], json!("metadata_discovery"));
        assert_eq!(summaries[0]["parameters"], Value::Null);
    }
}
