//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur while registering or invoking tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A supplied argument does not satisfy the tool's parameter schema.
    #[error("Invalid parameter '{parameter}': {reason}")]
    ParameterValidation { parameter: String, reason: String },

    /// The tool handler failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Create a new "duplicate tool" error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }

    /// Create a new "unknown tool" error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new parameter validation error.
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParameterValidation {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Whether the caller, not the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::ParameterValidation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::unknown("nope").to_string(),
            "Unknown tool: nope"
        );
        assert_eq!(
            ToolError::invalid_parameter("category", "expected string").to_string(),
            "Invalid parameter 'category': expected string"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(ToolError::unknown("x").is_client_error());
        assert!(ToolError::invalid_parameter("a", "b").is_client_error());
        assert!(!ToolError::execution_failed("boom").is_client_error());
        assert!(!ToolError::duplicate("x").is_client_error());
    }
}
