//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are pure functions of their arguments that clients call by name.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Declared parameters, validation and JSON Schema rendering
//! - `registry.rs` - Central tool registry and dispatch
//! - `router.rs` - rmcp ToolRouter built from the registry (stdio transport)
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with `NAME`, `DESCRIPTION`,
//!    `execute()` and `definition()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it for a profile in `ToolRegistry::for_profile`
//!
//! Both transports pick the tool up from the registry.

pub mod definitions;
mod error;
mod registry;
pub mod router;
pub mod schema;

pub use error::ToolError;
pub use registry::{ToolDefinition, ToolHandler, ToolRegistry};
pub use router::build_tool_router;
pub use schema::{EnumPolicy, ParamSchema, ParamSpec, ParamType};
