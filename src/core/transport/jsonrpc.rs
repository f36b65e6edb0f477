//! JSON-RPC envelopes and MCP method dispatch for the SSE transport.
//!
//! A posted message is decoded into a [`JsonRpcRequest`], dispatched against
//! the server's tool registry, and the resulting [`JsonRpcResponse`] is pushed
//! onto the session's event stream. Notifications produce no response.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::McpServer;
use crate::domains::tools::{ToolError, router::to_call_tool_result};

/// Protocol revision that defines the HTTP+SSE transport.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }

    /// Error response for a failed tool invocation.
    pub fn tool_error(id: Option<Value>, error: &ToolError) -> Self {
        if error.is_client_error() {
            Self::invalid_params(id, error.to_string())
        } else {
            Self::internal_error(id, error.to_string())
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Process a JSON-RPC request and return the response, if one is due.
#[instrument(skip_all, fields(method = %request.method))]
pub fn dispatch(server: &McpServer, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    // A request without an id is a notification and is never answered.
    if request.id.is_none() {
        info!("Received notification: {}", request.method);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request),
        method if method.starts_with("notifications/") => {
            info!("Received notification with id: {}", method);
            return None;
        }
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    };

    Some(response)
}

fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": server.instructions()
    });

    JsonRpcResponse::success(request.id, result)
}

fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    JsonRpcResponse::success(request.id, json!({ "tools": server.list_tools() }))
}

fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id;
    let params = match request.params {
        Some(Value::Object(p)) => p,
        _ => return JsonRpcResponse::invalid_params(id, "Missing params"),
    };

    let name = match params.get("name").and_then(Value::as_str) {
        Some(n) => n,
        None => return JsonRpcResponse::invalid_params(id, "Missing tool name"),
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => None,
        Some(Value::Object(args)) => Some(args.clone()),
        Some(_) => return JsonRpcResponse::invalid_params(id, "Tool arguments must be an object"),
    };

    info!("Processing tools/call request: {}", name);

    let value = match server.call_tool(name, arguments) {
        Ok(value) => value,
        Err(e) => return JsonRpcResponse::tool_error(id, &e),
    };

    match to_call_tool_result(value).and_then(|result| serde_json::to_value(&result)) {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
    }
}
