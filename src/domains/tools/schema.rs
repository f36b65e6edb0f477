//! Declared parameter schemas for tools.
//!
//! A [`ParamSchema`] is an ordered list of [`ParamSpec`]s. It serves two
//! purposes: validating incoming arguments before a handler runs, and
//! rendering the JSON Schema advertised to clients in `tools/list`.

use regex::Regex;
use rmcp::model::JsonObject;
use serde_json::{Value, json};

use super::error::ToolError;

/// JSON type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    /// JSON Schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// How values outside `allowed` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPolicy {
    /// Reject values that are not listed.
    Strict,
    /// Pass unlisted values through; the handler picks a fallback.
    Lenient,
}

/// A single declared parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamType,
    pub allowed: Option<&'static [&'static str]>,
    pub policy: EnumPolicy,
    pub pattern: Option<Regex>,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParamSpec {
    /// Declare an optional parameter of the given type.
    pub fn new(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind,
            allowed: None,
            policy: EnumPolicy::Strict,
            pattern: None,
            required: false,
            default: None,
        }
    }

    /// Declare an optional string parameter.
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamType::String, description)
    }

    /// Restrict the value to a fixed set of strings.
    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    /// Accept values outside the enum instead of rejecting them.
    pub fn lenient(mut self) -> Self {
        self.policy = EnumPolicy::Lenient;
        self
    }

    /// Require string values to match `pattern`.
    pub fn matching(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the caller omits the parameter.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn check(&self, value: &Value) -> Result<(), ToolError> {
        if !self.kind.accepts(value) {
            return Err(ToolError::invalid_parameter(
                self.name,
                format!("expected {}, got {}", self.kind.as_str(), json_type_name(value)),
            ));
        }

        if let (Some(allowed), Some(text)) = (self.allowed, value.as_str()) {
            if self.policy == EnumPolicy::Strict && !allowed.contains(&text) {
                return Err(ToolError::invalid_parameter(
                    self.name,
                    format!("'{}' is not one of: {}", text, allowed.join(", ")),
                ));
            }
        }

        if let (Some(pattern), Some(text)) = (&self.pattern, value.as_str()) {
            if !pattern.is_match(text) {
                return Err(ToolError::invalid_parameter(
                    self.name,
                    format!("'{}' does not match pattern {}", text, pattern.as_str()),
                ));
            }
        }

        Ok(())
    }

    fn to_json_schema(&self) -> Value {
        let mut property = json!({
            "type": self.kind.as_str(),
            "description": self.description,
        });
        if let Some(obj) = property.as_object_mut() {
            if let Some(allowed) = self.allowed {
                obj.insert("enum".to_string(), json!(allowed));
            }
            if let Some(pattern) = &self.pattern {
                obj.insert("pattern".to_string(), json!(pattern.as_str()));
            }
            if let Some(default) = &self.default {
                obj.insert("default".to_string(), default.clone());
            }
        }
        property
    }
}

/// Ordered list of parameters accepted by a tool.
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    params: Vec<ParamSpec>,
}

impl ParamSchema {
    /// A schema with no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Comma-separated parameter names, or `None` if there are none.
    pub fn summary(&self) -> Option<String> {
        if self.params.is_empty() {
            return None;
        }
        Some(
            self.params
                .iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Validate `arguments` and return them with defaults filled in.
    ///
    /// A JSON `null` is treated the same as an absent argument. Arguments
    /// that are not declared are passed through untouched.
    pub fn validate(&self, arguments: Option<JsonObject>) -> Result<JsonObject, ToolError> {
        let mut arguments = arguments.unwrap_or_default();

        for spec in &self.params {
            match arguments.get(spec.name) {
                Some(value) if !value.is_null() => spec.check(value)?,
                _ => {
                    if spec.required {
                        return Err(ToolError::invalid_parameter(
                            spec.name,
                            "missing required parameter",
                        ));
                    }
                    match &spec.default {
                        Some(default) => {
                            arguments.insert(spec.name.to_string(), default.clone());
                        }
                        None => {
                            arguments.remove(spec.name);
                        }
                    }
                }
            }
        }

        Ok(arguments)
    }

    /// Render as a JSON Schema object for the MCP `inputSchema` field.
    pub fn to_json_schema(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        let mut required = Vec::new();

        for spec in &self.params {
            properties.insert(spec.name.to_string(), spec.to_json_schema());
            if spec.required {
                required.push(Value::String(spec.name.to_string()));
            }
        }

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        schema
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
