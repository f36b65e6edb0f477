//! Character trivia tool definition.
//!
//! Returns fixed facts about a fictional character. The `category` argument
//! selects a slice of the data; anything unrecognised gets the full record.

use rmcp::model::JsonObject;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{ParamSchema, ParamSpec};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Section of the character record to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterCategory {
    All,
    Basic,
    Powers,
    Origin,
    Weaknesses,
}

impl CharacterCategory {
    pub const VALUES: &'static [&'static str] = &["all", "basic", "powers", "origin", "weaknesses"];

    /// Parse a category, falling back to `All` for absent or unknown values.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("basic") => Self::Basic,
            Some("powers") => Self::Powers,
            Some("origin") => Self::Origin,
            Some("weaknesses") => Self::Weaknesses,
            _ => Self::All,
        }
    }
}

// ============================================================================
// Character Data
// ============================================================================

const NAME: &str = "Captain Lumen";
const POWERS: &[&str] = &[
    "Light manipulation",
    "Flight at near-light speed",
    "Hard-light constructs",
    "Photonic healing",
];
const WEAKNESSES: &[&str] = &[
    "Powers fade in total darkness",
    "Vulnerable to gravitational lensing devices",
    "Overuse causes temporary blindness",
];

fn basic_fields() -> JsonObject {
    let mut basic = JsonObject::new();
    basic.insert("name".into(), json!(NAME));
    basic.insert("real_name".into(), json!("Elena Sol"));
    basic.insert("alias".into(), json!("The Dawnbringer"));
    basic.insert("age".into(), json!(34));
    basic.insert("occupation".into(), json!("Astrophysicist"));
    basic.insert("home_city".into(), json!("Aurora Bay"));
    basic.insert("first_appearance".into(), json!("Lumen Comics #1 (1987)"));
    basic
}

fn origin() -> Value {
    json!({
        "event": "Solar flare accident at the Helios Observatory",
        "year": 1987,
        "story": "While calibrating an experimental photon collector during a solar storm, \
                  Dr. Elena Sol absorbed a concentrated burst of stellar radiation that \
                  rewrote her cells to store and emit light."
    })
}

/// Build the response for a category.
pub fn character_info(category: CharacterCategory) -> Value {
    match category {
        CharacterCategory::Basic => Value::Object(basic_fields()),
        CharacterCategory::Powers => json!({ "name": NAME, "powers": POWERS }),
        CharacterCategory::Origin => json!({ "name": NAME, "origin": origin() }),
        CharacterCategory::Weaknesses => json!({ "name": NAME, "weaknesses": WEAKNESSES }),
        CharacterCategory::All => {
            let mut all = basic_fields();
            all.insert("powers".into(), json!(POWERS));
            all.insert("origin".into(), origin());
            all.insert("weaknesses".into(), json!(WEAKNESSES));
            all.insert("catchphrase".into(), json!("Let there be light!"));
            Value::Object(all)
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Character info tool - returns static trivia about Captain Lumen.
pub struct CharacterInfoTool;

impl CharacterInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_character_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get information about the superhero Captain Lumen. \
        Use category to pick a section: all, basic, powers, origin or weaknesses (default: all).";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub fn execute(arguments: &JsonObject) -> Result<Value, ToolError> {
        let raw = arguments.get("category").and_then(Value::as_str);
        let category = CharacterCategory::from_param(raw);
        info!("Character info requested: {:?} ({:?})", category, raw);
        Ok(character_info(category))
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            ParamSchema::empty().param(
                ParamSpec::string("category", "Which section of the character record to return")
                    .one_of(CharacterCategory::VALUES)
                    .lenient()
                    .default_value(json!("all")),
            ),
            Self::execute,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolRegistry;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(CharacterInfoTool::definition()).unwrap();
        registry
    }

    fn call(category: Option<Value>) -> Result<Value, ToolError> {
        let arguments = category.map(|c| {
            let mut map = JsonObject::new();
            map.insert("category".into(), c);
            map
        });
        registry().invoke(CharacterInfoTool::NAME, arguments)
    }

    #[test]
    fn test_default_equals_all() {
        assert_eq!(call(None).unwrap(), call(Some(json!("all"))).unwrap());
    }

    #[test]
    fn test_all_is_superset_of_basic() {
        let all = call(Some(json!("all"))).unwrap();
        let basic = call(Some(json!("basic"))).unwrap();
        let all = all.as_object().unwrap();
        let basic = basic.as_object().unwrap();

        assert!(basic.keys().all(|k| all.contains_key(k)));
        assert!(all.len() > basic.len());
    }

    #[test]
    fn test_powers_shape() {
        let powers = call(Some(json!("powers"))).unwrap();
        let obj = powers.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["name", "powers"]);

        let list = obj["powers"].as_array().unwrap();
        assert!(!list.is_empty());
        assert!(list.iter().all(Value::is_string));
        assert_eq!(list[0], json!("Light manipulation"));
    }

    #[test]
    fn test_origin_and_weaknesses() {
        let origin = call(Some(json!("origin"))).unwrap();
        assert_eq!(origin["name"], json!(NAME));
        assert!(origin["origin"].is_object());

        let weaknesses = call(Some(json!("weaknesses"))).unwrap();
        assert_eq!(weaknesses.as_object().unwrap().len(), 2);
        assert!(!weaknesses["weaknesses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_category_falls_back_to_all() {
        let bogus = call(Some(json!("bogus"))).unwrap();
        assert_eq!(bogus, call(Some(json!("all"))).unwrap());
    }

    #[test]
    fn test_non_string_category_is_rejected() {
        let err = call(Some(json!(42))).unwrap_err();
        assert!(matches!(err, ToolError::ParameterValidation { .. }));
    }

    #[test]
    fn test_from_param() {
        assert_eq!(CharacterCategory::from_param(None), CharacterCategory::All);
        assert_eq!(CharacterCategory::from_param(Some("ORIGIN")), CharacterCategory::All);
        assert_eq!(
            CharacterCategory::from_param(Some("origin")),
            CharacterCategory::Origin
        );
    }
}
