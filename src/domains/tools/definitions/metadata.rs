//! Metadata discovery tool definition.
//!
//! Describes the textbook catalog: content types, how they relate, which
//! filters exist per content type, and a few typical workflows. The document
//! is a constant; the limits it lists are descriptive and nothing enforces
//! them.

use std::sync::LazyLock;

use indexmap::IndexMap;
use rmcp::model::JsonObject;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::ParamSchema;

// ============================================================================
// Document Types
// ============================================================================

/// The full metadata document returned under `data`.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataDocument {
    pub content_types: Vec<ContentType>,
    pub relationships: Vec<Relationship>,
    pub available_tools: Vec<ToolInfo>,
    pub available_filters: IndexMap<&'static str, IndexMap<&'static str, FilterSpec>>,
    pub limitations: Limitations,
    pub examples: Examples,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentType {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
    pub key_field: &'static str,
    pub display_field: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub from: &'static str,
    pub to: &'static str,
    pub relation: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub usage_scenarios: Vec<&'static str>,
}

/// A filter a content type can be narrowed by.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'static str>,
    pub description: &'static str,
    pub required: bool,
}

impl FilterSpec {
    fn choice(values: &'static [&'static str], description: &'static str) -> Self {
        Self {
            kind: "enum",
            values: Some(values),
            pattern: None,
            description,
            required: false,
        }
    }

    fn text(description: &'static str) -> Self {
        Self {
            kind: "string",
            values: None,
            pattern: None,
            description,
            required: false,
        }
    }

    fn with_pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Limitations {
    pub max_results_per_query: u32,
    pub max_concurrent_queries: u32,
    pub rate_limit: &'static str,
    pub query_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Examples {
    pub typical_workflows: Vec<Workflow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    pub scenario: &'static str,
    pub steps: Vec<&'static str>,
}

// ============================================================================
// Document Contents
// ============================================================================

const GRADES: &[&str] = &["七年級", "八年級", "九年級"];
const SUBJECTS: &[&str] = &["英語", "數學", "國文", "自然", "社會"];

/// Knowledge point codes: three capital letters followed by twelve digits.
pub const KNOWLEDGE_POINT_CODE_PATTERN: &str = r"^[A-Z]{3}\d{12}$";

static DOCUMENT: LazyLock<MetadataDocument> = LazyLock::new(build_document);

/// The catalog metadata document.
pub fn metadata_document() -> &'static MetadataDocument {
    &DOCUMENT
}

fn build_document() -> MetadataDocument {
    MetadataDocument {
        content_types: vec![
            ContentType {
                kind: "textbook",
                description: "教學手冊和教材",
                key_field: "textbook_uuid",
                display_field: "filename",
            },
            ContentType {
                kind: "knowledge_point",
                description: "知識點內容",
                key_field: "uuid",
                display_field: "knowledge_point_name",
            },
            ContentType {
                kind: "question",
                description: "練習題目",
                key_field: "question_id",
                display_field: "question_title",
            },
        ],
        relationships: vec![
            Relationship {
                from: "textbook",
                to: "knowledge_point",
                relation: "contains",
                description: "教冊包含多個知識點",
            },
            Relationship {
                from: "knowledge_point",
                to: "question",
                relation: "has_exercises",
                description: "知識點衍生出多個題目",
            },
        ],
        available_tools: vec![ToolInfo {
            name: MetadataDiscoveryTool::NAME,
            description: "了解數據庫結構、內容關係、可用過濾條件和工具集",
            usage_scenarios: vec!["首次連接時調用", "了解系統能力", "查詢可用過濾條件"],
        }],
        available_filters: IndexMap::from([
            (
                "question",
                IndexMap::from([
                    (
                        "difficulty",
                        FilterSpec::choice(&["易", "中", "難", "競賽"], "題目難易度"),
                    ),
                    (
                        "question_type",
                        FilterSpec::choice(
                            &["選擇題", "填空題", "問答題", "看圖回答"],
                            "題型分類",
                        ),
                    ),
                    ("grade", FilterSpec::choice(GRADES, "適用年級")),
                    ("subject", FilterSpec::choice(SUBJECTS, "科目")),
                    (
                        "knowledge_point_code",
                        FilterSpec::text("知識點代碼（如 JEN000000000001）")
                            .with_pattern(KNOWLEDGE_POINT_CODE_PATTERN),
                    ),
                ]),
            ),
            (
                "knowledge_point",
                IndexMap::from([
                    ("grade", FilterSpec::choice(GRADES, "適用年級")),
                    ("subject", FilterSpec::choice(SUBJECTS, "科目")),
                    ("chapter", FilterSpec::text("章節編號")),
                    ("textbook_uuid", FilterSpec::text("所屬教冊的UUID")),
                ]),
            ),
            (
                "textbook",
                IndexMap::from([
                    ("grade", FilterSpec::choice(GRADES, "適用年級")),
                    ("subject", FilterSpec::choice(SUBJECTS, "科目")),
                    ("semester", FilterSpec::choice(&["上學期", "下學期"], "學期")),
                    ("publisher", FilterSpec::choice(&["康軒", "南一", "翰林"], "出版社")),
                ]),
            ),
        ]),
        limitations: Limitations {
            max_results_per_query: 50,
            max_concurrent_queries: 5,
            rate_limit: "100 requests per minute",
            query_timeout_ms: 10_000,
        },
        examples: Examples {
            typical_workflows: vec![
                Workflow {
                    scenario: "學生詢問知識點",
                    steps: vec![
                        "1. 調用 metadata_discovery 了解系統結構",
                        "2. 使用 semantic_search 查找相關知識點",
                        "3. 使用 search_by_criteria 獲取相關題目練習",
                    ],
                },
                Workflow {
                    scenario: "教師查找特定難度題目",
                    steps: vec![
                        "1. 調用 metadata_discovery 了解可用過濾條件",
                        "2. 使用 search_by_criteria 按難度和年級篩選題目",
                    ],
                },
                Workflow {
                    scenario: "根據教材查找練習題",
                    steps: vec![
                        "1. 使用 semantic_search 或 search_by_criteria 查找教冊",
                        "2. 獲取教冊下的知識點列表",
                        "3. 使用 search_by_criteria 按知識點代碼查找相關題目",
                    ],
                },
            ],
        },
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Metadata discovery tool - the first call an agent should make.
pub struct MetadataDiscoveryTool;

impl MetadataDiscoveryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "metadata_discovery";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "獲取教材資源系統的元數據信息：數據庫結構、內容關係、可用過濾條件、工具列表、系統限制和典型使用流程。AI 必須首先調用此工具。";

    /// Execute the tool logic. Takes no arguments.
    #[instrument(skip_all)]
    pub fn execute(_arguments: &JsonObject) -> Result<Value, ToolError> {
        info!("Metadata discovery requested");
        let data = serde_json::to_value(metadata_document())
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        Ok(json!({ "success": true, "data": data }))
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            ParamSchema::empty(),
            Self::execute,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
