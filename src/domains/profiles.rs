//! Server profiles.
//!
//! A profile decides which tools get registered and what the root info page
//! tells a human visitor. The two profiles share everything else.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which tool catalog the server exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerProfile {
    /// Textbook catalog metadata, bearer-token protected by default.
    #[default]
    Textbook,
    /// Character trivia, open by default.
    Character,
}

/// Token the textbook profile expects when none is configured.
pub const DEFAULT_TEXTBOOK_TOKEN: &str = "fz-test-123456";

impl ServerProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Textbook => "textbook",
            Self::Character => "character",
        }
    }

    /// Default server name reported to clients.
    pub fn default_server_name(self) -> &'static str {
        match self {
            Self::Textbook => "textbook-mcp-server",
            Self::Character => "character-mcp-server",
        }
    }

    /// Bearer token required when no override is configured.
    pub fn default_auth_token(self) -> Option<&'static str> {
        match self {
            Self::Textbook => Some(DEFAULT_TEXTBOOK_TOKEN),
            Self::Character => None,
        }
    }

    /// Human-readable description for the root page.
    pub fn description(self) -> &'static str {
        match self {
            Self::Textbook => "教材資源 MCP 服務器，提供教材、知識點、練習題目的查詢功能",
            Self::Character => "Demo MCP server that answers trivia about the superhero Captain Lumen",
        }
    }

    /// Instructions sent in the MCP `initialize` response.
    pub fn instructions(self) -> &'static str {
        match self {
            Self::Textbook => {
                "Textbook catalog server. Call metadata_discovery first to learn the \
                 content types, their relationships and the available filters."
            }
            Self::Character => {
                "Character trivia server. Call get_character_info with an optional \
                 category (all, basic, powers, origin, weaknesses)."
            }
        }
    }

    /// Numbered walkthrough for the root page.
    pub fn usage(self) -> IndexMap<String, &'static str> {
        let steps: &[&str] = match self {
            Self::Textbook => &[
                "使用 GET /sse 建立 SSE 连接",
                "从 SSE 事件中获取 endpoint URL",
                "首先調用 metadata_discovery 了解系統結構",
            ],
            Self::Character => &[
                "Open GET /sse to establish the SSE connection",
                "Read the endpoint URL from the first SSE event",
                "POST a tools/call request for get_character_info to that URL",
            ],
        };

        steps
            .iter()
            .enumerate()
            .map(|(i, step)| (format!("step{}", i + 1), *step))
            .collect()
    }
}

impl fmt::Display for ServerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "textbook" => Ok(Self::Textbook),
            "character" => Ok(Self::Character),
            other => Err(format!("unknown profile: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("textbook".parse::<ServerProfile>(), Ok(ServerProfile::Textbook));
        assert_eq!(" Character ".parse::<ServerProfile>(), Ok(ServerProfile::Character));
        assert!("trivia".parse::<ServerProfile>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ServerProfile::default(), ServerProfile::Textbook);
        assert_eq!(
            ServerProfile::Textbook.default_auth_token(),
            Some("fz-test-123456")
        );
        assert_eq!(ServerProfile::Character.default_auth_token(), None);
    }

    #[test]
    fn test_usage_steps_numbered() {
        let usage = ServerProfile::Textbook.usage();
        let keys: Vec<_> = usage.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["step1", "step2", "step3"]);
    }
}
