//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults. Configuration is built once at startup and passed down
//! explicitly; nothing reads the environment after that.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::security::{AuthConfig, DEFAULT_PUBLIC_PATHS};
use super::transport::TransportConfig;
use crate::domains::profiles::ServerProfile;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Which tool catalog to expose.
    pub profile: ServerProfile,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Bearer-token authentication.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Authentication configuration for the HTTP transport.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Bearer token every non-public request must present.
    /// `None` disables authentication.
    pub auth_token: Option<String>,

    /// Paths served without authentication.
    pub public_paths: Vec<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("public_paths", &self.public_paths)
            .finish()
    }
}

impl SecurityConfig {
    /// Security settings for a profile, before any overrides.
    pub fn for_profile(profile: ServerProfile) -> Self {
        Self {
            auth_token: profile.default_auth_token().map(str::to_string),
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Build the auth filter configuration, if authentication is enabled.
    pub fn auth(&self) -> Option<AuthConfig> {
        self.auth_token
            .as_ref()
            .map(|token| AuthConfig::new(token.clone(), self.public_paths.iter().cloned()))
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::for_profile(ServerProfile::default())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_profile(ServerProfile::default())
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration for a profile.
    pub fn for_profile(profile: ServerProfile) -> Self {
        Self {
            server: ServerConfig {
                name: profile.default_server_name().to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            profile,
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::for_profile(profile),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables are prefixed with `MCP_`, except `PORT` which follows the
    /// usual container convention. See `TransportConfig::from_env` for the
    /// transport variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let profile = match std::env::var("MCP_PROFILE") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}; falling back to {}", e, ServerProfile::default());
                ServerProfile::default()
            }),
            Err(_) => ServerProfile::default(),
        };

        let mut config = Self::for_profile(profile);

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(token) = std::env::var("MCP_AUTH_TOKEN") {
            if token.is_empty() {
                warn!("MCP_AUTH_TOKEN is empty; keeping the profile default");
            } else {
                config.security.auth_token = Some(token);
                info!("Auth token loaded from environment");
            }
        }

        if std::env::var("MCP_AUTH_DISABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
        {
            warn!("MCP_AUTH_DISABLED set - all endpoints are public");
            config.security.auth_token = None;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MCP_PROFILE",
        "MCP_SERVER_NAME",
        "MCP_AUTH_TOKEN",
        "MCP_AUTH_DISABLED",
        "MCP_TRANSPORT",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_textbook_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.profile, ServerProfile::Textbook);
        assert_eq!(config.server.name, "textbook-mcp-server");
        assert_eq!(config.security.auth_token.as_deref(), Some("fz-test-123456"));
        assert_eq!(config.security.public_paths, vec!["/health".to_string()]);
    }

    #[test]
    fn test_character_profile_has_no_auth() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_PROFILE", "character");
        }
        let config = Config::from_env();
        assert_eq!(config.profile, ServerProfile::Character);
        assert_eq!(config.server.name, "character-mcp-server");
        assert!(config.security.auth().is_none());
        clear_env();
    }

    #[test]
    fn test_invalid_profile_falls_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_PROFILE", "nonsense");
        }
        let config = Config::from_env();
        assert_eq!(config.profile, ServerProfile::Textbook);
        clear_env();
    }

    #[test]
    fn test_token_override_and_disable() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_AUTH_TOKEN", "secret-42");
        }
        let config = Config::from_env();
        assert_eq!(config.security.auth_token.as_deref(), Some("secret-42"));

        unsafe {
            std::env::set_var("MCP_AUTH_DISABLED", "true");
        }
        let config = Config::from_env();
        assert!(config.security.auth_token.is_none());
        clear_env();
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let security = SecurityConfig {
            auth_token: Some("super_secret_token".to_string()),
            public_paths: vec![],
        };
        let debug_str = format!("{:?}", security);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
    }

    #[test]
    fn test_auth_config_built_from_security() {
        let auth = SecurityConfig::default().auth().unwrap();
        assert!(auth.is_public("/health"));
        assert!(!auth.is_public("/"));
    }
}
