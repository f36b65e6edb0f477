//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport via rmcp.
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport with an SSE stream per session.
    #[cfg(feature = "sse")]
    Sse(SseConfig),
}

/// HTTP + SSE transport configuration.
#[cfg(feature = "sse")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path that opens an event stream.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Path that accepts posted messages.
    #[serde(default = "default_message_path")]
    pub message_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "sse")]
const DEFAULT_PORT: u16 = 3000;

#[cfg(feature = "sse")]
fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "sse")]
fn default_sse_path() -> String {
    "/sse".to_string()
}

#[cfg(feature = "sse")]
fn default_message_path() -> String {
    "/messages".to_string()
}

#[cfg(feature = "sse")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "sse")]
        {
            return Self::Sse(SseConfig::default());
        }

        #[cfg(all(not(feature = "sse"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "sse", feature = "stdio")))]
        {
            compile_error!("At least one transport feature must be enabled: sse or stdio");
        }
    }
}

#[cfg(feature = "sse")]
impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: default_host(),
            sse_path: default_sse_path(),
            message_path: default_message_path(),
            enable_cors: default_cors(),
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an SSE transport config.
    #[cfg(feature = "sse")]
    pub fn sse(port: u16, host: impl Into<String>) -> Self {
        Self::Sse(SseConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load transport config through an arbitrary variable lookup.
    ///
    /// - `MCP_TRANSPORT`: `sse` (default) or `stdio`
    /// - `PORT`: listen port (default 3000)
    /// - `MCP_HTTP_HOST`: bind address (default `0.0.0.0`)
    /// - `MCP_HTTP_CORS`: `false` or `0` disables CORS
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let transport = lookup("MCP_TRANSPORT").unwrap_or_default().to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "sse")]
            _ => {
                let port = match lookup("PORT") {
                    Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                        tracing::warn!("Invalid PORT {:?}; using {}", raw, DEFAULT_PORT);
                        DEFAULT_PORT
                    }),
                    None => DEFAULT_PORT,
                };
                let host = lookup("MCP_HTTP_HOST").unwrap_or_else(default_host);
                let enable_cors = lookup("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                Self::Sse(SseConfig {
                    port,
                    host,
                    enable_cors,
                    ..Default::default()
                })
            }
            #[cfg(not(feature = "sse"))]
            _ => Self::Stdio,
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "sse")]
            Self::Sse(cfg) => format!("HTTP+SSE on {}:{}{}", cfg.host, cfg.port, cfg.sse_path),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}

#[cfg(all(test, feature = "sse"))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn from_vars(vars: &[(&str, &str)]) -> TransportConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TransportConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn sse(config: TransportConfig) -> SseConfig {
        match config {
            TransportConfig::Sse(cfg) => cfg,
            #[allow(unreachable_patterns)]
            other => panic!("expected SSE config, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = sse(from_vars(&[]));
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.sse_path, "/sse");
        assert_eq!(cfg.message_path, "/messages");
        assert!(cfg.enable_cors);
    }

    #[test]
    fn test_port_from_env() {
        let cfg = sse(from_vars(&[("PORT", "8081")]));
        assert_eq!(cfg.port, 8081);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let cfg = sse(from_vars(&[("PORT", "eighty")]));
        assert_eq!(cfg.port, 3000);
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_invalid_port_is_logged() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();

        let cfg = tracing::subscriber::with_default(subscriber, || {
            sse(from_vars(&[("PORT", "eighty")]))
        });
        assert_eq!(cfg.port, 3000);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Invalid PORT \"eighty\"; using 3000"), "{output}");
    }

    #[test]
    fn test_cors_toggle() {
        assert!(!sse(from_vars(&[("MCP_HTTP_CORS", "false")])).enable_cors);
        assert!(!sse(from_vars(&[("MCP_HTTP_CORS", "0")])).enable_cors);
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_stdio_selected() {
        assert!(from_vars(&[("MCP_TRANSPORT", "stdio")]).is_stdio());
        assert!(!from_vars(&[("MCP_TRANSPORT", "sse")]).is_stdio());
    }

    #[test]
    fn test_description() {
        let description = TransportConfig::sse(4000, "127.0.0.1").description();
        assert_eq!(description, "HTTP+SSE on 127.0.0.1:4000/sse");
    }
}
