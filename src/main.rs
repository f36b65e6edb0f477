//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, builds the tool registry for
//! the selected profile and runs the configured transport.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use textbook_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes first so configuration warnings are not lost
    dotenvy::dotenv().ok();
    init_logging(&std::env::var("MCP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

    // Load configuration from environment
    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!("Profile: {} - {}", config.profile, config.profile.description());

    let auth = config.security.auth();
    let server = McpServer::new(config.clone())?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport, auth);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` directives are honoured; `level` sets the default.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
