//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::api;
use crate::cli::{error, info, print_config_table, success, warn};
use crate::config::{self, Config};
use crate::context::AppContext;

/// Run the HTTP server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    if !config.has_database() {
        warn("No database configured - authentication is disabled and pages use a demo identity");
    }

    let ctx = AppContext::new(config);
    api::run_server(ctx, &host, port)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
}

/// Print the resolved configuration
pub async fn show_config() -> Result<()> {
    let config = load_config()?;
    print_config_table(&config);
    Ok(())
}

/// Attempt a database connection and report the resulting auth mode
pub async fn check_db() -> Result<()> {
    let config = load_config()?;

    if !config.has_database() {
        warn("No database connection string set - the server will run in degraded mode");
        return Ok(());
    }

    let ctx = AppContext::new(config);
    let auth = ctx.auth_service().await;

    match auth.degraded_reason() {
        None => {
            success("Database reachable - authentication is enabled");
            Ok(())
        }
        Some(reason) => {
            error(&format!("Authentication would be degraded: {}", reason));
            info(&format!(
                "Connection attempts made: {}",
                ctx.connections.attempts()
            ));
            Err(anyhow::anyhow!("database check failed"))
        }
    }
}

/// Write a default gatehouse.toml
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("gatehouse.toml");

    if config_path.exists() {
        warn("gatehouse.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created gatehouse.toml");
    info("Set DATABASE_CONNECTION_URI and AUTH_SECRET, then run 'gatehouse serve'");

    Ok(())
}

// Helper functions

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| anyhow::anyhow!("{}", e))
}
