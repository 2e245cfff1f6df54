//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::config::{Config, DEFAULT_AUTH_SECRET};
use crate::database::redact_uri;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Mask a secret, keeping only enough to tell values apart
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        return "****".to_string();
    }
    let head: String = secret.chars().take(2).collect();
    format!("{}****", head)
}

/// Print the resolved configuration as a table
pub fn print_config_table(config: &Config) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    let database = match config.database_uri() {
        Some(uri) => Cell::new(redact_uri(uri)).fg(Color::Green),
        None => Cell::new("not set (databaseless mode)").fg(Color::Yellow),
    };
    let secret = if config.auth.secret == DEFAULT_AUTH_SECRET {
        Cell::new("fallback-secret (default)").fg(Color::Yellow)
    } else {
        Cell::new(mask_secret(&config.auth.secret))
    };

    table.add_row(vec![
        Cell::new("server"),
        Cell::new(format!("{}:{}", config.server.host, config.server.port)),
    ]);
    table.add_row(vec![Cell::new("database"), database]);
    table.add_row(vec![Cell::new("auth secret"), secret]);
    table.add_row(vec![Cell::new("auth base url"), Cell::new(&config.auth.base_url)]);
    table.add_row(vec![
        Cell::new("session lifetime"),
        Cell::new(format!("{}s", config.auth.session_expires_in_secs)),
    ]);

    println!("{table}");
}
