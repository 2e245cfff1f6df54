//! Configuration loading, environment overrides and variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

const CONFIG_FILENAME: &str = "gatehouse.toml";

pub const ENV_DATABASE_URI: &str = "DATABASE_CONNECTION_URI";
pub const ENV_AUTH_SECRET: &str = "AUTH_SECRET";
pub const ENV_AUTH_BASE_URL: &str = "AUTH_BASE_URL";

/// Load configuration once at startup.
///
/// `gatehouse.toml` is optional; when it is missing the defaults are used.
/// Environment variables always win over the file.
pub fn load_config() -> Result<Config> {
    let config = match find_config_file() {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            load_config_from_path(&path)?
        }
        None => Config::default(),
    };

    Ok(apply_env_overrides(config, |key| env::var(key).ok()))
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Overlay environment values on top of a loaded config.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(uri) = lookup(ENV_DATABASE_URI) {
        config.database.uri = Some(uri);
    }
    if let Some(secret) = lookup(ENV_AUTH_SECRET) {
        config.auth.secret = secret;
    }
    if let Some(base_url) = lookup(ENV_AUTH_BASE_URL) {
        config.auth.base_url = base_url;
    }

    config
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Option<PathBuf> {
    let mut current = env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Gatehouse Configuration

[server]
host = "0.0.0.0"
port = 3000

# Leave the connection string empty to run without a database.
# Authentication is then disabled and pages render for a demo user.
[database]
uri = "${DATABASE_CONNECTION_URI}"

[auth]
secret = "${AUTH_SECRET:-fallback-secret}"
base_url = "${AUTH_BASE_URL:-http://localhost:3000}"
session_expires_in_secs = 604800
password_memory_kib = 19456
password_iterations = 2
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_interpolation() {
        env::set_var("GATEHOUSE_TEST_VAR", "hello");
        let content = "value = \"${GATEHOUSE_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("GATEHOUSE_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATABASE_URI, "postgres://db/app"),
            (ENV_AUTH_SECRET, "s3cret"),
        ]
        .into_iter()
        .collect();

        let config = apply_env_overrides(Config::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.database_uri(), Some("postgres://db/app"));
        assert_eq!(config.auth.secret, "s3cret");
        assert_eq!(config.auth.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let config = apply_env_overrides(Config::default(), |key| {
            (key == ENV_AUTH_SECRET).then(String::new)
        });
        assert_eq!(config.auth.secret, "fallback-secret");
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "[server]\nport = 4100\n[database]\nuri = \"${GATEHOUSE_UNSET_URI:-}\"\n",
        )
        .unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.server.port, 4100);
        assert!(!config.has_database());
    }

    #[test]
    fn test_default_content_parses() {
        let content = interpolate_env_vars(default_config_content());
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
