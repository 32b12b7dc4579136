//! Configuration loader
//!
//! Loads a [`ClientConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `LAKEKEEPER_BASE_URL` is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LAKEKEEPER_BASE_URL`: Server URL (required)
//! - `LAKEKEEPER_TOKEN`: Static bearer token
//! - `LAKEKEEPER_CLIENT_ID`, `LAKEKEEPER_CLIENT_SECRET`, `LAKEKEEPER_TOKEN_URL`:
//!   OAuth2 client credentials; all three or none
//! - `LAKEKEEPER_SCOPES`: Space or comma separated OAuth2 scopes
//! - `LAKEKEEPER_USER_AGENT`: `User-Agent` override
//! - `LAKEKEEPER_BOOTSTRAP`: Bootstrap the server on connect (true/false)
//! - `LAKEKEEPER_MAX_RETRIES`: Retries after the first attempt
//!
//! ## File Locations
//! The loader probes `lakekeeper.{toml,json}` then `config.{toml,json}` in
//! the current directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};

use super::{ClientConfig, OAuthConfig};
use crate::errors::ClientError;

type Result<T> = std::result::Result<T, ClientError>;

const FILE_NAMES: [&str; 4] = ["lakekeeper.toml", "lakekeeper.json", "config.toml", "config.json"];

/// Load configuration from the environment, else from the first file found
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `LAKEKEEPER_*` variables
///
/// # Errors
/// Returns `ClientError::Config` if `LAKEKEEPER_BASE_URL` is missing, the
/// OAuth variables are only partially set, or a number does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var("LAKEKEEPER_BASE_URL")?);
    config.token = std::env::var("LAKEKEEPER_TOKEN").ok().filter(|t| !t.is_empty());
    config.user_agent = std::env::var("LAKEKEEPER_USER_AGENT").ok().filter(|ua| !ua.is_empty());
    config.initial_bootstrap = env_bool("LAKEKEEPER_BOOTSTRAP", false);

    let client_id = std::env::var("LAKEKEEPER_CLIENT_ID").ok();
    let client_secret = std::env::var("LAKEKEEPER_CLIENT_SECRET").ok();
    let token_url = std::env::var("LAKEKEEPER_TOKEN_URL").ok();
    config.oauth = match (client_id, client_secret, token_url) {
        (Some(client_id), Some(client_secret), Some(token_url)) => Some(OAuthConfig {
            client_id,
            client_secret,
            token_url,
            scopes: std::env::var("LAKEKEEPER_SCOPES")
                .map(|s| {
                    s.split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|scope| !scope.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }),
        (None, None, None) => None,
        _ => {
            return Err(ClientError::Config(
                "LAKEKEEPER_CLIENT_ID, LAKEKEEPER_CLIENT_SECRET and LAKEKEEPER_TOKEN_URL must be set together"
                    .to_string(),
            ))
        }
    };

    if let Ok(value) = std::env::var("LAKEKEEPER_MAX_RETRIES") {
        config.retry.max_retries = value
            .parse::<u32>()
            .map_err(|e| ClientError::Config(format!("Invalid max retries: {}", e)))?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format follows
/// the extension (`.toml` or `.json`).
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClientError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ClientError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClientError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ClientError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClientError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ClientError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ClientError::Config(format!("Missing required environment variable: {}", key)))
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 9] = [
        "LAKEKEEPER_BASE_URL",
        "LAKEKEEPER_TOKEN",
        "LAKEKEEPER_CLIENT_ID",
        "LAKEKEEPER_CLIENT_SECRET",
        "LAKEKEEPER_TOKEN_URL",
        "LAKEKEEPER_SCOPES",
        "LAKEKEEPER_USER_AGENT",
        "LAKEKEEPER_BOOTSTRAP",
        "LAKEKEEPER_MAX_RETRIES",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("LAKEKEEPER_TEST_BOOL_ON", "ON");
        std::env::set_var("LAKEKEEPER_TEST_BOOL_NO", "no");
        assert!(env_bool("LAKEKEEPER_TEST_BOOL_ON", false));
        assert!(!env_bool("LAKEKEEPER_TEST_BOOL_NO", true));
        assert!(env_bool("LAKEKEEPER_TEST_BOOL_MISSING", true));

        std::env::remove_var("LAKEKEEPER_TEST_BOOL_ON");
        std::env::remove_var("LAKEKEEPER_TEST_BOOL_NO");
    }

    #[test]
    fn test_load_from_env_with_oauth() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAKEKEEPER_BASE_URL", "http://lakekeeper:8181");
        std::env::set_var("LAKEKEEPER_CLIENT_ID", "spark");
        std::env::set_var("LAKEKEEPER_CLIENT_SECRET", "secret");
        std::env::set_var("LAKEKEEPER_TOKEN_URL", "http://idp/token");
        std::env::set_var("LAKEKEEPER_SCOPES", "lakekeeper, offline_access");
        std::env::set_var("LAKEKEEPER_BOOTSTRAP", "true");
        std::env::set_var("LAKEKEEPER_MAX_RETRIES", "2");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.base_url, "http://lakekeeper:8181");
        let oauth = config.oauth.expect("oauth settings");
        assert_eq!(oauth.scopes, vec!["lakekeeper".to_string(), "offline_access".to_string()]);
        assert!(config.initial_bootstrap);
        assert_eq!(config.retry.max_retries, 2);

        clear_env();
    }

    #[test]
    fn test_load_from_env_partial_oauth_is_rejected() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAKEKEEPER_BASE_URL", "http://lakekeeper:8181");
        std::env::set_var("LAKEKEEPER_CLIENT_ID", "spark");

        assert!(matches!(load_from_env(), Err(ClientError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("LAKEKEEPER_BASE_URL"));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAKEKEEPER_BASE_URL", "http://lakekeeper:8181");
        std::env::set_var("LAKEKEEPER_MAX_RETRIES", "many");
        assert!(matches!(load_from_env(), Err(ClientError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().expect("temp file");
        writeln!(
            file,
            r#"
base_url = "http://localhost:8181"
token = "abc"
initial_bootstrap = true

[retry]
max_retries = 1
"#
        )
        .expect("write config");

        let config = load_from_file(Some(file.path().to_path_buf())).expect("config from file");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert!(config.initial_bootstrap);
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.wait_max_ms, 400);
    }

    #[test]
    fn test_load_from_env_rejects_bad_token_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LAKEKEEPER_BASE_URL", "http://lakekeeper:8181");
        std::env::set_var("LAKEKEEPER_CLIENT_ID", "spark");
        std::env::set_var("LAKEKEEPER_CLIENT_SECRET", "secret");
        std::env::set_var("LAKEKEEPER_TOKEN_URL", "idp/token");

        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("token_url"));

        clear_env();
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_config("", Path::new("client.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/lakekeeper.toml")));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
