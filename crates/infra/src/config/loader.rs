//! Configuration loader
//!
//! Builds the client [`Config`] once at process start.
//!
//! ## Loading Strategy
//! 1. Environment variables, when `HMIS_API_BASE_URL` is set
//! 2. Otherwise a JSON or TOML file, found by probing standard locations
//!
//! Either way the endpoint registry starts from the built-in resources;
//! `endpoints` entries in a file replace or extend them. The result is
//! validated before it is returned.
//!
//! ## Environment Variables
//! - `HMIS_API_BASE_URL`: backend base URL (required)
//! - `HMIS_API_TIMEOUT_SECS`: request timeout in seconds
//! - `HMIS_API_MAX_ATTEMPTS`: attempts per request, including the first
//! - `HMIS_API_TOKEN`: static bearer token
//! - `HMIS_USER_AGENT`: user agent sent with every request
//!
//! ## File Locations
//! `hmis.{json,toml}` then `config.{json,toml}` in the working directory,
//! its parent and grandparent, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use hmis_domain::{ApiConfig, Config, EndpointRegistry, HmisError, Result};
use serde::Deserialize;

pub const ENV_BASE_URL: &str = "HMIS_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HMIS_API_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "HMIS_API_MAX_ATTEMPTS";
pub const ENV_TOKEN: &str = "HMIS_API_TOKEN";
pub const ENV_USER_AGENT: &str = "HMIS_USER_AGENT";

const CONFIG_FILE_STEMS: [&str; 2] = ["hmis", "config"];
const CONFIG_FILE_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// On-disk shape; `endpoints` are overrides, not the full registry
#[derive(Debug, Deserialize)]
struct ConfigFile {
    api: ApiConfig,
    #[serde(default)]
    endpoints: EndpointRegistry,
}

/// Load configuration from the environment, falling back to a file
///
/// The file is only consulted when `HMIS_API_BASE_URL` is unset; with it
/// set, any problem in the environment is reported as is.
///
/// # Errors
/// `HmisError::Config` if the selected source does not yield a valid
/// configuration.
pub fn load() -> Result<Config> {
    if env_optional(ENV_BASE_URL).is_none() {
        tracing::debug!("{ENV_BASE_URL} is not set, loading configuration from file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from `HMIS_*` environment variables
///
/// # Errors
/// `HmisError::Config` if `HMIS_API_BASE_URL` is missing, a numeric variable
/// does not parse, or the result fails validation.
pub fn load_from_env() -> Result<Config> {
    let mut api = ApiConfig::new(env_var(ENV_BASE_URL)?);

    if let Some(timeout) = env_parse::<u64>(ENV_TIMEOUT_SECS)? {
        api.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse::<usize>(ENV_MAX_ATTEMPTS)? {
        api.max_attempts = attempts;
    }
    api.token = env_optional(ENV_TOKEN);
    api.user_agent = env_optional(ENV_USER_AGENT);

    let config = Config::new(api);
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]).
///
/// # Errors
/// `HmisError::Config` if the file is missing, unreadable, malformed or
/// fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HmisError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HmisError::Config(format!(
                "{ENV_BASE_URL} is not set and no config file was found in the standard locations"
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HmisError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse file contents, layering endpoint overrides over the built-ins
///
/// Format is detected by extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let file: ConfigFile = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HmisError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| HmisError::Config(format!("Invalid JSON format: {e}")))?,
        _ => return Err(HmisError::Config(format!("Unsupported config format: {extension}"))),
    };

    let overrides = file.endpoints.len();
    let endpoints = EndpointRegistry::builtin().merged(file.endpoints);
    let config = Config { api: file.api, endpoints };
    config.validate()?;

    tracing::debug!(overrides, resources = config.endpoints.len(), "Endpoint registry assembled");
    Ok(config)
}

/// First existing config file among the standard locations
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    let exe_dir = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(exe_dir) = exe_dir {
        roots.push(exe_dir);
    }

    for root in &roots {
        if let Some(path) = candidates_in(root).find(|path| path.is_file()) {
            return Some(path);
        }
    }
    None
}

fn candidates_in(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    CONFIG_FILE_STEMS.iter().flat_map(move |stem| {
        CONFIG_FILE_EXTENSIONS.iter().map(move |ext| dir.join(format!("{stem}.{ext}")))
    })
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_optional(key)
        .ok_or_else(|| HmisError::Config(format!("Missing required environment variable: {key}")))
}

/// Non-blank environment variable, trimmed
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_optional(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| HmisError::Config(format!("Invalid value for {key} ('{raw}'): {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 5] =
        [ENV_BASE_URL, ENV_TIMEOUT_SECS, ENV_MAX_ATTEMPTS, ENV_TOKEN, ENV_USER_AGENT];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn env_with_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "https://his.example.org/api/v1");
        std::env::set_var(ENV_TIMEOUT_SECS, "12");
        std::env::set_var(ENV_MAX_ATTEMPTS, "5");
        std::env::set_var(ENV_TOKEN, "secret-token");
        std::env::set_var(ENV_USER_AGENT, "nurse-station/1.0");

        let config = load_from_env().expect("config from env");

        assert_eq!(config.api.base_url, "https://his.example.org/api/v1");
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.api.max_attempts, 5);
        assert_eq!(config.api.token.as_deref(), Some("secret-token"));
        assert_eq!(config.api.user_agent.as_deref(), Some("nurse-station/1.0"));
        assert_eq!(config.endpoints, EndpointRegistry::builtin());

        clear_env();
    }

    #[test]
    fn env_defaults_apply_when_optional_vars_missing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "http://localhost:8080");
        std::env::set_var(ENV_TOKEN, "   ");

        let config = load_from_env().expect("config from env");

        assert_eq!(config.api.timeout_secs, hmis_domain::constants::DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api.token, None);

        clear_env();
    }

    #[test]
    fn env_missing_base_url_is_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, HmisError::Config(ref msg) if msg.contains(ENV_BASE_URL)));
    }

    #[test]
    fn env_invalid_number_is_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "https://his.example.org");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, HmisError::Config(ref msg) if msg.contains(ENV_TIMEOUT_SECS)));

        clear_env();
    }

    #[test]
    fn load_reports_env_error_when_base_url_is_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "https://his.example.org");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let err = load().unwrap_err();
        assert!(
            matches!(err, HmisError::Config(ref msg) if msg.contains(ENV_TIMEOUT_SECS)),
            "{err:?}"
        );

        clear_env();
    }

    #[test]
    fn env_zero_timeout_fails_validation() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "https://his.example.org");
        std::env::set_var(ENV_TIMEOUT_SECS, "0");

        assert!(matches!(load_from_env(), Err(HmisError::Config(_))));

        clear_env();
    }

    #[test]
    fn file_endpoints_layer_over_builtins() {
        let toml_content = r#"
[api]
base_url = "https://his.example.org/api"
max_attempts = 1

[endpoints.users]
collection = "/staff"
item = "/staff/{id}"

[endpoints.wards]
collection = "/wards"
item = "/wards/{id}"
"#;
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).expect("config from toml");

        assert_eq!(config.api.max_attempts, 1);
        assert_eq!(config.endpoints.get("users").unwrap().collection, "/staff");
        assert!(config.endpoints.contains("wards"));
        assert!(config.endpoints.contains("admissions"));
    }

    #[test]
    fn invalid_descriptor_in_file_is_rejected() {
        let json_content = r#"{
            "api": {"base_url": "https://his.example.org"},
            "endpoints": {"beds": {"collection": "/beds", "item": "/beds/all"}}
        }"#;

        let err = parse_config(json_content, Path::new("hmis.json")).unwrap_err();
        assert!(matches!(err, HmisError::Config(ref msg) if msg.contains("beds")));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let result = parse_config("api: {}", Path::new("hmis.yaml"));
        assert!(matches!(result, Err(HmisError::Config(ref msg)) if msg.contains("yaml")));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/hmis.json")));
        assert!(matches!(result, Err(HmisError::Config(_))));
    }

    #[test]
    fn probe_order_prefers_hmis_json() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<_> = candidates_in(dir.path())
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["hmis.json", "hmis.toml", "config.json", "config.toml"]);
    }
}
