//! Integration tests for configuration loader
//!
//! Loads real files from disk and builds a transport from the result.

use std::io::Write;

use hmis_domain::{HmisError, HttpMethod};
use hmis_infra::config;
use hmis_infra::RestTransport;
use tempfile::Builder;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_load_config_from_json_file() {
    let file = write_config(
        ".json",
        r#"{
            "api": {
                "base_url": "https://his.example.org/api/v1",
                "timeout_secs": 10,
                "token": "json-token"
            },
            "endpoints": {
                "clinical-alerts": {
                    "collection": "/alerts",
                    "item": "/alerts/{id}",
                    "actions": {
                        "acknowledge": {"path": "/alerts/{id}/ack", "method": "PUT"}
                    }
                }
            }
        }"#,
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(config.api.base_url, "https://his.example.org/api/v1");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.api.token.as_deref(), Some("json-token"));

    let alerts = config.endpoints.get("clinical-alerts").unwrap();
    assert_eq!(alerts.collection, "/alerts");
    let ack = alerts.action("acknowledge").unwrap();
    assert_eq!(ack.path, "/alerts/{id}/ack");
    assert_eq!(ack.method, HttpMethod::Put);
    // The override replaces the built-in descriptor wholesale
    assert!(alerts.action("resolve").is_err());
}

#[test]
fn test_load_config_from_toml_file() {
    let file = write_config(
        ".toml",
        r#"
[api]
base_url = "http://localhost:9000"
max_attempts = 2
user_agent = "ward-kiosk/0.3"
"#,
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert_eq!(config.api.max_attempts, 2);
    assert_eq!(config.api.user_agent.as_deref(), Some("ward-kiosk/0.3"));
    assert_eq!(config.endpoints, hmis_domain::EndpointRegistry::builtin());

    let transport = RestTransport::from_config(&config.api).expect("transport from config");
    assert_eq!(transport.base_url().as_str(), "http://localhost:9000/");
}

#[test]
fn test_invalid_json_reports_config_error() {
    let file = write_config(".json", r#"{ "api": { "base_url": "#);

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, HmisError::Config(ref msg) if msg.contains("Invalid JSON")));
}

#[test]
fn test_invalid_api_section_collects_all_fields() {
    let file = write_config(
        ".toml",
        r#"
[api]
base_url = "his.example.org"
timeout_secs = 0
max_attempts = 0
"#,
    );

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();
    let HmisError::Config(message) = err else {
        panic!("expected config error, got {err:?}");
    };
    for field in ["api.base_url", "api.timeout_secs", "api.max_attempts"] {
        assert!(message.contains(field), "{field} missing from: {message}");
    }
}
