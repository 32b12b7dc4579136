//! Integration tests for configuration loading
//!
//! Loads files end to end and builds clients from them.

use std::io::Write;

use lakekeeper_client::config;
use tempfile::Builder;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "base_url": "http://lakekeeper:8181",
        "oauth": {
            "client_id": "spark",
            "client_secret": "secret",
            "token_url": "http://keycloak/realms/iceberg/protocol/openid-connect/token",
            "scopes": ["lakekeeper"]
        },
        "retry": {"enabled": false},
        "timeout_secs": 30
    }"#;

    let mut temp_file = Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf())).expect("config");
    assert_eq!(config.base_url, "http://lakekeeper:8181");
    assert_eq!(config.oauth.as_ref().map(|o| o.client_id.as_str()), Some("spark"));
    assert!(!config.retry.enabled);
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.timeout_secs, Some(30));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    temp_file.write_all(b"base_url = ").expect("Failed to write to temp file");

    let err = config::load_from_file(Some(temp_file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Invalid TOML format"));
}

#[tokio::test]
async fn test_client_from_toml_file_uses_token_and_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/management/v1/whoami"))
        .and(header("authorization", "Bearer from-file"))
        .and(header("user-agent", "lake-ops/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "oidc~ops",
            "name": "ops",
            "user-type": "application",
            "created-at": "2025-01-10T08:00:00Z",
            "last-updated-with": "create-endpoint"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut temp_file = Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    writeln!(
        temp_file,
        "base_url = \"{}\"\ntoken = \"from-file\"\nuser_agent = \"lake-ops/2.0\"",
        server.uri()
    )
    .expect("Failed to write to temp file");

    let client = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("config")
        .connect()
        .await
        .expect("client");
    let (user, _) = client.user().whoami(&[]).await.expect("whoami");
    assert_eq!(user.name, "ops");
}
