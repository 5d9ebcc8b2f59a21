//! Pact contract tests for GCP Secret Manager API
//!
//! These tests define the contract between the generator and the GCP Secret
//! Manager `versions/latest:access` endpoint, driving the real client against a
//! Pact mock server.

mod common;

use cloud_secret_generator::error::SourceError;
use cloud_secret_generator::provider::gcp::{GcpSecretSource, SecretManagerRest};
use cloud_secret_generator::SecretSource;
use common::{base_url, init_rustls};
use pact_consumer::prelude::*;
use serde_json::json;

fn source_for(mock_url: &str) -> GcpSecretSource {
    let client = SecretManagerRest::with_endpoint(mock_url, "test-token")
        .expect("Failed to build client");
    GcpSecretSource::from_client(client, "test-project".to_string())
}

#[tokio::test]
async fn test_gcp_access_latest_version_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("Cloud-Secret-Generator", "GCP-Secret-Manager");

    pact_builder.interaction("access the latest version of a secret", "", |mut i| {
        i.given("secret app-secret_db_pass exists with one enabled version");
        i.request
            .method("GET")
            .path("/v1/projects/test-project/secrets/app-secret_db_pass/versions/latest:access")
            .header("authorization", "Bearer test-token");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "projects/test-project/secrets/app-secret_db_pass/versions/1",
                "payload": {
                    // base64 of "s3cret"
                    "data": "czNjcmV0"
                }
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let source = source_for(&base_url(&mock_server.url()));

    let value = source
        .fetch("app-secret", "db.pass")
        .await
        .expect("Failed to fetch secret");
    assert_eq!(value.as_bytes(), b"s3cret");
}

#[tokio::test]
async fn test_gcp_access_empty_payload_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("Cloud-Secret-Generator", "GCP-Secret-Manager");

    pact_builder.interaction("access a secret version with an empty payload", "", |mut i| {
        i.given("secret app-secret_empty exists with an empty version");
        i.request
            .method("GET")
            .path("/v1/projects/test-project/secrets/app-secret_empty/versions/latest:access")
            .header("authorization", "Bearer test-token");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "projects/test-project/secrets/app-secret_empty/versions/1",
                "payload": {}
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let source = source_for(&base_url(&mock_server.url()));

    let value = source
        .fetch("app-secret", "empty")
        .await
        .expect("Failed to fetch secret");
    assert!(value.is_empty());
}

#[tokio::test]
async fn test_gcp_secret_not_found_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new("Cloud-Secret-Generator", "GCP-Secret-Manager");

    pact_builder.interaction("access a secret that does not exist", "", |mut i| {
        i.given("secret app-secret_api_key does not exist");
        i.request
            .method("GET")
            .path("/v1/projects/test-project/secrets/app-secret_api_key/versions/latest:access")
            .header("authorization", "Bearer test-token");
        i.response
            .status(404)
            .header("content-type", "application/json")
            .json_body(json!({
                "error": {
                    "code": 404,
                    "message": "Secret [projects/test-project/secrets/app-secret_api_key] not found or has no versions.",
                    "status": "NOT_FOUND"
                }
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let source = source_for(&base_url(&mock_server.url()));

    match source.fetch("app-secret", "api/key").await {
        Err(SourceError::Fetch {
            secret_name,
            message,
            ..
        }) => {
            assert_eq!(
                secret_name,
                "projects/test-project/secrets/app-secret_api_key/versions/latest"
            );
            assert!(message.contains("NOT_FOUND"), "unexpected message: {message}");
        }
        other => panic!("Expected Fetch error, got {other:?}"),
    }
}
