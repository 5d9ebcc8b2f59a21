//! # AWS Secrets Manager Client
//!
//! Reads secrets from AWS Secrets Manager with the official AWS Rust SDK.
//!
//! Secrets are looked up by id `{manifest_name}_{sanitized_key}` in the
//! configured region. Credentials come from the SDK's default chain
//! (environment, profile, IRSA web identity, instance metadata).

use crate::crd::SourceKind;
use crate::error::SourceError;
use crate::provider::common::{remote_secret_id, FetchTracker};
use crate::provider::{SecretSource, SecretValue};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueOutput;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use base64::{engine::general_purpose, Engine as _};
use tracing::{debug, field, info, Instrument};

/// AWS Secrets Manager secret source
pub struct AwsSecretSource {
    client: SecretsManagerClient,
    region: String,
}

impl std::fmt::Debug for AwsSecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretSource")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsSecretSource {
    /// Create a client for `region` using the SDK's default credential chain
    pub async fn new(region: String) -> Self {
        info!("Initializing AWS Secrets Manager client for region: {}", region);

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;

        Self {
            client: SecretsManagerClient::new(&sdk_config),
            region,
        }
    }

    /// Wrap an already configured SDK client
    #[must_use]
    pub fn from_client(client: SecretsManagerClient, region: String) -> Self {
        Self { client, region }
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Turn a `GetSecretValue` response into the secret value.
///
/// `SecretString` wins when present. Otherwise `SecretBinary` holds a
/// base64-encoded payload which is decoded to its raw bytes. A response with
/// neither yields an empty value.
///
/// # Errors
/// Returns [`SourceError::Decode`] if the binary payload is not valid base64
pub fn secret_value_from_output(
    secret_name: &str,
    output: &GetSecretValueOutput,
) -> Result<SecretValue, SourceError> {
    if let Some(text) = output.secret_string() {
        return Ok(SecretValue::from(text));
    }

    let binary = output.secret_binary().map_or(&[][..], |blob| blob.as_ref());
    decode_secret_binary(secret_name, binary)
}

/// Decode a base64-encoded binary secret payload
///
/// # Errors
/// Returns [`SourceError::Decode`] if `payload` is not valid base64
pub fn decode_secret_binary(secret_name: &str, payload: &[u8]) -> Result<SecretValue, SourceError> {
    general_purpose::STANDARD
        .decode(payload)
        .map(SecretValue::from)
        .map_err(|source| SourceError::Decode {
            secret_name: secret_name.to_string(),
            source,
        })
}

#[async_trait]
impl SecretSource for AwsSecretSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Aws
    }

    fn remote_name(&self, manifest_name: &str, key: &str) -> String {
        remote_secret_id(manifest_name, key)
    }

    async fn fetch(&self, manifest_name: &str, key: &str) -> Result<SecretValue, SourceError> {
        let secret_name = self.remote_name(manifest_name, key);
        let span = tracing::debug_span!(
            "aws.secret.get",
            secret.name = %secret_name,
            region = %self.region,
            operation.success = field::Empty,
            operation.duration_ms = field::Empty,
            secret.bytes = field::Empty,
            error.message = field::Empty,
        );
        let tracker = FetchTracker::new(span.clone());

        async move {
            let output = match self
                .client
                .get_secret_value()
                .secret_id(&secret_name)
                .send()
                .await
            {
                Ok(output) => output,
                Err(e) => {
                    let message = DisplayErrorContext(&e).to_string();
                    tracker.record_error(&message);
                    return Err(SourceError::Fetch {
                        provider: SourceKind::Aws,
                        secret_name,
                        message,
                    });
                }
            };

            match secret_value_from_output(&secret_name, &output) {
                Ok(value) => {
                    debug!("Fetched AWS secret: {}", secret_name);
                    tracker.record_success(&value);
                    Ok(value)
                }
                Err(e) => {
                    tracker.record_error(&e.to_string());
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::primitives::Blob;

    #[test]
    fn test_secret_string_is_used_as_is() {
        let output = GetSecretValueOutput::builder()
            .secret_string("abc123")
            .build();
        let value = secret_value_from_output("app_token", &output).unwrap();
        assert_eq!(value.as_bytes(), b"abc123");
    }

    #[test]
    fn test_secret_string_wins_over_binary() {
        let output = GetSecretValueOutput::builder()
            .secret_string("text")
            .secret_binary(Blob::new("not base64 !!"))
            .build();
        let value = secret_value_from_output("app_token", &output).unwrap();
        assert_eq!(value.as_bytes(), b"text");
    }

    #[test]
    fn test_binary_payload_is_base64_decoded() {
        let original: Vec<u8> = vec![0x00, 0x9f, 0xff, b'k', b'e', b'y'];
        let encoded = general_purpose::STANDARD.encode(&original);
        let output = GetSecretValueOutput::builder()
            .secret_binary(Blob::new(encoded.into_bytes()))
            .build();
        let value = secret_value_from_output("app_cert", &output).unwrap();
        assert_eq!(value.as_bytes(), original.as_slice());
    }

    #[test]
    fn test_malformed_binary_payload_is_a_decode_error() {
        let output = GetSecretValueOutput::builder()
            .secret_binary(Blob::new("%%%not-base64%%%"))
            .build();
        match secret_value_from_output("app_cert", &output) {
            Err(SourceError::Decode { secret_name, .. }) => assert_eq!(secret_name, "app_cert"),
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_response_yields_empty_value() {
        let output = GetSecretValueOutput::builder().build();
        assert!(secret_value_from_output("app_x", &output)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_remote_name_uses_sanitized_key() {
        let config = aws_sdk_secretsmanager::Config::builder()
            .behavior_version(aws_sdk_secretsmanager::config::BehaviorVersion::latest())
            .region(aws_sdk_secretsmanager::config::Region::new("us-east-1"))
            .build();
        let source = AwsSecretSource::from_client(
            SecretsManagerClient::from_conf(config),
            "us-east-1".to_string(),
        );
        assert_eq!(source.kind(), SourceKind::Aws);
        assert_eq!(source.region(), "us-east-1");
        assert_eq!(source.remote_name("app-secret", "db.pass"), "app-secret_db_pass");
    }
}
