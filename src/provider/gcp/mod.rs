//! # GCP Secret Manager Client
//!
//! Reads secrets from Google Cloud Secret Manager.
//!
//! Each key is read from the latest version of
//! `projects/{project_id}/secrets/{manifest_name}_{sanitized_key}`; the
//! version payload bytes are the secret value.

use crate::crd::SourceKind;
use crate::error::SourceError;
use crate::provider::common::{remote_secret_id, FetchTracker};
use crate::provider::{SecretSource, SecretValue};
use async_trait::async_trait;
use tracing::{debug, field, info, Instrument};

pub mod rest;

pub use rest::SecretManagerRest;

/// Formats the latest-version resource path of a secret
#[must_use]
pub fn format_secret_version_path(project_id: &str, secret_id: &str) -> String {
    format!("projects/{project_id}/secrets/{secret_id}/versions/latest")
}

/// GCP Secret Manager secret source
#[derive(Debug)]
pub struct GcpSecretSource {
    client: SecretManagerRest,
    project_id: String,
}

impl GcpSecretSource {
    /// Create a source for `project_id`, configured from the environment
    ///
    /// # Errors
    /// Returns [`SourceError::Connect`] if no access token can be obtained
    pub async fn new(project_id: String) -> Result<Self, SourceError> {
        info!("Initializing GCP Secret Manager client for project: {}", project_id);
        let client = SecretManagerRest::from_env().await?;
        Ok(Self { client, project_id })
    }

    /// Wrap an already configured REST client
    #[must_use]
    pub fn from_client(client: SecretManagerRest, project_id: String) -> Self {
        Self { client, project_id }
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait]
impl SecretSource for GcpSecretSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Gcp
    }

    fn remote_name(&self, manifest_name: &str, key: &str) -> String {
        format_secret_version_path(&self.project_id, &remote_secret_id(manifest_name, key))
    }

    async fn fetch(&self, manifest_name: &str, key: &str) -> Result<SecretValue, SourceError> {
        let version_name = self.remote_name(manifest_name, key);
        let span = tracing::debug_span!(
            "gcp.secret.get",
            secret.name = %version_name,
            project.id = %self.project_id,
            operation.success = field::Empty,
            operation.duration_ms = field::Empty,
            secret.bytes = field::Empty,
            error.message = field::Empty,
        );
        let tracker = FetchTracker::new(span.clone());

        async move {
            match self.client.access_secret_version(&version_name).await {
                Ok(bytes) => {
                    let value = SecretValue::new(bytes);
                    debug!("Fetched GCP secret: {}", version_name);
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
