//! # Provider Modules
//!
//! Secret store clients for Google Cloud Secret Manager and AWS Secrets Manager.
//!
//! Each client implements [`SecretSource`]: given the manifest name and one
//! logical key, it fetches that key's secret from the store. Clients are built
//! per generation run by [`connect`] and dropped when the run ends.

use crate::crd::{SourceKind, SourceSelector};
use crate::error::SourceError;
use async_trait::async_trait;

// Common utilities shared across providers
pub mod common;

// Provider implementations
pub mod aws;
pub mod gcp;

pub use common::{remote_secret_id, sanitize_key_name, SecretValue};

/// Read access to a cloud secret store
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Which store this client reads
    fn kind(&self) -> SourceKind;

    /// Name the store knows the secret for `key` by
    fn remote_name(&self, manifest_name: &str, key: &str) -> String;

    /// Fetch the current value of the secret for `key`
    async fn fetch(&self, manifest_name: &str, key: &str) -> Result<SecretValue, SourceError>;
}

/// Build the client for a validated source
///
/// # Errors
/// Returns [`SourceError::Connect`] if the client or its credentials cannot be set up
pub async fn connect(selector: &SourceSelector) -> Result<Box<dyn SecretSource>, SourceError> {
    match selector {
        SourceSelector::Gcp { project_id } => {
            let source = gcp::GcpSecretSource::new(project_id.clone()).await?;
            Ok(Box::new(source))
        }
        SourceSelector::Aws { region } => {
            let source = aws::AwsSecretSource::new(region.clone()).await;
            Ok(Box::new(source))
        }
    }
}
