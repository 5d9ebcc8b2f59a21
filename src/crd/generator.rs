//! # Generator Configuration
//!
//! The declarative block Kustomize hands to the generator, and its validated form.
//!
//! # Example
//!
//! ```yaml
//! apiVersion: crd.forgecloud.com/v1
//! kind: EncryptedSecret
//! metadata:
//!   name: app-secret
//!   namespace: default
//! source: AWS
//! awsRegion: us-east-1
//! behavior: replace
//! keys:
//!   - db.pass
//!   - api/key
//! ```

use crate::crd::{Behavior, SourceKind, SourceSelector};
use crate::error::ConfigError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Generator configuration as written in the kustomization
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Identity of the generated Secret; the name also prefixes every remote secret name
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Secret store to read from: "GCP" or "AWS"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// GCP project id, required when source is GCP
    #[serde(
        default,
        rename = "gcpProjectID",
        skip_serializing_if = "Option::is_none"
    )]
    pub gcp_project_id: Option<String>,
    /// AWS region, required when source is AWS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub disable_name_suffix_hash: bool,
    /// Secret type, passed through (empty means Opaque)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    /// create, replace or merge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    /// Logical key names, in the order they are fetched
    #[serde(default)]
    pub keys: Vec<String>,
}

impl GeneratorConfig {
    /// Parse a generator config document
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the document is not a valid config
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the configuration and resolve the source selector.
    ///
    /// The source is checked first, so an unknown source is reported even when
    /// other fields are also wrong.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let kind: SourceKind = self
            .source
            .as_deref()
            .ok_or(ConfigError::MissingSource)?
            .parse()?;

        let locator = match kind {
            SourceKind::Gcp => self.gcp_project_id.as_deref(),
            SourceKind::Aws => self.aws_region.as_deref(),
        }
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingLocator {
            source_kind: kind,
            field: kind.locator_field(),
        })?
        .to_string();

        let selector = match kind {
            SourceKind::Gcp => SourceSelector::Gcp {
                project_id: locator,
            },
            SourceKind::Aws => SourceSelector::Aws { region: locator },
        };

        let name = self
            .metadata
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingName)?;

        // A key listed twice is fetched once
        let mut seen = HashSet::new();
        let keys: Vec<String> = self
            .keys
            .iter()
            .filter(|key| seen.insert(key.as_str()))
            .cloned()
            .collect();

        let behavior = self
            .behavior
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(str::parse::<Behavior>)
            .transpose()?;

        Ok(ValidatedConfig {
            selector,
            name,
            namespace: self.metadata.namespace.clone().filter(|ns| !ns.is_empty()),
            keys,
            behavior,
            secret_type: self.secret_type.clone().filter(|t| !t.is_empty()),
            disable_name_suffix_hash: self.disable_name_suffix_hash,
        })
    }
}

/// A configuration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub selector: SourceSelector,
    pub name: String,
    pub namespace: Option<String>,
    pub keys: Vec<String>,
    pub behavior: Option<Behavior>,
    pub secret_type: Option<String>,
    pub disable_name_suffix_hash: bool,
}
