//! # KRM Function I/O
//!
//! Input and output documents of the two ways Kustomize runs the generator:
//!
//! - **Exec plugin**: the config file path is the only argument; the generated
//!   Secret is written to stdout as a single YAML document.
//! - **KRM function**: a `ResourceList` arrives on stdin with the config in
//!   `functionConfig`; the same list, with the Secret appended to `items`, is
//!   written back to stdout.

use crate::crd::GeneratorConfig;
use crate::error::{ConfigError, GeneratorError};
use crate::generator::SecretGenerator;
use crate::manifest::ManifestFactory;
use crate::provider::SecretSource;
use k8s_openapi::api::core::v1::Secret;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::io::Write;

pub const RESOURCE_LIST_API_VERSION: &str = "config.kubernetes.io/v1";
pub const RESOURCE_LIST_KIND: &str = "ResourceList";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_config: Option<Value>,
}

fn default_api_version() -> String {
    RESOURCE_LIST_API_VERSION.to_string()
}

fn default_kind() -> String {
    RESOURCE_LIST_KIND.to_string()
}

impl Default for ResourceList {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            items: Vec::new(),
            function_config: None,
        }
    }
}

impl ResourceList {
    /// # Errors
    /// Returns [`ConfigError::Parse`] if `content` is not a `ResourceList`
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// The generator config carried in `functionConfig`
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingFunctionConfig`] if there is none, or
    /// [`ConfigError::Parse`] if it is not a generator config
    pub fn generator_config(&self) -> Result<GeneratorConfig, ConfigError> {
        let function_config = self
            .function_config
            .clone()
            .filter(|value| !value.is_null())
            .ok_or(ConfigError::MissingFunctionConfig)?;
        Ok(serde_yaml::from_value(function_config)?)
    }

    /// Append `secret` to `items`
    ///
    /// # Errors
    /// Returns an error if the Secret cannot be represented as YAML
    pub fn push_secret(&mut self, secret: &Secret) -> Result<(), serde_yaml::Error> {
        self.items.push(serde_yaml::to_value(secret)?);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the list cannot be represented as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Render a Secret as a standalone YAML document
///
/// # Errors
/// Returns an error if the Secret cannot be represented as YAML
pub fn secret_to_yaml(secret: &Secret) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(secret)
}

/// Exec plugin mode: `content` is the generator config document.
///
/// `source` replaces the configured store when given. The Secret is written
/// to `out` only once generation has fully succeeded.
///
/// # Errors
/// Returns the first [`GeneratorError`]; nothing is written to `out` then
pub async fn run_exec<W: Write>(
    content: &str,
    source: Option<&dyn SecretSource>,
    factory: &dyn ManifestFactory,
    out: &mut W,
) -> Result<(), GeneratorError> {
    let generator = SecretGenerator::from_yaml(content)?;
    let secret = generator.generate_using(source, factory).await?;
    let output = secret_to_yaml(&secret).map_err(GeneratorError::Render)?;
    out.write_all(output.as_bytes())?;
    Ok(())
}

/// KRM function mode: `input` is a `ResourceList` carrying the generator
/// config in `functionConfig`.
///
/// The list is written back to `out` with the Secret appended to `items`,
/// and only once generation has fully succeeded.
///
/// # Errors
/// Returns the first [`GeneratorError`]; nothing is written to `out` then
pub async fn run_function<W: Write>(
    input: &str,
    source: Option<&dyn SecretSource>,
    factory: &dyn ManifestFactory,
    out: &mut W,
) -> Result<(), GeneratorError> {
    let mut list = ResourceList::from_yaml(input)?;
    let generator = SecretGenerator::from_config(&list.generator_config()?)?;
    let secret = generator.generate_using(source, factory).await?;
    list.push_secret(&secret).map_err(GeneratorError::Render)?;
    let output = list.to_yaml().map_err(GeneratorError::Render)?;
    out.write_all(output.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    const INPUT: &str = r"
apiVersion: config.kubernetes.io/v1
kind: ResourceList
items:
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: app-config
functionConfig:
  apiVersion: crd.forgecloud.com/v1
  kind: EncryptedSecret
  metadata:
    name: app-secret
  source: AWS
  awsRegion: us-east-1
  keys:
    - token
";

    fn secret() -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some("app-secret".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "token".to_string(),
                ByteString(b"abc123".to_vec()),
            )])),
            type_: Some("Opaque".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_generator_config_from_function_config() {
        let list = ResourceList::from_yaml(INPUT).unwrap();
        assert_eq!(list.items.len(), 1);
        let config = list.generator_config().unwrap();
        assert_eq!(config.metadata.name.as_deref(), Some("app-secret"));
        assert_eq!(config.aws_region.as_deref(), Some("us-east-1"));
        assert_eq!(config.keys, vec!["token"]);
    }

    #[test]
    fn test_missing_function_config() {
        let list = ResourceList::from_yaml("kind: ResourceList\nitems: []\n").unwrap();
        assert!(matches!(
            list.generator_config(),
            Err(ConfigError::MissingFunctionConfig)
        ));
    }

    #[test]
    fn test_push_secret_keeps_existing_items() {
        let mut list = ResourceList::from_yaml(INPUT).unwrap();
        list.push_secret(&secret()).unwrap();
        assert_eq!(list.items.len(), 2);

        let output = list.to_yaml().unwrap();
        let reparsed = ResourceList::from_yaml(&output).unwrap();
        assert_eq!(reparsed.items[0]["kind"].as_str(), Some("ConfigMap"));
        assert_eq!(reparsed.items[1]["kind"].as_str(), Some("Secret"));
        // base64 of "abc123"
        assert_eq!(
            reparsed.items[1]["data"]["token"].as_str(),
            Some("YWJjMTIz")
        );
    }

    #[test]
    fn test_secret_to_yaml_includes_type_meta() {
        let yaml = secret_to_yaml(&secret()).unwrap();
        assert!(yaml.contains("apiVersion: v1"));
        assert!(yaml.contains("kind: Secret"));
        assert!(yaml.contains("token: YWJjMTIz"));
    }
}
