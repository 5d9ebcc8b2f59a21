//! # Secret Generator
//!
//! One generation run: validate the config, read every key from the selected
//! secret store, and build the Secret.
//!
//! A [`SecretGenerator`] is bound to a single config and used for a single
//! invocation. Nothing is shared between instances.

use crate::crd::{GeneratorConfig, ValidatedConfig};
use crate::error::GeneratorError;
use crate::manifest::{make_manifest, ManifestFactory};
use crate::provider::SecretSource;
use crate::resolver::SecretResolver;
use k8s_openapi::api::core::v1::Secret;
use tracing::{info, info_span, Instrument};

#[derive(Debug, Clone)]
pub struct SecretGenerator {
    config: ValidatedConfig,
    resolver: SecretResolver,
}

impl SecretGenerator {
    /// Validate `config` and bind a generator to it
    ///
    /// # Errors
    /// Returns [`GeneratorError::Config`] if the config is incomplete or invalid
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            config: config.validate()?,
            resolver: SecretResolver,
        })
    }

    /// Parse a YAML config document and bind a generator to it
    ///
    /// # Errors
    /// Returns [`GeneratorError::Config`] if the document cannot be parsed or validated
    pub fn from_yaml(content: &str) -> Result<Self, GeneratorError> {
        Self::from_config(&GeneratorConfig::from_yaml(content)?)
    }

    #[must_use]
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Connect to the configured secret store and generate the Secret
    ///
    /// # Errors
    /// Returns the connect or fetch error of the store, or the factory's error
    pub async fn generate(&self, factory: &dyn ManifestFactory) -> Result<Secret, GeneratorError> {
        let span = info_span!(
            "secret.generate",
            manifest.name = %self.config.name,
            provider = %self.config.selector.kind()
        );

        async move {
            let resolved = self
                .resolver
                .resolve_from(&self.config.selector, &self.config.name, &self.config.keys)
                .await?;
            let secret = make_manifest(factory, &self.config, &resolved)?;
            info!("Generated Secret {}", self.config.name);
            Ok(secret)
        }
        .instrument(span)
        .await
    }

    /// Generate from `source` when given, otherwise from the configured store
    ///
    /// # Errors
    /// See [`Self::generate`] and [`Self::generate_with`]
    pub async fn generate_using(
        &self,
        source: Option<&dyn SecretSource>,
        factory: &dyn ManifestFactory,
    ) -> Result<Secret, GeneratorError> {
        match source {
            Some(source) => self.generate_with(source, factory).await,
            None => self.generate(factory).await,
        }
    }

    /// Generate the Secret from a caller-supplied source
    ///
    /// # Errors
    /// Returns the first fetch error of `source`, or the factory's error
    pub async fn generate_with(
        &self,
        source: &dyn SecretSource,
        factory: &dyn ManifestFactory,
    ) -> Result<Secret, GeneratorError> {
        let resolved = self
            .resolver
            .resolve(source, &self.config.name, &self.config.keys)
            .await?;
        Ok(make_manifest(factory, &self.config, &resolved)?)
    }
}
