//! # Manifest Assembly
//!
//! Turns resolved secrets plus generator options into the arguments of a
//! Secret generator, then hands them to a [`ManifestFactory`].
//!
//! Each resolved entry becomes one [`LiteralSource`] (`key=value`). Name,
//! namespace, behavior, type and the hash-suffix switch are passed through
//! untouched; content is not validated here.

use crate::crd::{Behavior, ValidatedConfig};
use crate::error::ManifestError;
use crate::provider::SecretValue;
use crate::resolver::ResolvedSecrets;
use k8s_openapi::api::core::v1::Secret;
use std::fmt;

mod factory;

pub use factory::{KustomizeSecretFactory, BEHAVIOR_ANNOTATION, NEEDS_HASH_ANNOTATION};

/// One `key=value` literal entry
#[derive(Clone, PartialEq, Eq)]
pub struct LiteralSource {
    pub key: String,
    pub value: SecretValue,
}

impl LiteralSource {
    #[must_use]
    pub fn new(key: impl Into<String>, value: SecretValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// `key=value`, with the value rendered as text
impl fmt::Display for LiteralSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value.to_string_lossy())
    }
}

impl fmt::Debug for LiteralSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiteralSource")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Options that apply to every generated resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub disable_name_suffix_hash: bool,
}

/// Arguments for a single generated Secret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretArgs {
    pub name: String,
    pub namespace: Option<String>,
    pub behavior: Option<Behavior>,
    pub secret_type: Option<String>,
    pub literal_sources: Vec<LiteralSource>,
}

/// Builds the Secret resource from generator arguments
pub trait ManifestFactory: Send + Sync {
    /// # Errors
    /// Returns a [`ManifestError`] if the arguments cannot form a valid Secret
    fn make_secret(
        &self,
        options: &GeneratorOptions,
        args: &SecretArgs,
    ) -> Result<Secret, ManifestError>;
}

/// Package resolved secrets and the config's pass-through settings
#[must_use]
pub fn assemble(
    config: &ValidatedConfig,
    resolved: &ResolvedSecrets,
) -> (GeneratorOptions, SecretArgs) {
    let literal_sources = resolved
        .iter()
        .map(|(key, value)| LiteralSource::new(key.clone(), value.clone()))
        .collect();

    let options = GeneratorOptions {
        disable_name_suffix_hash: config.disable_name_suffix_hash,
    };
    let args = SecretArgs {
        name: config.name.clone(),
        namespace: config.namespace.clone(),
        behavior: config.behavior,
        secret_type: config.secret_type.clone(),
        literal_sources,
    };
    (options, args)
}

/// Assemble and delegate to `factory`; the factory's error is returned as is
///
/// # Errors
/// Returns whatever [`ManifestError`] the factory raises
pub fn make_manifest(
    factory: &dyn ManifestFactory,
    config: &ValidatedConfig,
    resolved: &ResolvedSecrets,
) -> Result<Secret, ManifestError> {
    let (options, args) = assemble(config, resolved);
    factory.make_secret(&options, &args)
}
