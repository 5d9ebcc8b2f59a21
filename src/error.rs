//! # Errors
//!
//! Typed errors for every stage of secret generation.
//!
//! - [`ConfigError`] - the generator configuration is unusable; raised before
//!   any secret store is contacted
//! - [`SourceError`] - a secret store could not be reached, a lookup failed, or
//!   a binary payload could not be decoded
//! - [`ManifestError`] - the manifest factory rejected the assembled input
//!
//! [`GeneratorError`] unifies them without adding text of its own, so the
//! message a user sees is always the message of the stage that failed.

use crate::crd::SourceKind;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse generator config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no source configured, use 'GCP' or 'AWS'")]
    MissingSource,

    #[error("unsupported source '{found}', use 'GCP' or 'AWS'")]
    UnsupportedSource { found: String },

    #[error("source {source_kind} requires '{field}' to be set")]
    MissingLocator {
        source_kind: SourceKind,
        field: &'static str,
    },

    #[error("metadata.name is required")]
    MissingName,

    #[error("unsupported behavior '{found}', use 'create', 'replace' or 'merge'")]
    InvalidBehavior { found: String },

    #[error("ResourceList has no functionConfig")]
    MissingFunctionConfig,
}

/// Secret store errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to initialise {provider} client: {message}")]
    Connect {
        provider: SourceKind,
        message: String,
    },

    #[error("trouble retrieving secret: {secret_name}: {message}")]
    Fetch {
        provider: SourceKind,
        secret_name: String,
        message: String,
    },

    #[error("failed to decode payload of secret {secret_name}")]
    Decode {
        secret_name: String,
        #[source]
        source: base64::DecodeError,
    },
}

impl SourceError {
    /// Remote name of the secret this error concerns, if any
    #[must_use]
    pub fn secret_name(&self) -> Option<&str> {
        match self {
            SourceError::Fetch { secret_name, .. }
            | SourceError::Decode { secret_name, .. } => Some(secret_name),
            SourceError::Connect { .. } => None,
        }
    }
}

/// Errors raised while building the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("secret name must not be empty")]
    MissingName,

    #[error("'{key}' is not a valid secret data key: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("cannot add key '{key}', another key by that name already exists")]
    DuplicateKey { key: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Any failure of a generation run
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to render output")]
    Render(#[source] serde_yaml::Error),

    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

impl GeneratorError {
    /// True when the error was raised before any secret store was contacted
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, GeneratorError::Config(_))
    }
}
