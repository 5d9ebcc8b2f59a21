//! # Source Selection
//!
//! The secret store a generator reads from, and where to find it.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Secret store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Google Cloud Secret Manager
    Gcp,
    /// AWS Secrets Manager
    Aws,
}

impl SourceKind {
    /// Value used for this source in generator configs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Gcp => "GCP",
            SourceKind::Aws => "AWS",
        }
    }

    /// Config field holding the locator for this source
    #[must_use]
    pub fn locator_field(&self) -> &'static str {
        match self {
            SourceKind::Gcp => "gcpProjectID",
            SourceKind::Aws => "awsRegion",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GCP" => Ok(SourceKind::Gcp),
            "AWS" => Ok(SourceKind::Aws),
            "" => Err(ConfigError::MissingSource),
            other => Err(ConfigError::UnsupportedSource {
                found: other.to_string(),
            }),
        }
    }
}

/// A validated source together with its locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelector {
    /// GCP project holding the secrets
    Gcp { project_id: String },
    /// AWS region holding the secrets
    Aws { region: String },
}

impl SourceSelector {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceSelector::Gcp { .. } => SourceKind::Gcp,
            SourceSelector::Aws { .. } => SourceKind::Aws,
        }
    }

    /// Project id or region
    #[must_use]
    pub fn locator(&self) -> &str {
        match self {
            SourceSelector::Gcp { project_id } => project_id,
            SourceSelector::Aws { region } => region,
        }
    }
}
