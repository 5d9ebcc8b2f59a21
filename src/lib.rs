//! Cloud Secret Generator Library
//!
//! A Kustomize generator that reads secret values from GCP Secret Manager or
//! AWS Secrets Manager and emits a Kubernetes Secret built from them.
//!
//! Each configured key `k` of a generator named `n` is read from the remote
//! secret `n_k'`, where `k'` is `k` with every `.` and `/` replaced by `_`.
//! The value is stored under the original key `k` in the generated Secret.
//!
//! ## Module Structure
//!
//! - `crd` - Generator config document and its validation
//! - `provider` - Secret store clients (GCP, AWS)
//! - `resolver` - Reads every configured key from one store
//! - `manifest` - Builds the Secret from resolved values
//! - `generator` - One end-to-end generation run
//! - `krm` - Exec plugin and KRM function documents
//! - `error` - Error types

pub mod crd;
pub mod error;
pub mod generator;
pub mod krm;
pub mod manifest;
pub mod provider;
pub mod resolver;

pub use crd::{Behavior, GeneratorConfig, SourceKind, SourceSelector, ValidatedConfig};
pub use error::{ConfigError, GeneratorError, ManifestError, SourceError};
pub use generator::SecretGenerator;
pub use manifest::{KustomizeSecretFactory, ManifestFactory};
pub use provider::{SecretSource, SecretValue};
pub use resolver::{ResolvedSecrets, SecretResolver};
