//! # Kustomize Secret Factory
//!
//! Builds a `v1/Secret` the way Kustomize's `secretGenerator` would.
//!
//! Generator options that Kustomize applies after generation travel as
//! annotations on the resource:
//! - `kustomize.config.k8s.io/needs-hash: "true"` asks Kustomize to append the
//!   content hash to the name (omitted when `disableNameSuffixHash` is set)
//! - `kustomize.config.k8s.io/behavior` carries `create`, `replace` or `merge`

use crate::error::ManifestError;
use crate::manifest::{GeneratorOptions, ManifestFactory, SecretArgs};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

pub const NEEDS_HASH_ANNOTATION: &str = "kustomize.config.k8s.io/needs-hash";
pub const BEHAVIOR_ANNOTATION: &str = "kustomize.config.k8s.io/behavior";

const DEFAULT_SECRET_TYPE: &str = "Opaque";

// Kubernetes ConfigMap/Secret data key limit
const MAX_KEY_LENGTH: usize = 253;

static DATA_KEY_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[-._a-zA-Z0-9]+$"));

/// Produces Kustomize-compatible Secret resources
#[derive(Debug, Clone, Copy, Default)]
pub struct KustomizeSecretFactory;

impl KustomizeSecretFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ManifestFactory for KustomizeSecretFactory {
    fn make_secret(
        &self,
        options: &GeneratorOptions,
        args: &SecretArgs,
    ) -> Result<Secret, ManifestError> {
        if args.name.is_empty() {
            return Err(ManifestError::MissingName);
        }

        let key_regex = DATA_KEY_REGEX
            .as_ref()
            .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

        let mut data = BTreeMap::new();
        for literal in &args.literal_sources {
            validate_data_key(key_regex, &literal.key)?;
            if data.contains_key(&literal.key) {
                return Err(ManifestError::DuplicateKey {
                    key: literal.key.clone(),
                });
            }
            data.insert(
                literal.key.clone(),
                ByteString(literal.value.as_bytes().to_vec()),
            );
        }

        let mut annotations = BTreeMap::new();
        if !options.disable_name_suffix_hash {
            annotations.insert(NEEDS_HASH_ANNOTATION.to_string(), "true".to_string());
        }
        if let Some(behavior) = args.behavior {
            annotations.insert(BEHAVIOR_ANNOTATION.to_string(), behavior.to_string());
        }

        let secret_type = args
            .secret_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SECRET_TYPE);

        debug!(
            "Built Secret {} ({}) with {} keys",
            args.name,
            secret_type,
            data.len()
        );

        Ok(Secret {
            metadata: ObjectMeta {
                name: Some(args.name.clone()),
                namespace: args.namespace.clone().filter(|ns| !ns.is_empty()),
                annotations: (!annotations.is_empty()).then_some(annotations),
                ..Default::default()
            },
            data: Some(data),
            type_: Some(secret_type.to_string()),
            ..Default::default()
        })
    }
}

/// Check a key against the rules Kubernetes applies to Secret data keys
fn validate_data_key(key_regex: &Regex, key: &str) -> Result<(), ManifestError> {
    let invalid = |reason: &'static str| ManifestError::InvalidKey {
        key: key.to_string(),
        reason,
    };

    if key.len() > MAX_KEY_LENGTH {
        return Err(invalid("must be no more than 253 characters"));
    }
    if !key_regex.is_match(key) {
        return Err(invalid(
            "must consist of alphanumeric characters, '-', '_' or '.'",
        ));
    }
    if key == "." || key == ".." {
        return Err(invalid("must not be '.' or '..'"));
    }
    if key.starts_with("..") {
        return Err(invalid("must not start with '..'"));
    }
    Ok(())
}
