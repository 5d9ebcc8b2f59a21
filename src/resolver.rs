//! # Secret Resolver
//!
//! Fetches every configured key from one secret source and collects the values.
//!
//! Keys are fetched one at a time in the order they were declared; a key listed
//! twice is fetched once. The first failure aborts resolution and nothing is
//! returned for the keys that did succeed.

use crate::crd::SourceSelector;
use crate::error::SourceError;
use crate::provider::{self, SecretSource, SecretValue};
use std::collections::btree_map::{self, BTreeMap};
use tracing::{info, info_span, Instrument};

/// Logical key to secret value, for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSecrets(BTreeMap<String, SecretValue>);

impl ResolvedSecrets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SecretValue) {
        self.0.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SecretValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SecretValue> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ResolvedSecrets {
    type Item = (&'a String, &'a SecretValue);
    type IntoIter = btree_map::Iter<'a, String, SecretValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, SecretValue)> for ResolvedSecrets {
    fn from_iter<I: IntoIterator<Item = (K, SecretValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Resolves configured keys against the secret store picked by the config
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretResolver;

impl SecretResolver {
    /// Build the client for `selector`, then resolve `keys` through it.
    ///
    /// The client is dropped before this returns, on success and failure alike.
    ///
    /// # Errors
    /// Returns the connect error, or the first fetch error
    pub async fn resolve_from(
        &self,
        selector: &SourceSelector,
        manifest_name: &str,
        keys: &[String],
    ) -> Result<ResolvedSecrets, SourceError> {
        let source = provider::connect(selector).await?;
        self.resolve(source.as_ref(), manifest_name, keys).await
    }

    /// Fetch each key from `source`
    ///
    /// # Errors
    /// Returns the first fetch error; no partial result is produced
    pub async fn resolve(
        &self,
        source: &dyn SecretSource,
        manifest_name: &str,
        keys: &[String],
    ) -> Result<ResolvedSecrets, SourceError> {
        let span = info_span!(
            "secrets.resolve",
            provider = %source.kind(),
            manifest.name = manifest_name,
            keys = keys.len()
        );

        async move {
            let mut resolved = ResolvedSecrets::new();
            for key in keys {
                if resolved.get(key).is_some() {
                    continue;
                }
                let value = source.fetch(manifest_name, key).await?;
                resolved.insert(key.clone(), value);
            }
            info!(
                "Resolved {} secrets from {}",
                resolved.len(),
                source.kind()
            );
            Ok(resolved)
        }
        .instrument(span)
        .await
    }
}
