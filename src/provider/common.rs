//! # Common Provider Utilities
//!
//! Shared helpers used by both secret store clients: key sanitizing, remote
//! secret naming, the secret value type, and span bookkeeping for fetches.

use std::borrow::Cow;
use std::fmt;
use std::time::Instant;
use tracing::Span;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Replace every `.` and `/` in a logical key with `_`.
///
/// Secret stores do not accept these characters (or treat them specially) in
/// secret names, so both providers look keys up by their sanitized form.
#[must_use]
pub fn sanitize_key_name(key: &str) -> String {
    key.replace(['.', '/'], "_")
}

/// Remote secret id for a key: `{manifest_name}_{sanitized_key}`
#[must_use]
pub fn remote_secret_id(manifest_name: &str, key: &str) -> String {
    format!("{}_{}", manifest_name, sanitize_key_name(key))
}

/// A fetched secret value.
///
/// Held as raw bytes: text secrets and decoded binary payloads look the same.
/// The buffer is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue(Vec<u8>);

impl SecretValue {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Text form of the value; invalid UTF-8 is replaced
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue(<{} bytes redacted>)", self.0.len())
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<Vec<u8>> for SecretValue {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// Records the outcome of a single fetch on its span
#[derive(Debug)]
pub struct FetchTracker {
    start: Instant,
    span: Span,
}

impl FetchTracker {
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            start: Instant::now(),
            span,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Fetch durations never approach u64::MAX milliseconds"
    )]
    fn record_duration(&self) {
        self.span
            .record("operation.duration_ms", self.start.elapsed().as_millis() as u64);
    }

    pub fn record_success(&self, value: &SecretValue) {
        self.span.record("operation.success", true);
        self.span.record("secret.bytes", value.len());
        self.record_duration();
    }

    pub fn record_error(&self, error_message: &str) {
        self.span.record("operation.success", false);
        self.span.record("error.message", error_message);
        self.record_duration();
    }
}
