//! Common test utilities for integration tests
//!
//! Provides shared initialization code, including rustls crypto provider setup.

use std::sync::Once;

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Must run before any client that uses rustls is built. Safe to call from
/// every test.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

/// Strip the trailing slash from a mock server URL
#[allow(dead_code, reason = "not every test binary uses every helper")]
pub fn base_url(url: &impl ToString) -> String {
    let mut base_url = url.to_string();
    if base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
