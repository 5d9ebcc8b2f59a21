//! GCP Secret Manager REST Client
//!
//! Native REST implementation for the GCP Secret Manager API v1 read path.
//! Uses reqwest for HTTP requests and a bearer token for authentication.
//!
//! References:
//! - [GCP Secret Manager REST API v1](https://cloud.google.com/secret-manager/docs/reference/rest)

use crate::crd::SourceKind;
use crate::error::SourceError;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

/// Production endpoint
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Environment variable overriding the API endpoint (mock servers, private endpoints)
pub const ENDPOINT_ENV: &str = "GCP_SECRET_MANAGER_ENDPOINT";

/// Environment variable holding a ready-made OAuth2 access token
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

// ============================================================================
// Response Structures
// ============================================================================

/// Response from accessing a secret version
///
/// Returned by `GET /v1/projects/{project}/secrets/{secret}/versions/{version}:access`.
/// Empty payloads are omitted from the JSON entirely, so every field is optional.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets.versions/access
#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    #[serde(default)]
    payload: Option<SecretPayload>,
}

/// Secret payload; `data` is base64-encoded on the wire
#[derive(Debug, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: Option<String>,
}

/// GCP API error response wrapper
///
/// API Reference: https://cloud.google.com/apis/design/errors
#[derive(Debug, Deserialize)]
struct GcpErrorResponse {
    error: GcpError,
}

#[derive(Debug, Deserialize)]
struct GcpError {
    code: u16,
    message: String,
    #[serde(default)]
    status: String,
}

/// OAuth2 access token response from the GCP metadata server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// GCP Secret Manager REST client
#[derive(Clone)]
pub struct SecretManagerRest {
    http_client: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for SecretManagerRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerRest")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SecretManagerRest {
    /// Create a client from the environment.
    ///
    /// The endpoint is `GCP_SECRET_MANAGER_ENDPOINT` or the production API.
    /// The token is `GOOGLE_OAUTH_ACCESS_TOKEN` or, failing that, one issued by
    /// the metadata server (Workload Identity on GKE, the instance service
    /// account on GCE).
    ///
    /// # Errors
    /// Returns [`SourceError::Connect`] if no access token can be obtained
    pub async fn from_env() -> Result<Self, SourceError> {
        let base_url = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        if base_url != DEFAULT_ENDPOINT {
            info!("Using GCP Secret Manager endpoint {}", base_url);
        }

        let http_client = build_http_client()?;
        let access_token = get_access_token(&http_client).await?;

        Ok(Self {
            http_client,
            base_url,
            access_token,
        })
    }

    /// Create a client for an explicit endpoint and token
    ///
    /// # Errors
    /// Returns [`SourceError::Connect`] if the HTTP client cannot be built
    pub fn with_endpoint(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            http_client: build_http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Access a secret version by its fully-qualified name
    /// (`projects/{project}/secrets/{secret}/versions/{version}`) and return
    /// the raw payload bytes.
    ///
    /// # Errors
    /// Returns [`SourceError::Fetch`] for transport and API errors, and
    /// [`SourceError::Decode`] if the payload is not valid base64
    pub async fn access_secret_version(&self, version_name: &str) -> Result<Vec<u8>, SourceError> {
        let fetch_error = |message: String| SourceError::Fetch {
            provider: SourceKind::Gcp,
            secret_name: version_name.to_string(),
            message,
        };

        let url = format!("{}/v1/{}:access", self.base_url, version_name);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| fetch_error(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(fetch_error(describe_error(status, &error_text)));
        }

        let access_response: AccessSecretVersionResponse = response
            .json()
            .await
            .map_err(|e| fetch_error(format!("failed to parse secret version response: {e}")))?;

        let data = access_response
            .payload
            .and_then(|payload| payload.data)
            .unwrap_or_default();

        general_purpose::STANDARD
            .decode(data.as_bytes())
            .map_err(|source| SourceError::Decode {
                secret_name: version_name.to_string(),
                source,
            })
    }
}

fn build_http_client() -> Result<Client, SourceError> {
    // rustls is configured in Cargo.toml
    Client::builder().build().map_err(|e| SourceError::Connect {
        provider: SourceKind::Gcp,
        message: format!("failed to create HTTP client: {e}"),
    })
}

/// Render a GCP error response, falling back to the raw body
fn describe_error(status: reqwest::StatusCode, error_text: &str) -> String {
    match serde_json::from_str::<GcpErrorResponse>(error_text) {
        Ok(error_response) => format!(
            "GCP API error: {} (code: {}, status: {})",
            error_response.error.message, error_response.error.code, error_response.error.status
        ),
        Err(_) => format!("HTTP {}: {}", status.as_u16(), error_text),
    }
}

/// Get an OAuth2 access token for GCP API authentication
async fn get_access_token(http_client: &Client) -> Result<String, SourceError> {
    if let Some(token) = std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .filter(|token| !token.is_empty())
    {
        debug!("Using access token from {}", ACCESS_TOKEN_ENV);
        return Ok(token);
    }

    let connect_error = |message: String| SourceError::Connect {
        provider: SourceKind::Gcp,
        message,
    };

    let response = http_client
        .get(METADATA_TOKEN_URL)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| {
            connect_error(format!(
                "metadata server not available ({e}); run on GKE/GCE or set {ACCESS_TOKEN_ENV}"
            ))
        })?;

    if !response.status().is_success() {
        return Err(connect_error(format!(
            "metadata server returned status {}",
            response.status()
        )));
    }

    let token_response: TokenResponse = response
        .json()
        .await
        .map_err(|e| connect_error(format!("failed to parse metadata server token: {e}")))?;
    info!("Retrieved access token from metadata server");
    Ok(token_response.access_token)
}
