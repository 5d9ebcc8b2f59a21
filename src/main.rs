//! # Cloud Secret Generator
//!
//! Kustomize generator that builds a Secret from GCP Secret Manager or AWS
//! Secrets Manager.
//!
//! ## Usage
//!
//! ```bash
//! # Exec plugin: config file as the argument, Secret on stdout
//! cloud-secret-generator ./encrypted-secret.yaml
//!
//! # KRM function: ResourceList on stdin, ResourceList on stdout
//! kustomize build --enable-alpha-plugins --enable-exec .
//! ```
//!
//! Logs go to stderr only; stdout carries nothing but the generated YAML.

use anyhow::{Context, Result};
use clap::Parser;
use cloud_secret_generator::krm;
use cloud_secret_generator::KustomizeSecretFactory;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    ", built ",
    env!("BUILD_DATETIME"),
    ")"
);

/// Kustomize generator for secrets stored in GCP or AWS
#[derive(Parser)]
#[command(name = "cloud-secret-generator", version = VERSION)]
#[command(about = "Kustomize generator for secrets stored in GCP Secret Manager or AWS Secrets Manager")]
struct Cli {
    /// Generator config file (exec plugin mode). Reads a ResourceList from
    /// stdin when omitted (KRM function mode).
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Must happen before any TLS client is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_existing| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloud_secret_generator=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Starting cloud-secret-generator {}", VERSION);

    let mut stdout = std::io::stdout().lock();
    match cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read generator config {}", path.display()))?;
            krm::run_exec(&content, None, &KustomizeSecretFactory, &mut stdout)
                .await
                .with_context(|| format!("Generation failed for {}", path.display()))?;
            info!("Generated Secret from {}", path.display());
        }
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read ResourceList from stdin")?;
            krm::run_function(&input, None, &KustomizeSecretFactory, &mut stdout).await?;
        }
    }
    Ok(())
}
