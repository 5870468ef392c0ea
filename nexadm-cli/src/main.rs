//! nexadm: apply a declarative manifest of Nexus administrative resources.
//!
//! Reads a YAML manifest of declared resources and converges the remote
//! instance to match, one resource at a time.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod manifest;

use manifest::Manifest;
use nexadm_client::{descriptor_for, known_kinds, ClientConfig, HttpClient, Reconciler, RetryPolicy};

/// Declarative administration for Sonatype Nexus
#[derive(Parser, Debug)]
#[command(name = "nexadm", version, about)]
struct Args {
    /// Manifest file with the declared resources
    manifest: PathBuf,

    /// Base URL of the Nexus instance
    #[arg(long, default_value = "https://localhost")]
    url: String,

    /// Administrative account name
    #[arg(long, env = "NEXUS_USERNAME")]
    username: String,

    /// Administrative account password
    #[arg(long, env = "NEXUS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Skip TLS certificate verification
    #[arg(long)]
    no_verify_tls: bool,

    /// Attempts per request when the connection fails
    #[arg(long, default_value = "3")]
    retries: u32,

    /// Seconds to sleep between connection attempts
    #[arg(long, default_value = "5")]
    retry_delay: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexadm=info,nexadm_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let manifest = Manifest::load(&args.manifest)?;
    info!(
        manifest = %args.manifest.display(),
        resources = manifest.resources.len(),
        url = %args.url,
        "applying manifest"
    );

    let config = ClientConfig::new(&args.url, &args.username, &args.password)
        .with_verify_tls(!args.no_verify_tls)
        .with_retry(RetryPolicy::new(
            args.retries,
            Duration::from_secs(args.retry_delay),
        ));
    let client = HttpClient::new(config)?;
    let reconciler = Reconciler::new(&client);

    let mut changed = 0usize;
    for entry in &manifest.resources {
        let Some(descriptor) = descriptor_for(&entry.kind) else {
            bail!(
                "unknown resource kind '{}' (known kinds: {})",
                entry.kind,
                known_kinds().join(", ")
            );
        };

        let outcome = reconciler
            .reconcile(descriptor.as_ref(), &entry.spec, entry.state.into())
            .await
            .with_context(|| format!("failed to reconcile {} resource", entry.kind))?;

        if outcome.changed {
            changed += 1;
        }
    }

    info!(
        resources = manifest.resources.len(),
        changed,
        "manifest applied"
    );
    Ok(())
}
