// src/main.rs
use clap::Parser;
use ct_submit::cert_parser;
use ct_submit::cli::Cli;
use ct_submit::config::{Config, LogEndpoint};
use ct_submit::submitter::Submitter;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate arguments
    cli.validate()?;

    // Load config file
    let mut config = Config::from_file(Path::new(&cli.config))?;

    // Apply CLI overrides
    if let Some(ref mut submission) = config.submission {
        if !cli.logs.is_empty() {
            submission.logs = cli
                .logs
                .iter()
                .map(|uri| LogEndpoint { uri: uri.clone() })
                .collect();
        }

        if let Some(retries) = cli.max_retries {
            submission.max_retries = retries;
        }

        if let Some(ref backoff) = cli.backoff {
            submission.backoff = backoff.clone();
        }
    }

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        &config.logging.level
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    tracing::info!("Starting ct-submit...");

    // Load the chain to submit
    let cert_der = cert_parser::load_certificate(Path::new(&cli.cert))?;
    let issuer_der = cert_parser::load_certificate(Path::new(&cli.issuer))?;

    match config.submission {
        Some(ref submission) => tracing::info!(
            "Submitting to {} CT logs (max retries: {}, backoff: {})",
            submission.logs.len(),
            submission.max_retries,
            submission.backoff
        ),
        None => tracing::warn!("No [submission] section in config, nothing to submit"),
    }

    let submitter = Submitter::new(config.submission, issuer_der)?;
    submitter.submit(&cert_der).await?;

    tracing::info!("Every configured CT log accepted the certificate");

    Ok(())
}
