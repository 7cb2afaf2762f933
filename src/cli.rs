// src/cli.rs
use clap::Parser;

/// ct-submit: Certificate Transparency submission client
///
/// Submit an issued certificate and its issuer to the configured CT logs
/// and validate the SCT receipt each log returns.
#[derive(Parser, Debug, Clone)]
#[command(name = "ct-submit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // ===== Input & Configuration =====
    /// Path to TOML config file
    #[arg(short = 'c', long = "config", default_value = "config.toml")]
    pub config: String,

    /// Certificate to submit (PEM or DER file)
    #[arg(long = "cert")]
    pub cert: String,

    /// Issuer certificate completing the chain (PEM or DER file)
    #[arg(long = "issuer")]
    pub issuer: String,

    // ===== Submission Overrides =====
    /// Submit to this add-chain URI instead of the configured logs (repeatable)
    #[arg(long = "log")]
    pub logs: Vec<String>,

    /// Override maximum retries per log from config
    #[arg(long = "max-retries")]
    pub max_retries: Option<u32>,

    /// Override retry backoff from config (duration string, e.g. "10s")
    #[arg(long = "backoff")]
    pub backoff: Option<String>,

    // ===== Logging =====
    /// Verbose logging (set log level to debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet logging (set log level to warn)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Validate flag combinations and return errors for invalid usage
    pub fn validate(&self) -> anyhow::Result<()> {
        // Verbose and quiet are mutually exclusive
        if self.verbose && self.quiet {
            anyhow::bail!("Cannot specify both --verbose and --quiet");
        }

        if self.logs.iter().any(|uri| uri.trim().is_empty()) {
            anyhow::bail!("--log requires a non-empty URI");
        }

        Ok(())
    }
}
