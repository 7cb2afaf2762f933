// src/config.rs

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct LogEndpoint {
    pub uri: String,  // Full add-chain URI for the log
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    #[serde(default)]
    pub logs: Vec<LogEndpoint>,  // Submitted to in listed order
    #[serde(default)]
    pub max_retries: u32,
    pub backoff: String,  // Duration string, parsed by the submitter at startup
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub submission: Option<SubmissionConfig>,  // Absent section disables submission
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
