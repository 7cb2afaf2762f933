// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Startup failures. These abort initialization; nothing is retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid submission backoff \"{value}\": {source}")]
    Backoff {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures below the HTTP status level, from one POST attempt. Every
/// variant is retryable.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A 200 response whose SCT fields do not decode. Not retried.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode log ID: {0}")]
    LogId(#[source] base64::DecodeError),
    #[error("failed to decode SCT signature: {0}")]
    Signature(#[source] base64::DecodeError),
    #[error("failed to decode SCT extensions: {0}")]
    Extensions(#[source] base64::DecodeError),
}

/// Structural defects in an SCT signature field. Not retried.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("SCT signature is truncated")]
    Truncated,
    #[error("unsupported hash algorithm [{0}]")]
    UnsupportedHash(u8),
    #[error("unsupported signature algorithm [{0}]")]
    UnsupportedSignatureAlgorithm(u8),
    #[error("failed to parse SCT signature: {0}")]
    MalformedDer(String),
    #[error("trailing garbage after SCT signature")]
    TrailingGarbage,
}

/// What a `submit` call can fail with. Per-log failures name the log so a
/// multi-log submission error is attributable.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to serialize submission body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unexpected status code [{status}] from CT log [{uri}]")]
    UnexpectedStatus { uri: String, status: StatusCode },
    #[error("failed to submit certificate to CT log [{uri}] after {attempts} attempts")]
    RetriesExhausted { uri: String, attempts: u32 },
    #[error("bad SCT from CT log [{uri}]: {source}")]
    Decode {
        uri: String,
        #[source]
        source: DecodeError,
    },
    #[error("bad SCT signature from CT log [{uri}]: {source}")]
    Signature {
        uri: String,
        #[source]
        source: SignatureError,
    },
}
