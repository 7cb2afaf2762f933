// src/submitter.rs
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::audit::{AuditLog, TracingAudit};
use crate::cert_parser::CertInfo;
use crate::config::{LogEndpoint, SubmissionConfig};
use crate::ct_log::client::{JsonResponse, LogClient};
use crate::ct_log::types::{AddChainRequest, RawSct, Sct};
use crate::error::{ConfigError, SubmitError, TransportError};

/// Submission settings resolved once at construction.
struct SubmissionParams {
    logs: Vec<LogEndpoint>,
    max_retries: u32,
    backoff: Duration,
    issuer_der: Vec<u8>,
}

/// Outcome of a single add-chain attempt against one log.
enum Attempt {
    /// 200 with a decodable JSON body
    Accepted(RawSct),
    /// Transient failure, try again after the wait
    Retry { wait: Duration, reason: String },
    /// Give up on the whole submission
    Fatal(SubmitError),
}

/// Map one transport result onto the retry state machine.
///
/// Transport failures retry after the fixed backoff. A 408 or 503 retries
/// after the server's Retry-After value when that parses as whole seconds,
/// the fixed backoff otherwise. Any other non-200 status is terminal. A 200
/// is accepted as-is here; its body still has to survive SCT decoding and
/// the signature check.
fn classify(
    outcome: Result<JsonResponse<RawSct>, TransportError>,
    uri: &str,
    backoff: Duration,
) -> Attempt {
    match outcome {
        Err(err) => Attempt::Retry {
            wait: backoff,
            reason: err.to_string(),
        },
        Ok(response) => match response.status {
            StatusCode::OK => Attempt::Accepted(response.body),
            StatusCode::REQUEST_TIMEOUT | StatusCode::SERVICE_UNAVAILABLE => Attempt::Retry {
                wait: retry_after(&response.headers).unwrap_or(backoff),
                reason: format!("retryable status code [{}]", response.status),
            },
            status => Attempt::Fatal(SubmitError::UnexpectedStatus {
                uri: uri.to_string(),
                status,
            }),
        },
    }
}

/// The Retry-After header as a duration, when present and parseable as
/// whole seconds. HTTP-date values are not supported and fall through to
/// the configured backoff.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds: u64 = value.parse().ok()?;
    Some(Duration::from_secs(seconds))
}

/// Submits a certificate chain to every configured CT log, sequentially,
/// and validates the SCT each log returns. Stateless across calls:
/// configuration is resolved at construction and only read afterwards, so
/// one instance can serve concurrent submissions.
pub struct Submitter {
    params: Option<SubmissionParams>,
    client: LogClient,
    audit: Arc<dyn AuditLog>,
}

impl Submitter {
    /// Build a submitter from optional submission settings and the issuer
    /// certificate's DER. With no settings, `submit` is a no-op.
    pub fn new(config: Option<SubmissionConfig>, issuer_der: Vec<u8>) -> Result<Self, ConfigError> {
        Self::with_audit(config, issuer_der, Arc::new(TracingAudit))
    }

    /// Like `new`, with the audit sink supplied by the caller.
    pub fn with_audit(
        config: Option<SubmissionConfig>,
        issuer_der: Vec<u8>,
        audit: Arc<dyn AuditLog>,
    ) -> Result<Self, ConfigError> {
        let params = match config {
            Some(cfg) => {
                let backoff = humantime::parse_duration(&cfg.backoff).map_err(|source| {
                    ConfigError::Backoff {
                        value: cfg.backoff.clone(),
                        source,
                    }
                })?;

                Some(SubmissionParams {
                    logs: cfg.logs,
                    max_retries: cfg.max_retries,
                    backoff,
                    issuer_der,
                })
            }
            None => None,
        };

        Ok(Self {
            params,
            client: LogClient::new()?,
            audit,
        })
    }

    /// Submit `cert_der` plus the configured issuer to every configured log
    /// in order. The first per-log failure aborts the call; remaining logs
    /// are not attempted. No configured logs means success with no requests.
    pub async fn submit(&self, cert_der: &[u8]) -> Result<(), SubmitError> {
        let Some(params) = &self.params else {
            debug!("CT submission not configured, skipping");
            return Ok(());
        };

        let payload = AddChainRequest::new(cert_der, &params.issuer_der);
        let body = serde_json::to_vec(&payload)?;
        let info = CertInfo::from_der(cert_der);

        for log in &params.logs {
            self.submit_to_log(params, log, &body, &info).await?;
        }

        Ok(())
    }

    /// Drive the retry loop for one log until it accepts the chain, the
    /// attempt budget runs out, or a terminal failure shows up.
    async fn submit_to_log(
        &self,
        params: &SubmissionParams,
        log: &LogEndpoint,
        body: &[u8],
        info: &CertInfo,
    ) -> Result<(), SubmitError> {
        let mut retries: u32 = 0;

        let raw = loop {
            let outcome = self.client.post_json::<RawSct>(&log.uri, body).await;

            match classify(outcome, &log.uri, params.backoff) {
                Attempt::Accepted(raw) => break raw,
                Attempt::Retry { wait, reason } => {
                    self.audit.audit_err(&format!(
                        "Error submitting to CT log [{}]: {}",
                        log.uri, reason
                    ));

                    if retries >= params.max_retries {
                        self.audit.warning(&format!(
                            "Unable to submit certificate to CT log [serial: {}, uri: {}, retries: {}]",
                            info.serial_display(),
                            log.uri,
                            retries
                        ));
                        return Err(SubmitError::RetriesExhausted {
                            uri: log.uri.clone(),
                            attempts: retries + 1,
                        });
                    }

                    retries += 1;
                    debug!(
                        "Retrying {} in {:?} ({}/{})",
                        log.uri, wait, retries, params.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
                Attempt::Fatal(err) => {
                    self.audit.audit_err(&err.to_string());
                    return Err(err);
                }
            }
        };

        let sct = match Sct::decode(&raw) {
            Ok(sct) => sct,
            Err(source) => {
                let err = SubmitError::Decode {
                    uri: log.uri.clone(),
                    source,
                };
                self.audit.audit_err(&err.to_string());
                return Err(err);
            }
        };

        if let Err(source) = sct.check_signature() {
            let err = SubmitError::Signature {
                uri: log.uri.clone(),
                source,
            };
            self.audit.audit_err(&err.to_string());
            return Err(err);
        }

        if let Some(at) = sct.issued_at() {
            debug!("SCT from {} timestamped {}", log.uri, at);
        }
        self.audit.notice(&format!(
            "Submitted certificate to CT log [serial: {}, uri: {}, retries: {}]",
            info.serial_display(),
            log.uri,
            retries
        ));

        Ok(())
    }
}
