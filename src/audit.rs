// src/audit.rs
use tracing::{error, info, warn};

/// Sink for submission audit events.
///
/// The submitter reports every notable step through this trait instead of
/// logging directly, so callers can route the audit trail wherever they
/// need it and tests can capture it.
pub trait AuditLog: Send + Sync {
    /// Routine event worth keeping in the audit trail
    fn notice(&self, msg: &str);
    /// Something failed but the operation may still succeed
    fn warning(&self, msg: &str);
    /// A failure that must be visible in the audit trail
    fn audit_err(&self, msg: &str);
}

/// Default sink backed by the process-wide `tracing` subscriber.
pub struct TracingAudit;

impl AuditLog for TracingAudit {
    fn notice(&self, msg: &str) {
        info!("{}", msg);
    }

    fn warning(&self, msg: &str) {
        warn!("{}", msg);
    }

    fn audit_err(&self, msg: &str) {
        error!("{}", msg);
    }
}
