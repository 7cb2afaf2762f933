// src/cert_parser.rs
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

/// Details pulled from the end-entity certificate for audit messages.
///
/// Extraction is best effort: the logs get the raw DER either way, so an
/// unparsable certificate still carries a fingerprint, it just has no
/// serial to report.
#[derive(Debug, Clone)]
pub struct CertInfo {
    pub serial: Option<String>,
    pub fingerprint: String,  // SHA-256 over the DER, lowercase hex
}

impl CertInfo {
    pub fn from_der(der: &[u8]) -> Self {
        let fingerprint = hex::encode(Sha256::digest(der));
        let serial = match X509Certificate::from_der(der) {
            Ok((_, cert)) => Some(cert.raw_serial_as_string()),
            Err(_) => None,
        };

        Self { serial, fingerprint }
    }

    /// Serial for display, "unknown" when the certificate did not parse.
    pub fn serial_display(&self) -> &str {
        self.serial.as_deref().unwrap_or("unknown")
    }
}

/// Read a certificate file as DER bytes, unwrapping PEM armor if present.
pub fn load_certificate(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read certificate file {}", path.display()))?;

    if data.starts_with(b"-----BEGIN") {
        let (_, pem) = parse_x509_pem(&data)
            .map_err(|e| anyhow::anyhow!("Failed to parse PEM in {}: {:?}", path.display(), e))?;
        Ok(pem.contents)
    } else {
        Ok(data)
    }
}
