// src/ct_log/types.rs
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use x509_parser::der_parser::ber::BerObjectContent;
use x509_parser::der_parser::der::parse_der_sequence;

use crate::error::{DecodeError, SignatureError};

/// TLS HashAlgorithm registry value for SHA-256
pub const HASH_ALG_SHA256: u8 = 4;
/// TLS SignatureAlgorithm registry value for ECDSA
pub const SIG_ALG_ECDSA: u8 = 3;

/// Body of an RFC 6962 add-chain request: the chain to submit, end-entity
/// certificate first, each element base64-encoded DER.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddChainRequest {
    pub chain: Vec<String>,
}

impl AddChainRequest {
    /// Build the two-element chain from an end-entity certificate and its
    /// issuer.
    pub fn new(cert_der: &[u8], issuer_der: &[u8]) -> Self {
        Self {
            chain: vec![BASE64.encode(cert_der), BASE64.encode(issuer_der)],
        }
    }
}

/// Add-chain response as it appears on the wire. Logs are not trusted to
/// fill every field; anything absent decodes to its zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSct {
    #[serde(default)]
    pub sct_version: u8,
    #[serde(default)]
    pub id: String,  // Base64 log ID
    #[serde(default)]
    pub timestamp: u64,  // Milliseconds since the Unix epoch
    #[serde(default)]
    pub signature: String,  // Base64 digitally-signed struct
    #[serde(default)]
    pub extensions: String,  // Base64, normally empty
}

/// A decoded signed certificate timestamp.
#[derive(Debug, Clone)]
pub struct Sct {
    pub version: u8,
    /// SHA-256 hash of the log's public key, 32 raw bytes
    pub log_id: Vec<u8>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub extensions: Vec<u8>,
    /// Two algorithm bytes, a two-byte length, then a DER ECDSA signature
    pub signature: Vec<u8>,
}

impl Sct {
    /// Decode the wire form, field by field, naming the field that failed.
    pub fn decode(raw: &RawSct) -> Result<Self, DecodeError> {
        let log_id = BASE64.decode(&raw.id).map_err(DecodeError::LogId)?;
        let signature = BASE64
            .decode(&raw.signature)
            .map_err(DecodeError::Signature)?;
        let extensions = BASE64
            .decode(&raw.extensions)
            .map_err(DecodeError::Extensions)?;

        Ok(Self {
            version: raw.sct_version,
            log_id,
            timestamp: raw.timestamp,
            extensions,
            signature,
        })
    }

    /// When the log says it issued this SCT.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(i64::try_from(self.timestamp).ok()?)
    }

    /// Check that the signature field is structurally well formed: the
    /// expected algorithm tags followed by a DER (R, S) integer pair with
    /// nothing after it. Does not verify the signature against any log key.
    pub fn check_signature(&self) -> Result<(), SignatureError> {
        if self.signature.len() < 4 {
            return Err(SignatureError::Truncated);
        }
        if self.signature[0] != HASH_ALG_SHA256 {
            return Err(SignatureError::UnsupportedHash(self.signature[0]));
        }
        if self.signature[1] != SIG_ALG_ECDSA {
            return Err(SignatureError::UnsupportedSignatureAlgorithm(
                self.signature[1],
            ));
        }

        // Bytes 2 and 3 declare the signature length. The DER parse bounds
        // the payload on its own, so the declared value goes unchecked.
        let der = &self.signature[4..];
        let (rest, seq) =
            parse_der_sequence(der).map_err(|e| SignatureError::MalformedDer(e.to_string()))?;
        if !rest.is_empty() {
            return Err(SignatureError::TrailingGarbage);
        }

        let values = seq
            .as_sequence()
            .map_err(|e| SignatureError::MalformedDer(e.to_string()))?;
        if values.len() != 2 {
            return Err(SignatureError::MalformedDer(format!(
                "expected 2 integers in ECDSA signature, found {}",
                values.len()
            )));
        }
        for value in values {
            if !matches!(value.content, BerObjectContent::Integer(_)) {
                return Err(SignatureError::MalformedDer(
                    "ECDSA signature element is not an integer".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SEQUENCE { INTEGER 1, INTEGER 2 }
    const DER_RS_PAIR: [u8; 8] = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];

    fn sct_with_signature(signature: Vec<u8>) -> Sct {
        Sct {
            version: 0,
            log_id: vec![0xAB; 32],
            timestamp: 1_234_567_890_123,
            extensions: Vec::new(),
            signature,
        }
    }

    fn valid_signature() -> Vec<u8> {
        let mut sig = vec![HASH_ALG_SHA256, SIG_ALG_ECDSA, 0x00, 0x06];
        sig.extend_from_slice(&DER_RS_PAIR);
        sig
    }

    #[test]
    fn test_add_chain_request_round_trip() {
        let cert = b"end entity der bytes";
        let issuer = b"issuer der bytes";
        let request = AddChainRequest::new(cert, issuer);

        assert_eq!(request.chain.len(), 2);
        assert_eq!(BASE64.decode(&request.chain[0]).unwrap(), cert);
        assert_eq!(BASE64.decode(&request.chain[1]).unwrap(), issuer);
    }

    #[test]
    fn test_add_chain_request_json_shape() {
        let request = AddChainRequest::new(b"a", b"b");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "chain": ["YQ==", "Yg=="] }));
    }

    #[test]
    fn test_decode_valid_raw_sct() {
        let raw = RawSct {
            sct_version: 0,
            id: BASE64.encode([0x42; 32]),
            timestamp: 1_234_567_890_123,
            signature: BASE64.encode(valid_signature()),
            extensions: String::new(),
        };

        let sct = Sct::decode(&raw).unwrap();
        assert_eq!(sct.version, 0);
        assert_eq!(sct.log_id, vec![0x42; 32]);
        assert_eq!(sct.timestamp, 1_234_567_890_123);
        assert_eq!(sct.signature, valid_signature());
        assert!(sct.extensions.is_empty());
    }

    #[test]
    fn test_decode_bad_log_id() {
        let raw = RawSct {
            id: "!!! not base64 !!!".to_string(),
            ..RawSct::default()
        };
        assert!(matches!(Sct::decode(&raw), Err(DecodeError::LogId(_))));
    }

    #[test]
    fn test_decode_bad_signature_field() {
        let raw = RawSct {
            signature: "%%%".to_string(),
            ..RawSct::default()
        };
        assert!(matches!(Sct::decode(&raw), Err(DecodeError::Signature(_))));
    }

    #[test]
    fn test_decode_bad_extensions_field() {
        let raw = RawSct {
            extensions: "###".to_string(),
            ..RawSct::default()
        };
        assert!(matches!(Sct::decode(&raw), Err(DecodeError::Extensions(_))));
    }

    #[test]
    fn test_raw_sct_tolerates_missing_and_unknown_fields() {
        let raw: RawSct =
            serde_json::from_str(r#"{"timestamp": 99, "error": "slow down"}"#).unwrap();
        assert_eq!(raw.timestamp, 99);
        assert_eq!(raw.sct_version, 0);
        assert!(raw.id.is_empty());

        // Empty base64 fields decode to empty byte strings
        let sct = Sct::decode(&raw).unwrap();
        assert!(sct.log_id.is_empty());
        assert!(sct.signature.is_empty());
    }

    #[test]
    fn test_issued_at() {
        let sct = sct_with_signature(valid_signature());
        let issued = sct.issued_at().unwrap();
        assert_eq!(issued.timestamp_millis(), 1_234_567_890_123);

        let out_of_range = Sct {
            timestamp: u64::MAX,
            ..sct
        };
        assert!(out_of_range.issued_at().is_none());
    }

    #[test]
    fn test_check_signature_valid() {
        let sct = sct_with_signature(valid_signature());
        assert!(sct.check_signature().is_ok());
    }

    #[test]
    fn test_check_signature_ignores_declared_length() {
        // The two length bytes are never compared to the actual payload
        let mut sig = vec![HASH_ALG_SHA256, SIG_ALG_ECDSA, 0xFF, 0xFF];
        sig.extend_from_slice(&DER_RS_PAIR);
        assert!(sct_with_signature(sig).check_signature().is_ok());
    }

    #[test]
    fn test_check_signature_truncated() {
        for len in 0..4 {
            let sct = sct_with_signature(vec![HASH_ALG_SHA256; len]);
            assert!(
                matches!(sct.check_signature(), Err(SignatureError::Truncated)),
                "length {} should be truncated",
                len
            );
        }
    }

    #[test]
    fn test_check_signature_wrong_hash_algorithm() {
        let mut sig = valid_signature();
        sig[0] = 5;
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::UnsupportedHash(5))
        ));
    }

    #[test]
    fn test_check_signature_wrong_signature_algorithm() {
        let mut sig = valid_signature();
        sig[1] = 1;  // RSA
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::UnsupportedSignatureAlgorithm(1))
        ));
    }

    #[test]
    fn test_check_signature_algorithm_tags_beat_garbage_payload() {
        // Tag validation happens before the DER parse
        let sig = vec![9, 9, 0xDE, 0xAD, 0xBE, 0xEF];
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::UnsupportedHash(9))
        ));
    }

    #[test]
    fn test_check_signature_trailing_garbage() {
        let mut sig = valid_signature();
        sig.push(0x00);
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::TrailingGarbage)
        ));
    }

    #[test]
    fn test_check_signature_garbage_der() {
        let sig = vec![HASH_ALG_SHA256, SIG_ALG_ECDSA, 0x00, 0x02, 0xFF, 0x00];
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_check_signature_empty_der() {
        let sig = vec![HASH_ALG_SHA256, SIG_ALG_ECDSA, 0x00, 0x00];
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_check_signature_single_integer() {
        // SEQUENCE { INTEGER 1 }
        let mut sig = vec![HASH_ALG_SHA256, SIG_ALG_ECDSA, 0x00, 0x03];
        sig.extend_from_slice(&[0x30, 0x03, 0x02, 0x01, 0x01]);
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_check_signature_non_integer_element() {
        // SEQUENCE { NULL, INTEGER 1 }
        let mut sig = vec![HASH_ALG_SHA256, SIG_ALG_ECDSA, 0x00, 0x07];
        sig.extend_from_slice(&[0x30, 0x05, 0x05, 0x00, 0x02, 0x01, 0x01]);
        assert!(matches!(
            sct_with_signature(sig).check_signature(),
            Err(SignatureError::MalformedDer(_))
        ));
    }
}
