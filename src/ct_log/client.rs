// src/ct_log/client.rs
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::TransportError;

/// An HTTP response with its JSON body already decoded.
#[derive(Debug)]
pub struct JsonResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: T,
}

/// HTTP client for CT log submission endpoints (RFC 6962 add-chain).
#[derive(Clone)]
pub struct LogClient {
    http_client: reqwest::Client,
}

impl LogClient {
    /// Create a client with the shared transport settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)  // Enable compression
            .build()?;

        Ok(Self { http_client })
    }

    /// POST a JSON body to `uri` and decode the JSON response into `T`.
    ///
    /// The status code is handed back untouched; classifying it is the
    /// caller's job. Build, network, body-read and body-decode failures map
    /// to distinct `TransportError` variants.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        uri: &str,
        body: &[u8],
    ) -> Result<JsonResponse<T>, TransportError> {
        let request = self
            .http_client
            .post(uri)
            .header(CONTENT_TYPE, "application/json")
            .header("Keep-Alive", "timeout=15, max=100")
            .body(body.to_vec())
            .build()
            .map_err(TransportError::Build)?;

        debug!("POSTing {} bytes to {}", body.len(), uri);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        let headers = response.headers().clone();

        let bytes = response.bytes().await.map_err(TransportError::Body)?;
        let body = serde_json::from_slice(&bytes).map_err(TransportError::Decode)?;

        Ok(JsonResponse {
            status,
            headers,
            body,
        })
    }
}
