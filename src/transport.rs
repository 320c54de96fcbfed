//! Network exchange with a remote relay.
//!
//! [`RelayTransport`] is the seam the cache talks through; [`HttpRelayTransport`]
//! is the reqwest-backed implementation used in production. Every request carries
//! the configured timeout, so a slow relay costs at most that long per attempt.

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use relay_compliance::ComplianceRegistry;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::io::Write;
use tracing::debug;

use crate::error::RelayError;
use crate::from_env::RelayConfig;
use crate::types::{GetValidatorRelayResponse, SubmitBody};

pub const VALIDATORS_PATH: &str = "/relay/v1/builder/validators";
pub const COMPLIANCE_LISTS_PATH: &str = "/blxr/compliance_lists";
pub const BLOCKS_PATH: &str = "/relay/v1/builder/blocks";

#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Registrations for the current and upcoming epoch.
    async fn get_validators(&self) -> Result<GetValidatorRelayResponse, RelayError>;

    /// The named compliance lists, keyed by name.
    async fn get_compliance_lists(&self, names: &BTreeSet<String>) -> Result<ComplianceRegistry, RelayError>;

    /// Posts one block; any non-2xx answer is an error.
    async fn submit_block(&self, body: SubmitBody, cancellations: bool) -> Result<(), RelayError>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    config: RelayConfig,
}

impl HttpRelayTransport {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("validator-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, RelayError> {
        let response = request.send().await.map_err(|e| RelayError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T, RelayError> {
        let response = self.send(url, request).await?;
        let body = response.bytes().await.map_err(|e| RelayError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| RelayError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn get_validators(&self) -> Result<GetValidatorRelayResponse, RelayError> {
        let url = self.config.url_for(VALIDATORS_PATH);
        debug!(url = %url, "Fetching validator registrations");
        self.get_json(&url, self.client.get(&url)).await
    }

    async fn get_compliance_lists(&self, names: &BTreeSet<String>) -> Result<ComplianceRegistry, RelayError> {
        let url = self.config.url_for(COMPLIANCE_LISTS_PATH);
        let query: Vec<(&str, &str)> = names.iter().map(|name| ("list", name.as_str())).collect();
        debug!(url = %url, lists = ?names, "Fetching compliance lists");
        self.get_json(&url, self.client.get(&url).query(&query)).await
    }

    async fn submit_block(&self, body: SubmitBody, cancellations: bool) -> Result<(), RelayError> {
        let mut url = self.config.url_for(BLOCKS_PATH);
        if cancellations {
            url.push_str("?cancellations=true");
        }

        let request = match body {
            SubmitBody::Json(json) => self.client.post(&url).json(&json),
            SubmitBody::Ssz(bytes) => {
                let request = self
                    .client
                    .post(&url)
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream");
                if self.config.gzip_enabled {
                    let compressed = gzip(&bytes).map_err(|e| RelayError::PayloadEncoding(format!("gzip: {}", e)))?;
                    debug!(raw = bytes.len(), compressed = compressed.len(), "Compressed SSZ submission");
                    request
                        .header(reqwest::header::CONTENT_ENCODING, "gzip")
                        .body(compressed)
                } else {
                    request.body(bytes)
                }
            }
        };
        self.send(&url, request).await?;
        Ok(())
    }
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len()), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}
