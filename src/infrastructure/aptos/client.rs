//! Aptos full node REST client
//!
//! Only the two calls the marketplace needs: reading an account resource and
//! waiting for a submitted transaction to leave the pending state.

use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ChainError;

/// Terminal state of a committed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTransaction {
    pub hash: String,
    pub version: Option<u64>,
    pub vm_status: String,
}

/// Full node capability used by the marketplace
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync + 'static {
    /// Fetch `data` of `resource_type` stored under `address`
    async fn account_resource(&self, address: &str, resource_type: &str)
        -> Result<Value, ChainError>;

    /// Block until `hash` is committed; a failed VM status is an error
    async fn wait_for_transaction(&self, hash: &str) -> Result<CommittedTransaction, ChainError>;

    /// Endpoint display name
    fn endpoint_name(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct NodeErrorResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// reqwest-backed client for the `/v1` REST API
pub struct AptosClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl AptosClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            poll_interval,
        })
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<TransactionResponse>, ChainError> {
        let url = format!("{}/transactions/by_hash/{}", self.base_url, hash);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let tx = response
            .json::<TransactionResponse>()
            .await
            .map_err(|err| ChainError::Decode(err.to_string()))?;
        Ok(Some(tx))
    }
}

async fn status_error(response: reqwest::Response) -> ChainError {
    let status = response.status().as_u16();
    let message = match response.json::<NodeErrorResponse>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => "no message".to_string(),
    };
    ChainError::Status { status, message }
}

#[async_trait::async_trait]
impl ChainClient for AptosClient {
    async fn account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Value, ChainError> {
        let url = format!(
            "{}/accounts/{}/resource/{}",
            self.base_url, address, resource_type
        );
        debug!(%url, "fetching account resource");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let body = response
            .json::<ResourceResponse>()
            .await
            .map_err(|err| ChainError::Decode(err.to_string()))?;
        Ok(body.data)
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<CommittedTransaction, ChainError> {
        let started = Instant::now();
        loop {
            match self.get_transaction(hash).await? {
                Some(tx) if tx.kind != "pending_transaction" => {
                    let vm_status = tx.vm_status.unwrap_or_default();
                    let hash = tx.hash.unwrap_or_else(|| hash.to_string());
                    if tx.success == Some(false) {
                        warn!(%hash, %vm_status, "transaction committed with failure");
                        return Err(ChainError::Rejected { hash, vm_status });
                    }
                    return Ok(CommittedTransaction {
                        hash,
                        version: tx.version.and_then(|v| v.parse().ok()),
                        vm_status,
                    });
                }
                _ => {}
            }

            if started.elapsed() >= self.timeout {
                return Err(ChainError::Timeout {
                    hash: hash.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn endpoint_name(&self) -> String {
        self.base_url.clone()
    }
}
