//! Signing provider abstraction
//!
//! Keys never live in this process. A wallet (browser extension bridge,
//! hardware wallet daemon, ...) exposes a small JSON API that signs and
//! submits entry-function payloads on our behalf.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::error::SignerError;
use crate::domain::EntryFunctionPayload;

/// Handle returned by the wallet once the transaction is submitted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

#[async_trait::async_trait]
pub trait SigningProvider: Send + Sync + 'static {
    /// Address of the connected account, if any
    async fn account(&self) -> Result<Option<String>, SignerError>;

    /// Sign `payload` with the connected account and submit it
    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, SignerError>;

    fn name(&self) -> String;
}

/// Used when no wallet is configured; every submission fails
pub struct DisconnectedSigner;

#[async_trait::async_trait]
impl SigningProvider for DisconnectedSigner {
    async fn account(&self) -> Result<Option<String>, SignerError> {
        Ok(None)
    }

    async fn sign_and_submit(
        &self,
        _payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, SignerError> {
        Err(SignerError::Unavailable("no wallet configured".to_string()))
    }

    fn name(&self) -> String {
        "none".to_string()
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WalletErrorResponse {
    #[serde(default)]
    message: String,
}

/// Wallet bridge reached over HTTP
///
/// - `GET  {base}/account`          -> `{"address": "0x..." | null}`
/// - `POST {base}/sign_and_submit`  -> `{"hash": "0x..."}`
pub struct RemoteSigner {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteSigner {
    pub fn new(base_url: &str) -> Result<Self, SignerError> {
        // signing waits on the user approving in their wallet
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

async fn wallet_message(response: reqwest::Response) -> String {
    match response.json::<WalletErrorResponse>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => "no message".to_string(),
    }
}

#[async_trait::async_trait]
impl SigningProvider for RemoteSigner {
    async fn account(&self) -> Result<Option<String>, SignerError> {
        let url = format!("{}/account", self.base_url);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(SignerError::Unavailable(format!(
                "{status}: {}",
                wallet_message(response).await
            )));
        }
        let body = response.json::<AccountResponse>().await?;
        Ok(body.address.filter(|addr| !addr.trim().is_empty()))
    }

    async fn sign_and_submit(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, SignerError> {
        let url = format!("{}/sign_and_submit", self.base_url);
        debug!(function = %payload.function, args = ?payload.arguments, "requesting signature");
        let response = self.http.post(&url).json(payload).send().await?;
        let status = response.status();
        if status.is_client_error() {
            return Err(SignerError::Rejected(wallet_message(response).await));
        }
        if !status.is_success() {
            return Err(SignerError::Unavailable(format!(
                "{status}: {}",
                wallet_message(response).await
            )));
        }
        let pending = response.json::<PendingTransaction>().await?;
        info!(hash = %pending.hash, function = %payload.function, "transaction submitted");
        Ok(pending)
    }

    fn name(&self) -> String {
        self.base_url.clone()
    }
}
