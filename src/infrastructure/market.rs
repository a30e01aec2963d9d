//! Marketplace service: listing reads and the purchase/tip/transfer submitters

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::listing::MarketplaceResource;
use crate::domain::{normalize_all, ActionKind, ActionRequest, EntryFunctionPayload, Listing, MarketContract};
use crate::infrastructure::aptos::{ActionError, ChainClient, ChainError, SigningProvider};

/// Submit-and-await capability for a named entry-point call
///
/// The production implementation goes through the wallet and the full node;
/// tests substitute doubles that succeed, fail or time out on demand.
#[async_trait::async_trait]
pub trait EntryPointInvoker: Send + Sync + 'static {
    /// Connected signing account, if any
    async fn connected_account(&self) -> Option<String>;

    /// Submit `payload` and wait for it to reach a terminal state; returns the hash
    async fn invoke(&self, payload: &EntryFunctionPayload) -> Result<String, ActionError>;

    /// Display name of whatever signs for us
    fn name(&self) -> String;
}

/// Signs through a [`SigningProvider`], confirms through a [`ChainClient`]
pub struct WalletInvoker {
    signer: Arc<dyn SigningProvider>,
    chain: Arc<dyn ChainClient>,
}

impl WalletInvoker {
    pub fn new(signer: Arc<dyn SigningProvider>, chain: Arc<dyn ChainClient>) -> Self {
        Self { signer, chain }
    }
}

#[async_trait::async_trait]
impl EntryPointInvoker for WalletInvoker {
    async fn connected_account(&self) -> Option<String> {
        match self.signer.account().await {
            Ok(account) => account,
            Err(err) => {
                warn!(signer = %self.signer.name(), error = %err, "wallet account lookup failed");
                None
            }
        }
    }

    async fn invoke(&self, payload: &EntryFunctionPayload) -> Result<String, ActionError> {
        let pending = self.signer.sign_and_submit(payload).await?;
        // confirmation strictly follows the returned handle
        let committed = self.chain.wait_for_transaction(&pending.hash).await?;
        info!(hash = %committed.hash, version = ?committed.version, "transaction confirmed");
        Ok(committed.hash)
    }

    fn name(&self) -> String {
        self.signer.name()
    }
}

/// Result of a confirmed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub hash: String,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Marketplace {
    contract: MarketContract,
    chain: Arc<dyn ChainClient>,
    invoker: Arc<dyn EntryPointInvoker>,
    in_flight: AtomicBool,
}

impl Marketplace {
    pub fn new(
        contract: MarketContract,
        chain: Arc<dyn ChainClient>,
        invoker: Arc<dyn EntryPointInvoker>,
    ) -> Self {
        Self {
            contract,
            chain,
            invoker,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn contract(&self) -> &MarketContract {
        &self.contract
    }

    pub async fn connected_account(&self) -> Option<String> {
        self.invoker.connected_account().await
    }

    pub fn endpoint_name(&self) -> String {
        self.chain.endpoint_name()
    }

    pub fn signer_name(&self) -> String {
        self.invoker.name()
    }

    /// Read the whole `Marketplace` resource and normalize every listing
    pub async fn fetch_listings(&self) -> Result<Vec<Listing>, ChainError> {
        let data = self
            .chain
            .account_resource(
                &self.contract.marketplace_address,
                &self.contract.resource_type(),
            )
            .await?;
        let resource: MarketplaceResource =
            serde_json::from_value(data).map_err(|err| ChainError::Decode(err.to_string()))?;
        info!(count = resource.nfts.len(), "fetched marketplace listings");
        Ok(normalize_all(resource.nfts))
    }

    pub async fn purchase(&self, listing: &Listing) -> Result<ActionOutcome, ActionError> {
        self.submit(ActionRequest::purchase(listing)).await
    }

    pub async fn tip(&self, creator: &str, amount_text: &str) -> Result<ActionOutcome, ActionError> {
        let request = ActionRequest::tip(creator, amount_text)?;
        self.submit(request).await
    }

    pub async fn transfer(
        &self,
        listing_id: u64,
        recipient_text: &str,
    ) -> Result<ActionOutcome, ActionError> {
        let request = ActionRequest::transfer(listing_id, recipient_text)?;
        self.submit(request).await
    }

    /// Submit an already validated request. At most one submission runs at a time.
    pub async fn submit(&self, request: ActionRequest) -> Result<ActionOutcome, ActionError> {
        let kind = request.kind();

        if kind == ActionKind::Tip && self.invoker.connected_account().await.is_none() {
            return Err(ActionError::NotConnected);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ActionError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let payload = request.to_payload(&self.contract);
        info!(?kind, function = %payload.function, "submitting action");
        match self.invoker.invoke(&payload).await {
            Ok(hash) => Ok(ActionOutcome { kind, hash }),
            Err(err) => {
                warn!(?kind, error = %err, "action failed");
                Err(err)
            }
        }
    }
}
