#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nftmart::domain::{EntryFunctionPayload, Listing, MarketContract, Octas, Rarity};
use nftmart::infrastructure::aptos::{ActionError, ChainClient, ChainError, CommittedTransaction};
use nftmart::infrastructure::{EntryPointInvoker, Marketplace};
use serde_json::{json, Value};

pub fn contract() -> MarketContract {
    MarketContract {
        module_address: "0xmodule".to_string(),
        module_name: "NFTMarketplace".to_string(),
        marketplace_address: "0xmarket".to_string(),
    }
}

pub fn apt(value: u64) -> Octas {
    Octas(value * 100_000_000)
}

pub fn listing(id: u64, price_apt: u64, rarity: u8) -> Listing {
    Listing {
        id,
        owner: format!("0x{:064x}", id),
        name: format!("NFT #{id}"),
        description: String::new(),
        uri: String::new(),
        price: apt(price_apt),
        for_sale: true,
        rarity: Rarity::from_level(rarity),
    }
}

/// `data` of the Marketplace resource as the REST API returns it
pub fn resource_json(items: &[(u64, u64, u8, bool)]) -> Value {
    let nfts: Vec<Value> = items
        .iter()
        .map(|(id, price_apt, rarity, for_sale)| {
            json!({
                "id": id.to_string(),
                "owner": format!("0x{:064x}", id),
                "name": format!("0x{}", hex::encode(format!("NFT #{id}"))),
                "description": "0x",
                "uri": format!("0x{}", hex::encode(format!("ipfs://nft/{id}"))),
                "price": (price_apt * 100_000_000).to_string(),
                "for_sale": for_sale,
                "rarity": rarity,
            })
        })
        .collect();
    json!({ "nfts": nfts })
}

/// Chain double serving a fixed resource; fails reads when `data` is None
pub struct StubChain {
    pub data: Mutex<Option<Value>>,
}

impl StubChain {
    pub fn serving(data: Value) -> Arc<Self> {
        Arc::new(Self {
            data: Mutex::new(Some(data)),
        })
    }

    pub fn set(&self, data: Option<Value>) {
        *self.data.lock().unwrap() = data;
    }
}

#[async_trait::async_trait]
impl ChainClient for StubChain {
    async fn account_resource(&self, _: &str, _: &str) -> Result<Value, ChainError> {
        self.data.lock().unwrap().clone().ok_or(ChainError::Status {
            status: 503,
            message: "node unavailable".to_string(),
        })
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<CommittedTransaction, ChainError> {
        Ok(CommittedTransaction {
            hash: hash.to_string(),
            version: Some(1),
            vm_status: "Executed successfully".to_string(),
        })
    }

    fn endpoint_name(&self) -> String {
        "stub".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeOutcome {
    Confirm,
    Timeout,
    Reject,
}

/// Invocation double: counts calls and settles as configured
pub struct StubInvoker {
    pub account: Option<String>,
    pub outcome: InvokeOutcome,
    pub calls: AtomicUsize,
    pub payloads: Mutex<Vec<EntryFunctionPayload>>,
}

impl StubInvoker {
    pub fn new(account: Option<&str>, outcome: InvokeOutcome) -> Arc<Self> {
        Arc::new(Self {
            account: account.map(str::to_string),
            outcome,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EntryPointInvoker for StubInvoker {
    async fn connected_account(&self) -> Option<String> {
        self.account.clone()
    }

    async fn invoke(&self, payload: &EntryFunctionPayload) -> Result<String, ActionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        match self.outcome {
            InvokeOutcome::Confirm => Ok("0xconfirmed".to_string()),
            InvokeOutcome::Timeout => Err(ChainError::Timeout {
                hash: "0xslow".to_string(),
                secs: 20,
            }
            .into()),
            InvokeOutcome::Reject => Err(ChainError::Rejected {
                hash: "0xbad".to_string(),
                vm_status: "Move abort: ENOT_FOR_SALE".to_string(),
            }
            .into()),
        }
    }

    fn name(&self) -> String {
        "stub".to_string()
    }
}

pub fn marketplace(chain: Arc<StubChain>, invoker: Arc<StubInvoker>) -> Arc<Marketplace> {
    Arc::new(Marketplace::new(contract(), chain, invoker))
}
