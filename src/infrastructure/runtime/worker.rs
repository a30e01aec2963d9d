//! Async worker - runs in Tokio runtime and handles chain and wallet calls

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::domain::ActionRequest;
use crate::infrastructure::market::Marketplace;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the async worker loop
pub async fn run_async_worker(
    market: Arc<Marketplace>,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let account = market.connected_account().await;
    info!(
        endpoint = %market.endpoint_name(),
        signer = %market.signer_name(),
        connected = account.is_some(),
        "runtime worker started"
    );
    let _ = evt_tx.send(RuntimeEvent::Connected {
        endpoint: market.endpoint_name(),
        signer: market.signer_name(),
        account,
    });

    loop {
        // Process commands (non-blocking)
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => {
                    debug!("runtime worker shutting down");
                    return Ok(());
                }

                RuntimeCommand::FetchListings { seq } => {
                    let market = market.clone();
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        fetch_listings(&market, seq, &evt_tx).await;
                    });
                }

                RuntimeCommand::RefreshAccount => {
                    let market = market.clone();
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let account = market.connected_account().await;
                        let _ = evt_tx.send(RuntimeEvent::AccountReady { account });
                    });
                }

                RuntimeCommand::Submit { request } => {
                    // confirmation can take the full timeout; keep draining commands
                    let market = market.clone();
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        submit(&market, request, &evt_tx).await;
                    });
                }
            }
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn fetch_listings(market: &Marketplace, seq: u64, evt_tx: &Sender<RuntimeEvent>) {
    match market.fetch_listings().await {
        Ok(listings) => {
            let _ = evt_tx.send(RuntimeEvent::ListingsReady { seq, listings });
        }
        Err(err) => {
            warn!(seq, error = %err, "listing fetch failed");
            let _ = evt_tx.send(RuntimeEvent::FetchFailed {
                seq,
                message: format!("{:#}", err),
            });
        }
    }
}

async fn submit(market: &Marketplace, request: ActionRequest, evt_tx: &Sender<RuntimeEvent>) {
    let kind = request.kind();
    match market.submit(request).await {
        Ok(outcome) => {
            let _ = evt_tx.send(RuntimeEvent::ActionConfirmed {
                kind: outcome.kind,
                hash: outcome.hash,
            });
        }
        Err(err) => {
            if err.is_local() {
                debug!(?kind, error = %err, "action refused before submission");
            }
            let _ = evt_tx.send(RuntimeEvent::ActionFailed {
                kind,
                message: err.to_string(),
            });
        }
    }
}
