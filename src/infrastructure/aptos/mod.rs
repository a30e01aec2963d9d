//! Aptos infrastructure - full node REST client and signing provider

mod client;
mod error;
mod signer;

pub use client::{AptosClient, ChainClient, CommittedTransaction};
pub use error::{ActionError, ChainError, SignerError};
pub use signer::{DisconnectedSigner, PendingTransaction, RemoteSigner, SigningProvider};
