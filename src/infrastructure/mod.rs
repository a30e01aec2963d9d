//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Aptos full node client and signing provider
//! - Marketplace service built on top of them
//! - Tokio runtime bridge for async operations

pub mod aptos;
pub mod market;
pub mod runtime;

pub use market::{ActionOutcome, EntryPointInvoker, Marketplace, WalletInvoker};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
