//! nftmart - terminal client for an Aptos NFT marketplace
//!
//! Browses the listings held in the marketplace resource, filters, sorts and
//! paginates them, and submits purchase/tip/transfer calls through an external
//! signing provider.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod ui;
