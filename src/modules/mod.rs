//! Feature modules that sit beside the core app state
//!
//! - export: CSV snapshot of the filtered listing set

pub mod export;
