//! Domain layer - marketplace models and pure logic
//!
//! Nothing in here touches the network: decoding, normalization, the
//! filter/sort/paginate pipeline and payload construction are all plain
//! functions over their inputs.

pub mod amount;
pub mod hex_text;
pub mod listing;
pub mod payload;
pub mod query;

pub use amount::{AmountError, Octas, OCTAS_PER_APT};
pub use hex_text::{decode_hex_text, decode_hex_text_lossy, HexTextError};
pub use listing::{normalize, normalize_all, truncate_address, Listing, Rarity, RawListing};
pub use payload::{
    ActionKind, ActionPhase, ActionRequest, EntryFunctionPayload, EntryPoint, MarketContract,
    ValidationError,
};
pub use query::{page_count, paginate, ListingQuery, SortOrder, PAGE_SIZE};
