//! Entry-function payloads for the marketplace contract and the action lifecycle

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::amount::{AmountError, Octas};
use super::listing::Listing;

/// Entry points exposed by the marketplace module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    PurchaseNft,
    TipCreator,
    TransferNft,
}

impl EntryPoint {
    pub fn name(&self) -> &'static str {
        match self {
            EntryPoint::PurchaseNft => "purchase_nft",
            EntryPoint::TipCreator => "tip_creator",
            EntryPoint::TransferNft => "transfer_nft",
        }
    }
}

/// Where the marketplace lives on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketContract {
    /// Account publishing the Move module
    pub module_address: String,
    pub module_name: String,
    /// Account holding the `Marketplace` resource
    pub marketplace_address: String,
}

impl MarketContract {
    /// Fully qualified resource type, e.g. `0x1::NFTMarketplace::Marketplace`
    pub fn resource_type(&self) -> String {
        format!("{}::{}::Marketplace", self.module_address, self.module_name)
    }

    pub fn function_id(&self, entry: EntryPoint) -> String {
        format!("{}::{}::{}", self.module_address, self.module_name, entry.name())
    }
}

/// JSON payload handed to the signing provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

impl EntryFunctionPayload {
    pub const KIND: &'static str = "entry_function_payload";

    pub fn new(function: String, arguments: Vec<String>) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// Locally detected input problems; nothing was sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid amount greater than zero.")]
    InvalidAmount,
    #[error("Please enter a valid amount greater than zero.")]
    NonPositiveAmount,
    #[error("Amount is too large.")]
    AmountOverflow,
    #[error("Please enter a recipient address.")]
    EmptyRecipient,
}

impl From<AmountError> for ValidationError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::Invalid(_) => ValidationError::InvalidAmount,
            AmountError::NonPositive => ValidationError::NonPositiveAmount,
            AmountError::Overflow => ValidationError::AmountOverflow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Purchase,
    Tip,
    Transfer,
}

impl ActionKind {
    pub fn entry_point(&self) -> EntryPoint {
        match self {
            ActionKind::Purchase => EntryPoint::PurchaseNft,
            ActionKind::Tip => EntryPoint::TipCreator,
            ActionKind::Transfer => EntryPoint::TransferNft,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            ActionKind::Purchase => "NFT purchased successfully!",
            ActionKind::Tip => "Tip sent successfully!",
            ActionKind::Transfer => "NFT transferred successfully!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            ActionKind::Purchase => "Failed to purchase NFT.",
            ActionKind::Tip => "Failed to send tip.",
            ActionKind::Transfer => "Failed to transfer NFT.",
        }
    }
}

/// A validated action ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Purchase { listing_id: u64, price: Octas },
    Tip { creator: String, amount: Octas },
    Transfer { listing_id: u64, recipient: String },
}

impl ActionRequest {
    pub fn purchase(listing: &Listing) -> Self {
        ActionRequest::Purchase {
            listing_id: listing.id,
            price: listing.price,
        }
    }

    /// Validate user-entered tip text
    pub fn tip(creator: &str, amount_text: &str) -> Result<Self, ValidationError> {
        let amount = Octas::parse_positive_apt(amount_text)?;
        Ok(ActionRequest::Tip {
            creator: creator.to_string(),
            amount,
        })
    }

    /// Validate user-entered recipient text
    pub fn transfer(listing_id: u64, recipient_text: &str) -> Result<Self, ValidationError> {
        let recipient = recipient_text.trim();
        if recipient.is_empty() {
            return Err(ValidationError::EmptyRecipient);
        }
        Ok(ActionRequest::Transfer {
            listing_id,
            recipient: recipient.to_string(),
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::Purchase { .. } => ActionKind::Purchase,
            ActionRequest::Tip { .. } => ActionKind::Tip,
            ActionRequest::Transfer { .. } => ActionKind::Transfer,
        }
    }

    /// Build the payload; amounts are sent as decimal strings of octas
    pub fn to_payload(&self, contract: &MarketContract) -> EntryFunctionPayload {
        let function = contract.function_id(self.kind().entry_point());
        let arguments = match self {
            ActionRequest::Purchase { listing_id, price } => vec![
                contract.marketplace_address.clone(),
                listing_id.to_string(),
                price.as_u64().to_string(),
            ],
            ActionRequest::Tip { creator, amount } => {
                vec![creator.clone(), amount.as_u64().to_string()]
            }
            ActionRequest::Transfer {
                listing_id,
                recipient,
            } => vec![
                contract.marketplace_address.clone(),
                listing_id.to_string(),
                recipient.clone(),
            ],
        };
        EntryFunctionPayload::new(function, arguments)
    }
}

/// Lifecycle of one submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionPhase {
    #[default]
    Idle,
    Submitting,
    Confirmed { hash: String },
    Failed { reason: String },
}

impl ActionPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, ActionPhase::Submitting)
    }
}
