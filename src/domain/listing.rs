//! Marketplace listings: raw on-chain records and their display form

use serde::{Deserialize, Deserializer, Serialize};

use super::amount::Octas;
use super::hex_text::decode_hex_text_lossy;

/// Listing record as stored in the `Marketplace` resource
///
/// Strings for `name`, `description` and `uri` are hex-encoded `vector<u8>`;
/// `id` and `price` are `u64`, which the REST API serializes as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawListing {
    #[serde(deserialize_with = "de_u64")]
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub uri: String,
    #[serde(deserialize_with = "de_u64")]
    pub price: u64,
    pub for_sale: bool,
    #[serde(deserialize_with = "de_u8")]
    pub rarity: u8,
}

/// `data` field of the `Marketplace` resource
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceResource {
    #[serde(default)]
    pub nfts: Vec<RawListing>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrString {
    Num(u64),
    Str(String),
}

fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn de_u8<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    // out-of-range tiers saturate and end up as Rarity::Unknown
    let value = de_u64(deserializer)?;
    Ok(u8::try_from(value).unwrap_or(u8::MAX))
}

/// Rarity tier of a listed asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    SuperRare,
    Unknown(u8),
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::SuperRare,
    ];

    pub fn from_level(level: u8) -> Self {
        match level {
            1 => Rarity::Common,
            2 => Rarity::Uncommon,
            3 => Rarity::Rare,
            4 => Rarity::SuperRare,
            other => Rarity::Unknown(other),
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::SuperRare => 4,
            Rarity::Unknown(level) => *level,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::SuperRare => "Super Rare",
            Rarity::Unknown(_) => "Unknown",
        }
    }

    /// Tag colour name; the UI maps it onto terminal colours
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "green",
            Rarity::Uncommon => "blue",
            Rarity::Rare => "purple",
            Rarity::SuperRare => "orange",
            Rarity::Unknown(_) => "gray",
        }
    }

    /// Parse user input: a level (`1`-`4`) or a label prefix (`rare`, `super`)
    pub fn parse(input: &str) -> Option<Rarity> {
        let input = input.trim().to_lowercase();
        if let Ok(level) = input.parse::<u8>() {
            return match Rarity::from_level(level) {
                Rarity::Unknown(_) => None,
                rarity => Some(rarity),
            };
        }
        match input.as_str() {
            "common" | "c" => Some(Rarity::Common),
            "uncommon" | "u" => Some(Rarity::Uncommon),
            "rare" | "r" => Some(Rarity::Rare),
            "super" | "superrare" | "super-rare" | "super_rare" | "sr" => {
                Some(Rarity::SuperRare)
            }
            _ => None,
        }
    }
}

/// Display-ready listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub uri: String,
    pub price: Octas,
    pub for_sale: bool,
    pub rarity: Rarity,
}

impl Listing {
    /// Price in APT as shown to the user
    pub fn display_price(&self) -> String {
        self.price.to_string()
    }
}

/// Convert one raw record into its display form
pub fn normalize(raw: RawListing) -> Listing {
    Listing {
        id: raw.id,
        name: decode_hex_text_lossy(&raw.name),
        description: decode_hex_text_lossy(&raw.description),
        uri: decode_hex_text_lossy(&raw.uri),
        price: Octas(raw.price),
        for_sale: raw.for_sale,
        rarity: Rarity::from_level(raw.rarity),
        owner: raw.owner,
    }
}

/// Order-preserving batch form of [`normalize`]
pub fn normalize_all(raw: Vec<RawListing>) -> Vec<Listing> {
    raw.into_iter().map(normalize).collect()
}

/// Shorten an address for display: `0x1234...abcd`
pub fn truncate_address(address: &str) -> String {
    const HEAD: usize = 6;
    const TAIL: usize = 4;
    let count = address.chars().count();
    if count <= HEAD + TAIL {
        return address.to_string();
    }
    let head: String = address.chars().take(HEAD).collect();
    let tail: String = address.chars().skip(count - TAIL).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hex_text::encode_hex_text;

    #[test]
    fn test_deserialize_rest_shape() {
        let json = serde_json::json!({
            "nfts": [{
                "id": "7",
                "owner": "0xabc",
                "name": encode_hex_text("Blue Cat"),
                "description": encode_hex_text("A cat"),
                "uri": encode_hex_text("ipfs://cat"),
                "price": "250000000",
                "for_sale": true,
                "rarity": 2
            }]
        });
        let resource: MarketplaceResource = serde_json::from_value(json).unwrap();
        assert_eq!(resource.nfts.len(), 1);
        assert_eq!(resource.nfts[0].id, 7);
        assert_eq!(resource.nfts[0].price, 250_000_000);
    }

    #[test]
    fn test_deserialize_plain_numbers() {
        let json = serde_json::json!({
            "id": 3, "owner": "0x1", "name": "0x", "description": "0x", "uri": "0x",
            "price": 5, "for_sale": false, "rarity": "4"
        });
        let raw: RawListing = serde_json::from_value(json).unwrap();
        assert_eq!(raw.price, 5);
        assert_eq!(raw.rarity, 4);
    }

    #[test]
    fn test_out_of_range_rarity_keeps_batch() {
        let json = serde_json::json!({
            "nfts": [{
                "id": "1", "owner": "0x1", "name": "0x", "description": "0x", "uri": "0x",
                "price": "1", "for_sale": true, "rarity": "300"
            }, {
                "id": "2", "owner": "0x2", "name": "0x", "description": "0x", "uri": "0x",
                "price": "2", "for_sale": true, "rarity": 3
            }]
        });
        let resource: MarketplaceResource = serde_json::from_value(json).unwrap();
        let listings = normalize_all(resource.nfts);
        assert_eq!(listings.len(), 2);
        assert!(matches!(listings[0].rarity, Rarity::Unknown(_)));
        assert_eq!(listings[1].rarity, Rarity::Rare);
    }

    #[test]
    fn test_deserialize_rejects_bad_price() {
        let json = serde_json::json!({
            "id": "1", "owner": "0x1", "name": "0x", "description": "0x", "uri": "0x",
            "price": "lots", "for_sale": true, "rarity": 1
        });
        assert!(serde_json::from_value::<RawListing>(json).is_err());
    }

    #[test]
    fn test_normalize_decodes_fields() {
        let raw = RawListing {
            id: 1,
            owner: "0xowner".into(),
            name: encode_hex_text("Dragon"),
            description: encode_hex_text("Breathes fire"),
            uri: encode_hex_text("https://img/1.png"),
            price: 150_000_000,
            for_sale: true,
            rarity: 4,
        };
        let listing = normalize(raw);
        assert_eq!(listing.name, "Dragon");
        assert_eq!(listing.description, "Breathes fire");
        assert_eq!(listing.uri, "https://img/1.png");
        assert_eq!(listing.display_price(), "1.5");
        assert_eq!(listing.price, Octas(150_000_000));
        assert_eq!(listing.rarity, Rarity::SuperRare);
        assert_eq!(listing.owner, "0xowner");
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let raws: Vec<RawListing> = (0..5)
            .map(|i| RawListing {
                id: 10 - i,
                owner: "0x1".into(),
                name: "0x".into(),
                description: "0x".into(),
                uri: "0x".into(),
                price: i,
                for_sale: true,
                rarity: 1,
            })
            .collect();
        let ids: Vec<u64> = normalize_all(raws).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![10, 9, 8, 7, 6]);
    }

    #[test]
    fn test_rarity_labels() {
        let labels: Vec<&str> = Rarity::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["Common", "Uncommon", "Rare", "Super Rare"]);
        assert_eq!(Rarity::from_level(9), Rarity::Unknown(9));
        assert_eq!(Rarity::from_level(3).color(), "purple");
    }

    #[test]
    fn test_rarity_parse() {
        assert_eq!(Rarity::parse("4"), Some(Rarity::SuperRare));
        assert_eq!(Rarity::parse("Rare"), Some(Rarity::Rare));
        assert_eq!(Rarity::parse("super"), Some(Rarity::SuperRare));
        assert_eq!(Rarity::parse("5"), None);
        assert_eq!(Rarity::parse("legendary"), None);
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(
            truncate_address("0x223d508f051f5869e232658de4a25c49"),
            "0x223d...5c49"
        );
        assert_eq!(truncate_address("0x1"), "0x1");
    }
}
