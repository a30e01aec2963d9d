//! Filter, sort and paginate the market view

use super::amount::Octas;
use super::listing::{Listing, Rarity};

/// Cards per page
pub const PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "Price: Low to High",
            SortOrder::PriceDesc => "Price: High to Low",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::PriceAsc => SortOrder::PriceDesc,
            SortOrder::PriceDesc => SortOrder::PriceAsc,
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "asc" | "price_asc" | "low" | "up" => Some(SortOrder::PriceAsc),
            "desc" | "price_desc" | "high" | "down" => Some(SortOrder::PriceDesc),
            _ => None,
        }
    }
}

/// User-selected market filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingQuery {
    /// `None` selects all rarities
    pub rarity: Option<Rarity>,
    /// Inclusive lower price bound
    pub price_from: Option<Octas>,
    /// Inclusive upper price bound
    pub price_to: Option<Octas>,
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.for_sale
            && self.rarity.map_or(true, |rarity| listing.rarity == rarity)
            && self.price_from.map_or(true, |from| listing.price >= from)
            && self.price_to.map_or(true, |to| listing.price <= to)
    }

    /// Retain matching listings and order them by price.
    ///
    /// The sort is stable, so equal prices keep their fetch order.
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        let mut out: Vec<Listing> = listings
            .iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect();
        match self.sort {
            SortOrder::PriceAsc => out.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceDesc => out.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        out
    }

    pub fn is_default(&self) -> bool {
        *self == ListingQuery::default()
    }

    /// Short human description for the status line
    pub fn summary(&self) -> String {
        let rarity = self.rarity.map(|r| r.label()).unwrap_or("All");
        let from = self
            .price_from
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let to = self
            .price_to
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("{rarity} | {from}..{to} APT | {}", self.sort.label())
    }
}

/// Items of 1-based `page`; empty past the end. Page 0 is treated as page 1.
pub fn paginate(listings: &[Listing], page: usize) -> &[Listing] {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= listings.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(listings.len());
    &listings[start..end]
}

/// Number of pages needed for `len` items; at least 1
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}
