//! CSV Export
//!
//! Writes listings to CSV files.

use std::path::Path;

use crate::domain::Listing;

/// Write listings to CSV file
pub fn write_listings(path: &Path, listings: &[Listing]) -> Result<usize, csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "name",
        "price_apt",
        "price_octas",
        "rarity",
        "owner",
        "uri",
        "description",
    ])?;

    for listing in listings {
        wtr.write_record([
            listing.id.to_string(),
            listing.name.clone(),
            listing.display_price(),
            listing.price.as_u64().to_string(),
            listing.rarity.label().to_string(),
            listing.owner.clone(),
            listing.uri.clone(),
            listing.description.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(listings.len())
}
