//! Export Module
//!
//! 'e' / `:export` writes the filtered, sorted listing set (all pages) to a
//! timestamped CSV under the data directory's `exports/`.

mod csv_export;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::App;
use crate::config;
use crate::core::{Action, NotifyLevel};

pub use csv_export::write_listings;

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir =
        config::exports_dir().unwrap_or_else(|| PathBuf::from(".nftmart").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the pipeline output currently held by the app
pub fn export_listings(app: &App) -> Action {
    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };
    export_listings_to(app, &export_dir)
}

pub fn export_listings_to(app: &App, dir: &Path) -> Action {
    if app.listings.is_empty() {
        return Action::Notify("No listings to export".to_string(), NotifyLevel::Warn);
    }

    let filename = generate_filename("listings", "csv");
    let path = dir.join(&filename);

    match write_listings(&path, &app.listings) {
        Ok(count) => Action::Notify(
            format!("Exported {} listings to {}", count, path.display()),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Listing, Octas, Rarity};

    #[test]
    fn test_export_writes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new();
        app.apply_listings(vec![Listing {
            id: 3,
            owner: "0xabc".into(),
            name: "Comet, blue".into(),
            description: "desc".into(),
            uri: "ipfs://x".into(),
            price: Octas(250_000_000),
            for_sale: true,
            rarity: Rarity::Rare,
        }]);

        let action = export_listings_to(&app, dir.path());
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Info)));

        let entry = fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let content = fs::read_to_string(entry.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,price_apt,price_octas,rarity,owner,uri,description")
        );
        assert_eq!(
            lines.next(),
            Some("3,\"Comet, blue\",2.5,250000000,Rare,0xabc,ipfs://x,desc")
        );
    }

    #[test]
    fn test_export_empty_warns() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new();
        assert!(matches!(
            export_listings_to(&app, dir.path()),
            Action::Notify(_, NotifyLevel::Warn)
        ));
    }
}
