//! Seed vendor accounts, shops and catalogs from a YAML file.
//!
//! ```yaml
//! vendors:
//!   - email: chai@example.com
//!     password: correct-horse
//!     profile:
//!       shopName: Sharma Tea Stall
//!       category: Food
//!       contact: "9876543210"
//!       lat: 28.6315
//!       lng: 77.2167
//!       openingTime: "06:30"
//!     items:
//!       - name: Masala Chai
//!         price: "15"
//!       - name: Samosa
//!         price: 12.5
//! ```
//!
//! Seeding is repeatable: existing accounts are signed in instead of
//! registered, profiles are merged, and items whose name is already in the
//! catalog are skipped.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use smart_bazaar_core::{NewCatalogItem, Price, VendorProfileUpdate};
use smart_bazaar_server::identity::{IdentityError, IdentitySession, LocalIdentityProvider};
use smart_bazaar_server::services::{CatalogManager, VendorProfileManager};
use smart_bazaar_server::store::{DocumentStore, PgDocumentStore};

use super::connect;

/// Top level of a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub vendors: Vec<SeedVendor>,
}

/// One vendor account with its shop.
#[derive(Debug, Deserialize)]
pub struct SeedVendor {
    pub email: String,
    pub password: String,
    pub profile: VendorProfileUpdate,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

/// One catalog entry.
#[derive(Debug, Deserialize)]
pub struct SeedItem {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
}

/// What a seeding run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts_created: usize,
    pub accounts_existing: usize,
    pub vendors_saved: usize,
    pub items_added: usize,
    pub items_skipped: usize,
}

/// Seed from a YAML file into the configured database.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// not configured, or a vendor fails to seed.
pub async fn run(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %file.display(), "Loading seed file");

    // Read and parse before connecting to the database
    let content = tokio::fs::read_to_string(file).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(vendors = seed.vendors.len(), "Parsed seed file");

    let pool = connect().await?;
    let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));

    let summary = seed_store(store, seed).await?;

    info!("Seeding complete!");
    info!("  Accounts created: {}", summary.accounts_created);
    info!("  Accounts already present: {}", summary.accounts_existing);
    info!("  Vendor profiles saved: {}", summary.vendors_saved);
    info!("  Items added: {}", summary.items_added);
    info!("  Items skipped (already listed): {}", summary.items_skipped);

    Ok(())
}

/// Seed every vendor in `seed` into `store`.
///
/// # Errors
///
/// Returns the first error encountered; vendors before it stay seeded.
pub async fn seed_store(
    store: Arc<dyn DocumentStore>,
    seed: SeedFile,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let session = IdentitySession::new(Arc::new(LocalIdentityProvider::new(Arc::clone(&store))));
    let profiles = VendorProfileManager::new(store.as_ref());
    let catalog = CatalogManager::new(store.as_ref());
    let mut summary = SeedSummary::default();

    for vendor in seed.vendors {
        let identity = match session.sign_up(&vendor.email, &vendor.password, true).await {
            Ok(identity) => {
                summary.accounts_created += 1;
                identity
            }
            Err(IdentityError::UserAlreadyExists) => {
                summary.accounts_existing += 1;
                session.sign_in(&vendor.email, &vendor.password).await?
            }
            Err(e) => return Err(e.into()),
        };

        if !identity.is_vendor {
            warn!(email = %identity.email, "Account exists as a customer, skipping");
            session.sign_out().await?;
            continue;
        }

        let record = profiles.save(&identity.id, vendor.profile).await?;
        summary.vendors_saved += 1;

        let listed = catalog.list_items(&record.id).await?;
        for item in vendor.items {
            if listed.iter().any(|existing| existing.name == item.name.trim()) {
                summary.items_skipped += 1;
                continue;
            }
            let item = NewCatalogItem::new(&item.name, item.price, item.description.as_deref())?;
            catalog.add_item(&record.id, item).await?;
            summary.items_added += 1;
        }

        info!(shop = %record.profile.shop_name, vendor = %record.id, "Seeded vendor");
        session.sign_out().await?;
    }

    Ok(summary)
}
