//! Public vendor directory.

use std::sync::LazyLock;

use serde::Serialize;
use url::Url;

use smart_bazaar_core::{CatalogItem, Coordinates, VendorId, VendorRecord};

use super::documents::{VendorDocument, vendor_path, vendors};
use super::{CatalogManager, ServiceError};
use crate::geolocation::{GeolocationSource, position_or};
use crate::store::{DocumentStore, StoreError};

/// A vendor together with its catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorWithCatalog {
    pub vendor: VendorRecord,
    pub items: Vec<CatalogItem>,
}

/// Title, text and link for sharing a vendor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub title: String,
    pub text: String,
    pub url: String,
}

static MAPS_SEARCH: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.google.com/maps/search/").expect("Invalid maps search URL")
});

/// Read-only queries over every vendor, for customers.
pub struct DirectoryService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> DirectoryService<'a> {
    /// Create a service over the given store.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Every vendor, oldest first.
    ///
    /// Records that cannot be decoded are skipped with a warning so one bad
    /// document does not empty the map.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the query fails.
    pub async fn list_all_vendors(&self) -> Result<Vec<VendorRecord>, ServiceError> {
        let documents = self.store.query_collection(&vendors()?, None).await?;

        Ok(documents
            .iter()
            .filter_map(|doc| match VendorDocument::decode(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(path = %doc.path, error = %e, "Skipping unreadable vendor");
                    None
                }
            })
            .collect())
    }

    /// One vendor and its items, `None` if no such vendor exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if a read fails or the vendor cannot be
    /// decoded.
    pub async fn get_vendor_with_catalog(
        &self,
        vendor_id: &VendorId,
    ) -> Result<Option<VendorWithCatalog>, ServiceError> {
        let path = match vendor_path(vendor_id) {
            Ok(path) => path,
            // An ID that cannot be addressed cannot exist.
            Err(StoreError::InvalidPath(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(document) = self.store.get_document(&path).await? else {
            return Ok(None);
        };
        let vendor = VendorDocument::decode(&document)?;
        let items = CatalogManager::new(self.store).list_items(vendor_id).await?;

        Ok(Some(VendorWithCatalog { vendor, items }))
    }

    /// Where to centre the customer map.
    pub async fn map_center(
        &self,
        geolocation: &dyn GeolocationSource,
        fallback: Coordinates,
    ) -> Coordinates {
        position_or(geolocation, fallback).await.0
    }
}

/// Share text and public link for a vendor page.
#[must_use]
pub fn share_link(vendor: &VendorRecord, base_url: &Url) -> ShareLink {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push("vendor")
            .push(vendor.id.as_str());
    }

    ShareLink {
        title: vendor.profile.shop_name.clone(),
        text: format!("Check out {} on Smart Bazaar!", vendor.profile.shop_name),
        url: url.to_string(),
    }
}

/// Map search link that opens directions to `location`.
#[must_use]
pub fn directions_url(location: &Coordinates) -> Url {
    let mut url = MAPS_SEARCH.clone();
    url.query_pairs_mut()
        .append_pair("api", "1")
        .append_pair(
            "query",
            &format!("{},{}", location.latitude, location.longitude),
        );
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use smart_bazaar_core::{
        Category, NewCatalogItem, OwnerId, VendorProfile, VendorProfileUpdate,
    };

    use super::*;
    use crate::geolocation::{ClientReported, Unavailable};
    use crate::services::VendorProfileManager;
    use crate::store::MemoryStore;

    fn stall(name: &str) -> VendorProfileUpdate {
        VendorProfileUpdate {
            shop_name: Some(name.to_string()),
            category: Some(Category::Food),
            contact: Some("9999999999".to_string()),
            lat: Some(28.6),
            lng: Some(77.2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_all_vendors_in_order() {
        let store = MemoryStore::new();
        let profiles = VendorProfileManager::new(&store);
        profiles
            .save(&OwnerId::new("u1"), stall("First"))
            .await
            .unwrap();
        profiles
            .save(&OwnerId::new("u2"), stall("Second"))
            .await
            .unwrap();

        let directory = DirectoryService::new(&store);
        let names: Vec<_> = directory
            .list_all_vendors()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.profile.shop_name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_vendor() {
        let store = MemoryStore::new();
        VendorProfileManager::new(&store)
            .save(&OwnerId::new("u1"), stall("Good"))
            .await
            .unwrap();
        let bad = vendors().unwrap().doc("bad").unwrap();
        store
            .set_document(&bad, json!({"shopName": "No owner"}).as_object().unwrap().clone(), false)
            .await
            .unwrap();

        let vendors = DirectoryService::new(&store).list_all_vendors().await.unwrap();
        assert_eq!(vendors.len(), 1);
    }

    #[tokio::test]
    async fn test_get_vendor_with_catalog() {
        let store = MemoryStore::new();
        let record = VendorProfileManager::new(&store)
            .save(&OwnerId::new("u1"), stall("Tea Stall"))
            .await
            .unwrap();
        CatalogManager::new(&store)
            .add_item(&record.id, NewCatalogItem::parse("Chai", "10", None).unwrap())
            .await
            .unwrap();

        let found = DirectoryService::new(&store)
            .get_vendor_with_catalog(&record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.vendor, record);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].name, "Chai");
    }

    #[tokio::test]
    async fn test_get_unknown_vendor() {
        let store = MemoryStore::new();
        let directory = DirectoryService::new(&store);
        assert!(
            directory
                .get_vendor_with_catalog(&VendorId::new("missing"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            directory
                .get_vendor_with_catalog(&VendorId::new("../etc"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_map_center() {
        let store = MemoryStore::new();
        let directory = DirectoryService::new(&store);
        let here = Coordinates::new(12.97, 77.59).unwrap();

        assert_eq!(
            directory
                .map_center(&ClientReported(Some(here)), Coordinates::DEFAULT)
                .await,
            here
        );
        assert_eq!(
            directory.map_center(&Unavailable, Coordinates::DEFAULT).await,
            Coordinates::DEFAULT
        );
    }

    #[test]
    fn test_share_link() {
        let vendor = VendorRecord {
            id: VendorId::new("abc123"),
            owner_id: OwnerId::new("u1"),
            profile: VendorProfile {
                shop_name: "Tea Stall".to_string(),
                category: Category::Food,
                contact: "1".to_string(),
                location: Coordinates::DEFAULT,
                description: None,
                opening_time: None,
                closing_time: None,
            },
        };

        let link = share_link(&vendor, &Url::parse("http://localhost:3000").unwrap());
        assert_eq!(link.url, "http://localhost:3000/vendor/abc123");
        assert_eq!(link.title, "Tea Stall");
        assert_eq!(link.text, "Check out Tea Stall on Smart Bazaar!");

        let nested = share_link(&vendor, &Url::parse("https://example.com/bazaar/").unwrap());
        assert_eq!(nested.url, "https://example.com/bazaar/vendor/abc123");
    }

    #[test]
    fn test_directions_url() {
        let url = directions_url(&Coordinates::new(28.6139, 77.209).unwrap());
        assert_eq!(url.host_str(), Some("www.google.com"));
        assert_eq!(url.path(), "/maps/search/");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("api".to_string(), "1".to_string()),
                ("query".to_string(), "28.6139,77.209".to_string()),
            ]
        );
    }

    #[test]
    fn test_directions_url_negative_coordinates() {
        let url = directions_url(&Coordinates::new(-33.8688, 151.2093).unwrap());
        assert!(
            url.query_pairs()
                .any(|(k, v)| k == "query" && v == "-33.8688,151.2093")
        );
    }
}
