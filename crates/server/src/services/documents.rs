//! Document encodings for vendors and catalog items.
//!
//! Field names follow the documents already written by the web client
//! (`userId`, `shopName`, `lat`, `lng`, ...). Reads are lenient: blank
//! optional strings become `None`, and unparseable opening hours are
//! dropped with a warning rather than failing the whole listing.

use serde::{Deserialize, Serialize};

use smart_bazaar_core::{
    CatalogItem, Category, Coordinates, ItemId, NewCatalogItem, OwnerId, Price, ShopHours,
    VendorId, VendorProfile, VendorRecord,
};

use crate::store::{CollectionPath, Document, DocumentPath, StoreError, from_fields};

pub const VENDORS: &str = "vendors";
pub const ITEMS: &str = "items";
pub const VENDOR_OWNERS: &str = "vendorOwners";

/// `vendors`
pub fn vendors() -> Result<CollectionPath, StoreError> {
    CollectionPath::root(VENDORS)
}

/// `vendors/{id}`
pub fn vendor_path(id: &VendorId) -> Result<DocumentPath, StoreError> {
    vendors()?.doc(id.as_str())
}

/// `vendors/{id}/items`
pub fn items(vendor_id: &VendorId) -> Result<CollectionPath, StoreError> {
    vendor_path(vendor_id)?.collection(ITEMS)
}

/// `vendorOwners/{ownerId}`
pub fn owner_claim_path(owner_id: &OwnerId) -> Result<DocumentPath, StoreError> {
    CollectionPath::root(VENDOR_OWNERS)?.doc(owner_id.as_str())
}

/// Stored shape of a vendor.
///
/// Optional fields serialize as `null` so a merge write clears them.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDocument {
    pub user_id: OwnerId,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
}

impl VendorDocument {
    pub fn new(owner_id: &OwnerId, profile: &VendorProfile) -> Self {
        Self {
            user_id: owner_id.clone(),
            shop_name: profile.shop_name.clone(),
            category: profile.category,
            contact: profile.contact.clone(),
            lat: profile.location.latitude,
            lng: profile.location.longitude,
            description: profile.description.clone(),
            opening_time: profile.opening_time.map(String::from),
            closing_time: profile.closing_time.map(String::from),
        }
    }

    /// Decode a stored vendor document.
    pub fn decode(document: &Document) -> Result<VendorRecord, StoreError> {
        let raw: Self = from_fields(document)?;
        let location =
            Coordinates::new(raw.lat, raw.lng).map_err(|e| StoreError::DataCorruption {
                path: document.path.clone(),
                message: e.to_string(),
            })?;

        Ok(VendorRecord {
            id: VendorId::new(document.id()),
            owner_id: raw.user_id,
            profile: VendorProfile {
                shop_name: raw.shop_name,
                category: raw.category,
                contact: raw.contact,
                location,
                description: non_blank(raw.description),
                opening_time: lenient_hours(document, "openingTime", raw.opening_time),
                closing_time: lenient_hours(document, "closingTime", raw.closing_time),
            },
        })
    }
}

/// Stored at `vendorOwners/{ownerId}`; whoever creates it owns the vendor ID.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerClaim {
    pub vendor_id: VendorId,
}

/// Stored shape of a catalog item.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemDocument {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl ItemDocument {
    pub fn new(item: &NewCatalogItem) -> Self {
        Self {
            name: item.name().to_owned(),
            price: item.price(),
            description: item.description().map(ToOwned::to_owned),
            available: true,
        }
    }

    /// Decode a stored item document.
    pub fn decode(document: &Document) -> Result<CatalogItem, StoreError> {
        let raw: Self = from_fields(document)?;
        Ok(CatalogItem {
            id: ItemId::new(document.id()),
            name: raw.name,
            price: raw.price,
            description: non_blank(raw.description),
            available: raw.available,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn lenient_hours(document: &Document, field: &str, raw: Option<String>) -> Option<ShopHours> {
    let raw = non_blank(raw)?;
    match ShopHours::parse(&raw) {
        Ok(hours) => Some(hours),
        Err(e) => {
            tracing::warn!(path = %document.path, field, error = %e, "Ignoring unreadable shop hours");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn document(path: &str, fields: Value) -> Document {
        let (collection, id) = path.split_once('/').unwrap();
        Document {
            path: CollectionPath::root(collection).unwrap().doc(id).unwrap(),
            fields: match fields {
                Value::Object(map) => map,
                _ => serde_json::Map::new(),
            },
        }
    }

    #[test]
    fn test_decode_web_client_vendor() {
        // Shape written by the original web dashboard.
        let doc = document(
            "vendors/abc",
            json!({
                "userId": "u1",
                "shopName": "Tea Stall",
                "category": "Food",
                "contact": "9999999999",
                "description": "",
                "openingTime": "",
                "closingTime": "22:00",
                "lat": 28.6,
                "lng": 77.2
            }),
        );

        let record = VendorDocument::decode(&doc).unwrap();
        assert_eq!(record.id.as_str(), "abc");
        assert_eq!(record.owner_id.as_str(), "u1");
        assert_eq!(record.profile.description, None);
        assert_eq!(record.profile.opening_time, None);
        assert_eq!(
            record.profile.closing_time.map(String::from).as_deref(),
            Some("22:00")
        );
    }

    #[test]
    fn test_decode_ignores_bad_hours() {
        let doc = document(
            "vendors/abc",
            json!({"userId": "u1", "shopName": "S", "contact": "c", "lat": 1.0, "lng": 2.0, "openingTime": "dawn"}),
        );
        assert_eq!(VendorDocument::decode(&doc).unwrap().profile.opening_time, None);
    }

    #[test]
    fn test_decode_rejects_bad_coordinates() {
        let doc = document(
            "vendors/abc",
            json!({"userId": "u1", "lat": 500.0, "lng": 2.0}),
        );
        assert!(matches!(
            VendorDocument::decode(&doc),
            Err(StoreError::DataCorruption { .. })
        ));
    }

    #[test]
    fn test_decode_legacy_item_price() {
        let doc = document(
            "items/i1",
            json!({"name": "Chai", "price": 19.99, "description": "", "available": true}),
        );
        let item = ItemDocument::decode(&doc).unwrap();
        assert_eq!(item.price.to_string(), "19.99");
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_vendor_document_writes_nulls_for_cleared_fields() {
        let profile = VendorProfile {
            shop_name: "S".to_string(),
            category: Category::Grocery,
            contact: "c".to_string(),
            location: Coordinates::DEFAULT,
            description: None,
            opening_time: None,
            closing_time: None,
        };
        let json = serde_json::to_value(VendorDocument::new(&OwnerId::new("u1"), &profile)).unwrap();
        assert_eq!(json["description"], Value::Null);
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["category"], "Grocery");
    }
}
