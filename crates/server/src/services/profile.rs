//! Vendor profile record manager.

use smart_bazaar_core::{
    Coordinates, OwnerId, VendorDraft, VendorId, VendorProfile, VendorProfileUpdate, VendorRecord,
};

use super::ServiceError;
use super::documents::{
    OwnerClaim, VendorDocument, items, owner_claim_path, vendor_path, vendors,
};
use crate::geolocation::{GeolocationSource, position_or};
use crate::store::{
    DocumentStore, FieldFilter, StoreError, from_fields, new_document_id, to_fields,
};

/// Loads and saves the signed-in vendor's own shop record.
///
/// An owner has at most one vendor record. The first save claims
/// `vendorOwners/{ownerId}` with `create_document`, so two concurrent first
/// saves agree on a single vendor ID.
pub struct VendorProfileManager<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> VendorProfileManager<'a> {
    /// Create a manager over the given store.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Find the vendor record owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the query fails or the stored record
    /// cannot be decoded.
    pub async fn load_own_record(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Option<VendorRecord>, ServiceError> {
        let filter = FieldFilter::eq("userId", owner_id.as_str());
        let documents = self
            .store
            .query_collection(&vendors()?, Some(&filter))
            .await?;

        if documents.len() > 1 {
            tracing::warn!(
                owner = %owner_id,
                count = documents.len(),
                "Owner has several vendor records, using the oldest"
            );
        }

        Ok(documents
            .first()
            .map(VendorDocument::decode)
            .transpose()?)
    }

    /// Create or update the owner's vendor record.
    ///
    /// Fields absent from `update` keep their stored values. A first save
    /// must carry every required field.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidProfile` if the merged profile is
    /// invalid; nothing is written in that case.
    /// Returns `ServiceError::Store` if a read or write fails.
    pub async fn save(
        &self,
        owner_id: &OwnerId,
        update: VendorProfileUpdate,
    ) -> Result<VendorRecord, ServiceError> {
        if let Some(existing) = self.load_own_record(owner_id).await? {
            return self
                .write_merged(owner_id, existing.id, Some(existing.profile), update)
                .await;
        }

        // Validate before claiming so a rejected form leaves no trace.
        let profile = update.clone().apply(None)?;
        let vendor_id = VendorId::new(new_document_id());
        let claim_path = owner_claim_path(owner_id)?;
        let claim = OwnerClaim {
            vendor_id: vendor_id.clone(),
        };

        match self
            .store
            .create_document(&claim_path, to_fields(&claim)?)
            .await
        {
            Ok(()) => {
                let path = vendor_path(&vendor_id)?;
                let document = VendorDocument::new(owner_id, &profile);
                self.store
                    .set_document(&path, to_fields(&document)?, true)
                    .await?;

                tracing::info!(owner = %owner_id, vendor = %vendor_id, "Vendor record created");

                Ok(VendorRecord {
                    id: vendor_id,
                    owner_id: owner_id.clone(),
                    profile,
                })
            }
            Err(StoreError::AlreadyExists(_)) => {
                let claimed = self.claimed_vendor(owner_id).await?;
                tracing::debug!(owner = %owner_id, vendor = %claimed, "Vendor already claimed, merging");

                let current = match self.store.get_document(&vendor_path(&claimed)?).await? {
                    Some(document) => Some(VendorDocument::decode(&document)?.profile),
                    None => None,
                };
                self.write_merged(owner_id, claimed, current, update).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Form defaults for a vendor with no saved record: the device
    /// position, or `fallback` when it is unavailable.
    pub async fn draft_for_new_vendor(
        &self,
        geolocation: &dyn GeolocationSource,
        fallback: Coordinates,
    ) -> VendorDraft {
        let (location, from_device) = position_or(geolocation, fallback).await;
        VendorDraft {
            location,
            from_device,
        }
    }

    /// Delete the owner's vendor record together with its catalog and
    /// ownership claim. Returns `false` if the owner had no record.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if a delete fails; items removed before
    /// the failure stay removed.
    pub async fn delete(&self, owner_id: &OwnerId) -> Result<bool, ServiceError> {
        let Some(record) = self.load_own_record(owner_id).await? else {
            return Ok(false);
        };

        let catalog = self.store.query_collection(&items(&record.id)?, None).await?;
        for item in &catalog {
            self.store.delete_document(&item.path).await?;
        }
        self.store.delete_document(&vendor_path(&record.id)?).await?;
        self.store
            .delete_document(&owner_claim_path(owner_id)?)
            .await?;

        tracing::info!(
            owner = %owner_id,
            vendor = %record.id,
            items = catalog.len(),
            "Vendor record deleted"
        );

        Ok(true)
    }

    async fn claimed_vendor(&self, owner_id: &OwnerId) -> Result<VendorId, ServiceError> {
        let document = self
            .store
            .get_document(&owner_claim_path(owner_id)?)
            .await?
            .ok_or_else(|| ServiceError::BrokenClaim {
                owner: owner_id.to_string(),
            })?;
        let claim: OwnerClaim = from_fields(&document)?;
        Ok(claim.vendor_id)
    }

    async fn write_merged(
        &self,
        owner_id: &OwnerId,
        vendor_id: VendorId,
        base: Option<VendorProfile>,
        update: VendorProfileUpdate,
    ) -> Result<VendorRecord, ServiceError> {
        let profile = update.apply(base)?;
        let path = vendor_path(&vendor_id).map_err(|_| ServiceError::BrokenClaim {
            owner: owner_id.to_string(),
        })?;
        let document = VendorDocument::new(owner_id, &profile);
        self.store
            .set_document(&path, to_fields(&document)?, true)
            .await?;

        tracing::info!(owner = %owner_id, vendor = %vendor_id, "Vendor record updated");

        Ok(VendorRecord {
            id: vendor_id,
            owner_id: owner_id.clone(),
            profile,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use smart_bazaar_core::{Category, NewCatalogItem, VendorProfileError};

    use super::*;
    use crate::geolocation::{FixedPosition, Unavailable};
    use crate::services::CatalogManager;
    use crate::store::MemoryStore;

    fn tea_stall() -> VendorProfileUpdate {
        VendorProfileUpdate {
            shop_name: Some("Tea Stall".to_string()),
            category: Some(Category::Food),
            contact: Some("9999999999".to_string()),
            lat: Some(28.6),
            lng: Some(77.2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_without_record() {
        let store = MemoryStore::new();
        let manager = VendorProfileManager::new(&store);
        assert!(
            manager
                .load_own_record(&OwnerId::new("u1"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_save_creates_then_merges() {
        let store = MemoryStore::new();
        let manager = VendorProfileManager::new(&store);
        let owner = OwnerId::new("u1");

        let created = manager.save(&owner, tea_stall()).await.unwrap();
        assert_eq!(created.owner_id, owner);

        let updated = manager
            .save(
                &owner,
                VendorProfileUpdate {
                    contact: Some("8888888888".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.profile.contact, "8888888888");
        assert_eq!(updated.profile.shop_name, "Tea Stall");

        let loaded = manager.load_own_record(&owner).await.unwrap().unwrap();
        assert_eq!(loaded, updated);
    }

    #[tokio::test]
    async fn test_invalid_first_save_writes_nothing() {
        let store = MemoryStore::new();
        let manager = VendorProfileManager::new(&store);

        let result = manager
            .save(
                &OwnerId::new("u1"),
                VendorProfileUpdate {
                    shop_name: Some("Tea Stall".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::InvalidProfile(VendorProfileError::MissingField(_)))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_first_saves_share_one_record() {
        let store = MemoryStore::new();
        let manager = VendorProfileManager::new(&store);
        let owner = OwnerId::new("u1");

        let mut other = tea_stall();
        other.shop_name = Some("Chai Point".to_string());

        let (a, b) = tokio::join!(manager.save(&owner, tea_stall()), manager.save(&owner, other));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.id, b.id);

        let all = store
            .query_collection(&vendors().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_save_merges_into_record_without_claim() {
        // Records written before ownership claims existed.
        let store = MemoryStore::new();
        let path = vendor_path(&VendorId::new("legacy")).unwrap();
        let fields = json!({
            "userId": "u1",
            "shopName": "Old Shop",
            "category": "Grocery",
            "contact": "123",
            "lat": 12.0,
            "lng": 77.0
        });
        store
            .set_document(&path, fields.as_object().unwrap().clone(), false)
            .await
            .unwrap();

        let manager = VendorProfileManager::new(&store);
        let saved = manager
            .save(
                &OwnerId::new("u1"),
                VendorProfileUpdate {
                    description: Some("Fresh produce".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(saved.id.as_str(), "legacy");
        assert_eq!(saved.profile.shop_name, "Old Shop");
        assert_eq!(saved.profile.description.as_deref(), Some("Fresh produce"));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let store = MemoryStore::new();
        let manager = VendorProfileManager::new(&store);
        let owner = OwnerId::new("u1");
        let record = manager.save(&owner, tea_stall()).await.unwrap();

        let catalog = CatalogManager::new(&store);
        catalog
            .add_item(&record.id, NewCatalogItem::parse("Chai", "10", None).unwrap())
            .await
            .unwrap();

        assert!(manager.delete(&owner).await.unwrap());
        assert!(store.is_empty().await);
        assert!(!manager.delete(&owner).await.unwrap());

        // The owner can start over.
        let again = manager.save(&owner, tea_stall()).await.unwrap();
        assert_ne!(again.id, record.id);
    }

    #[tokio::test]
    async fn test_draft_uses_device_or_fallback() {
        let store = MemoryStore::new();
        let manager = VendorProfileManager::new(&store);
        let mumbai = Coordinates::new(19.076, 72.8777).unwrap();

        let draft = manager
            .draft_for_new_vendor(&FixedPosition(mumbai), Coordinates::DEFAULT)
            .await;
        assert_eq!(draft.location, mumbai);
        assert!(draft.from_device);

        let draft = manager
            .draft_for_new_vendor(&Unavailable, Coordinates::DEFAULT)
            .await;
        assert_eq!(draft.location, Coordinates::DEFAULT);
        assert!(!draft.from_device);
    }
}
