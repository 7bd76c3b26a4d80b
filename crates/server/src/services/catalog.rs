//! Item catalog manager.

use smart_bazaar_core::{CatalogItem, ItemId, NewCatalogItem, VendorId};

use super::ServiceError;
use super::documents::{ItemDocument, items};
use crate::store::{DocumentStore, to_fields};

/// Lists, adds and removes the items under `vendors/{id}/items`.
pub struct CatalogManager<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CatalogManager<'a> {
    /// Create a manager over the given store.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All items of a vendor, oldest first.
    ///
    /// Items that cannot be decoded are skipped with a warning so one bad
    /// document does not hide the rest of the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the query fails.
    pub async fn list_items(&self, vendor_id: &VendorId) -> Result<Vec<CatalogItem>, ServiceError> {
        let documents = self
            .store
            .query_collection(&items(vendor_id)?, None)
            .await?;

        Ok(documents
            .iter()
            .filter_map(|doc| match ItemDocument::decode(doc) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(path = %doc.path, error = %e, "Skipping unreadable catalog item");
                    None
                }
            })
            .collect())
    }

    /// Add an item. It is created as available.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the write fails.
    pub async fn add_item(
        &self,
        vendor_id: &VendorId,
        item: NewCatalogItem,
    ) -> Result<CatalogItem, ServiceError> {
        let collection = items(vendor_id)?;
        let fields = to_fields(&ItemDocument::new(&item))?;
        let path = self.store.add_document(&collection, fields).await?;

        tracing::info!(vendor = %vendor_id, item = path.id(), "Catalog item added");

        Ok(item.into_item(ItemId::new(path.id())))
    }

    /// Remove an item. Removing an unknown item succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the delete fails.
    pub async fn remove_item(&self, vendor_id: &VendorId, item_id: &ItemId) -> Result<(), ServiceError> {
        let path = items(vendor_id)?.doc(item_id.as_str())?;
        self.store.delete_document(&path).await?;

        tracing::info!(vendor = %vendor_id, item = %item_id, "Catalog item removed");

        Ok(())
    }
}
