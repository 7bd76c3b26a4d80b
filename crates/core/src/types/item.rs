//! Catalog items offered by a vendor.

use serde::{Deserialize, Serialize};

use super::{ItemId, Price, PriceError};

/// Errors that can occur when building a [`NewCatalogItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogItemError {
    /// The item name is blank.
    #[error("item name cannot be empty")]
    EmptyName,
    /// The price did not parse.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// A product or service listed by a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Document ID under the vendor's `items` collection.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the vendor currently has it in stock.
    pub available: bool,
}

/// A validated item ready to be added to a catalog.
///
/// New items are always created as available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogItem {
    name: String,
    price: Price,
    description: Option<String>,
}

impl NewCatalogItem {
    /// Build a new item from an already-parsed price.
    ///
    /// The name is trimmed; a blank description is dropped.
    ///
    /// # Errors
    ///
    /// Returns `CatalogItemError::EmptyName` if the name is blank.
    pub fn new(
        name: &str,
        price: Price,
        description: Option<&str>,
    ) -> Result<Self, CatalogItemError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogItemError::EmptyName);
        }

        Ok(Self {
            name: name.to_owned(),
            price,
            description: non_blank(description),
        })
    }

    /// Parse a new item from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the price does not parse.
    pub fn parse(
        name: &str,
        price: &str,
        description: Option<&str>,
    ) -> Result<Self, CatalogItemError> {
        let price = Price::parse(price)?;
        Self::new(name, price, description)
    }

    /// Item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attach the store-assigned ID, producing the persisted item.
    #[must_use]
    pub fn into_item(self, id: ItemId) -> CatalogItem {
        CatalogItem {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            available: true,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let item = NewCatalogItem::parse(" Chai ", "10.5", Some("  ")).unwrap();
        assert_eq!(item.name(), "Chai");
        assert_eq!(item.price().to_string(), "10.50");
        assert_eq!(item.description(), None);
    }

    #[test]
    fn test_parse_rejects_blank_name() {
        assert_eq!(
            NewCatalogItem::parse("  ", "10", None),
            Err(CatalogItemError::EmptyName)
        );
    }

    #[test]
    fn test_parse_rejects_bad_price() {
        assert_eq!(
            NewCatalogItem::parse("Chai", "", None),
            Err(CatalogItemError::Price(PriceError::Empty))
        );
    }

    #[test]
    fn test_into_item_is_available() {
        let item = NewCatalogItem::parse("Samosa", "15", Some("Potato filling"))
            .unwrap()
            .into_item(ItemId::new("i1"));
        assert!(item.available);
        assert_eq!(item.description.as_deref(), Some("Potato filling"));
    }
}
