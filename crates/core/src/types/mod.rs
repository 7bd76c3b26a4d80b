//! Core types for Smart Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod geo;
pub mod id;
pub mod identity;
pub mod item;
pub mod price;
pub mod vendor;

pub use email::{Email, EmailError};
pub use geo::{Coordinates, CoordinatesError};
pub use id::*;
pub use identity::Identity;
pub use item::{CatalogItem, CatalogItemError, NewCatalogItem};
pub use price::{Price, PriceError};
pub use vendor::{
    Category, ShopHours, ShopHoursError, VendorDraft, VendorProfile, VendorProfileError,
    VendorProfileUpdate, VendorRecord,
};
