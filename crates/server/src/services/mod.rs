//! Business logic over the document store.
//!
//! Managers borrow the store for the duration of a request, the same way
//! route handlers build them from [`AppState`](crate::state::AppState).

mod catalog;
pub mod directory;
pub mod documents;
mod error;
mod profile;

pub use catalog::CatalogManager;
pub use directory::{
    DirectoryService, ShareLink, VendorWithCatalog, directions_url, share_link,
};
pub use error::ServiceError;
pub use profile::VendorProfileManager;
