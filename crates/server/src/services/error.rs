//! Service error types.

use thiserror::Error;

use smart_bazaar_core::VendorProfileError;

use crate::store::StoreError;

/// Errors that can occur in the vendor and catalog managers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The submitted profile fields are invalid.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] VendorProfileError),

    /// The owner's claim points at a vendor ID that cannot be addressed.
    #[error("ownership claim for {owner} is unreadable")]
    BrokenClaim {
        /// Owner whose claim is broken.
        owner: String,
    },

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
