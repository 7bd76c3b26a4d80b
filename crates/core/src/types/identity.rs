//! Authenticated identity.

use serde::{Deserialize, Serialize};

use super::{Email, OwnerId};

/// A signed-in user as reported by the identity provider.
///
/// `is_vendor` is fixed at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned user ID.
    pub id: OwnerId,
    /// Sign-in email.
    pub email: Email,
    /// Whether the user registered as a vendor.
    pub is_vendor: bool,
}
