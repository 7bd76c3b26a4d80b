//! Authentication extractors.
//!
//! The signed-in [`Identity`] is stored in the session at login and read
//! back by these extractors. Handlers receive it explicitly.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use smart_bazaar_core::Identity;

use crate::error::AppError;

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in identity.
    pub const CURRENT_IDENTITY: &str = "current_identity";
}

/// Extractor that requires a signed-in identity.
///
/// Responds 401 when nobody is signed in.
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_identity(parts)
            .await
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()))
    }
}

/// Extractor that requires a signed-in vendor.
///
/// Responds 401 when nobody is signed in and 403 for customer accounts.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireVendor(vendor): RequireVendor) -> String {
///     format!("Hello, {}!", vendor.email)
/// }
/// ```
pub struct RequireVendor(pub Identity);

impl<S> FromRequestParts<S> for RequireVendor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;
        if !identity.is_vendor {
            return Err(AppError::Forbidden(
                "Only vendor accounts can manage a shop".to_string(),
            ));
        }
        Ok(Self(identity))
    }
}

/// Extractor that optionally gets the signed-in identity.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_identity(parts).await))
    }
}

async fn current_identity(parts: &Parts) -> Option<Identity> {
    // Set by SessionManagerLayer
    let session = parts.extensions.get::<Session>()?;
    match session.get::<Identity>(keys::CURRENT_IDENTITY).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session, treating request as signed out");
            None
        }
    }
}

/// Store the signed-in identity in the session.
///
/// The session ID is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_identity(
    session: &Session,
    identity: &Identity,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_IDENTITY, identity).await
}

/// Clear the signed-in identity (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_identity(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::Request;
    use tower_sessions::session::{Id, Record};
    use tower_sessions::{SessionStore, session_store};

    use super::*;

    /// Session backend that is always unreachable.
    #[derive(Debug)]
    struct BrokenSessions;

    #[async_trait]
    impl SessionStore for BrokenSessions {
        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("connection refused".to_string()))
        }

        async fn load(&self, _session_id: &Id) -> session_store::Result<Option<Record>> {
            Err(session_store::Error::Backend("connection refused".to_string()))
        }

        async fn delete(&self, _session_id: &Id) -> session_store::Result<()> {
            Err(session_store::Error::Backend("connection refused".to_string()))
        }
    }

    fn parts_with_broken_session() -> Parts {
        let session = Session::new(Some(Id::default()), Arc::new(BrokenSessions), None);
        let (mut parts, ()) = Request::new(()).into_parts();
        parts.extensions.insert(session);
        parts
    }

    #[tokio::test]
    async fn test_unreadable_session_is_signed_out() {
        let mut parts = parts_with_broken_session();
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());

        let mut parts = parts_with_broken_session();
        let rejected = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(rejected, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_signed_out() {
        let (mut parts, ()) = Request::new(()).into_parts();
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());
    }
}
