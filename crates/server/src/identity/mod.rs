//! Identity provider adapter.
//!
//! Authentication is delegated to an external provider behind the
//! [`IdentityProvider`] trait. The signed-in identity is carried
//! explicitly: by an [`IdentitySession`] for long-lived clients (CLI,
//! tests), and by the HTTP session cookie in the server.

mod error;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use smart_bazaar_core::Identity;

pub use error::IdentityError;
pub use local::LocalIdentityProvider;

/// Sign-up, sign-in and sign-out against an identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account. The vendor flag is recorded once and never
    /// changed.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        is_vendor: bool,
    ) -> Result<Identity, IdentityError>;

    /// Authenticate an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// End the identity's provider-side session, if the provider keeps one.
    async fn sign_out(&self, identity: &Identity) -> Result<(), IdentityError>;
}

/// The current identity of one client, with change notification.
///
/// Subscribers receive `Some(identity)` after sign-up or sign-in and
/// `None` after sign-out.
pub struct IdentitySession {
    provider: Arc<dyn IdentityProvider>,
    current: watch::Sender<Option<Identity>>,
}

impl IdentitySession {
    /// Create a signed-out session.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (current, _) = watch::channel(None);
        Self { provider, current }
    }

    /// The identity signed in right now.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Observe identity changes. The receiver starts with the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }

    /// Register and sign in.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the session is left unchanged.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        is_vendor: bool,
    ) -> Result<Identity, IdentityError> {
        let identity = self.provider.sign_up(email, password, is_vendor).await?;
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the session is left unchanged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let identity = self.provider.sign_in(email, password).await?;
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    /// Sign out. A no-op when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the session is left signed in.
    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        let Some(identity) = self.current() else {
            return Ok(());
        };
        self.provider.sign_out(&identity).await?;
        self.current.send_replace(None);
        Ok(())
    }
}
