//! Identity provider backed by the document store.
//!
//! Stands in for a hosted authentication service. Passwords are hashed with
//! Argon2id and kept under `credentials/{key}`, where the key is the
//! percent-encoded email so any valid address forms a single path segment.
//! The vendor flag lives in the companion `users/{uid}` document, which is
//! also what a hosted provider setup would write at registration.
//!
//! Sign-up writes `users/{uid}` before claiming the credential. A failure
//! between the two leaves only an unreferenced users document, and the
//! email stays free for a retry.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use smart_bazaar_core::{Email, Identity, OwnerId};

use super::{IdentityError, IdentityProvider};
use crate::store::{
    CollectionPath, DocumentPath, DocumentStore, StoreError, from_fields, new_document_id,
    to_fields,
};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

const USERS: &str = "users";
const CREDENTIALS: &str = "credentials";

/// Companion record stored at `users/{uid}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub email: Email,
    #[serde(default)]
    pub is_vendor: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialDocument {
    uid: String,
    password_hash: String,
}

/// Identity provider storing accounts in a [`DocumentStore`].
#[derive(Clone)]
pub struct LocalIdentityProvider {
    store: Arc<dyn DocumentStore>,
}

impl LocalIdentityProvider {
    /// Create a provider over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn credential_path(email: &Email) -> Result<DocumentPath, StoreError> {
        let key: String = form_urlencoded::byte_serialize(email.as_str().as_bytes()).collect();
        CollectionPath::root(CREDENTIALS)?.doc(&key)
    }

    fn user_path(uid: &str) -> Result<DocumentPath, StoreError> {
        CollectionPath::root(USERS)?.doc(uid)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        is_vendor: bool,
    ) -> Result<Identity, IdentityError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let uid = new_document_id();
        let credential_path = Self::credential_path(&email)?;

        let user = UserDocument {
            email: email.clone(),
            is_vendor,
        };
        self.store
            .set_document(&Self::user_path(&uid)?, to_fields(&user)?, false)
            .await?;

        // Claiming the credential document is what makes emails unique.
        let credential = CredentialDocument {
            uid: uid.clone(),
            password_hash,
        };
        self.store
            .create_document(&credential_path, to_fields(&credential)?)
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => IdentityError::UserAlreadyExists,
                other => IdentityError::Store(other),
            })?;

        tracing::info!(uid = %uid, is_vendor, "Account registered");

        Ok(Identity {
            id: OwnerId::new(uid),
            email,
            is_vendor,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = Email::parse(email)?;

        let credential = self
            .store
            .get_document(&Self::credential_path(&email)?)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;
        let credential: CredentialDocument = from_fields(&credential)?;

        verify_password(password, &credential.password_hash)?;

        // Accounts without a companion record are plain customers.
        let is_vendor = match self
            .store
            .get_document(&Self::user_path(&credential.uid)?)
            .await?
        {
            Some(doc) => from_fields::<UserDocument>(&doc)?.is_vendor,
            None => false,
        };

        tracing::debug!(uid = %credential.uid, "Signed in");

        Ok(Identity {
            id: OwnerId::new(credential.uid),
            email,
            is_vendor,
        })
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), IdentityError> {
        tracing::debug!(uid = %identity.id, "Signed out");
        Ok(())
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(IdentityError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| IdentityError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), IdentityError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| IdentityError::InvalidCredentials)
}
