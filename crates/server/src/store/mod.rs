//! Document store adapter.
//!
//! Vendor data lives in a schemaless document store addressed by
//! slash-separated paths, the way hosted document databases address
//! records:
//!
//! ```text
//! users/{uid}                      companion record written at sign-up
//! credentials/{email}              password hash (local identity provider)
//! vendors/{vendorId}               shop profile
//! vendors/{vendorId}/items/{id}    catalog entries
//! vendorOwners/{ownerId}           one-vendor-per-owner claim
//! ```
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] - in-process, used by tests and local development
//! - [`PgDocumentStore`] - `PostgreSQL` JSONB table

pub mod memory;
pub mod postgres;

use core::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, Value>;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A path segment is empty or contains a slash.
    #[error("invalid path segment: {0:?}")]
    InvalidPath(String),

    /// `create_document` found an existing document.
    #[error("document already exists: {0}")]
    AlreadyExists(DocumentPath),

    /// Stored data could not be decoded.
    #[error("data corruption at {path}: {message}")]
    DataCorruption {
        /// Offending document.
        path: DocumentPath,
        /// What was wrong with it.
        message: String,
    },

    /// A value could not be encoded as document fields.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Paths
// =============================================================================

fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() || segment.contains('/') {
        return Err(StoreError::InvalidPath(segment.to_owned()));
    }
    Ok(())
}

/// Path of a collection: `vendors` or `vendors/{id}/items`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// A top-level collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` if the name is empty or contains `/`.
    pub fn root(name: &str) -> Result<Self, StoreError> {
        validate_segment(name)?;
        Ok(Self(name.to_owned()))
    }

    /// Address a document in this collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` if the ID is empty or contains `/`.
    pub fn doc(&self, id: &str) -> Result<DocumentPath, StoreError> {
        validate_segment(id)?;
        Ok(DocumentPath(format!("{}/{id}", self.0)))
    }

    /// The full path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document: `vendors/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Address a sub-collection nested under this document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` if the name is empty or contains `/`.
    pub fn collection(&self, name: &str) -> Result<CollectionPath, StoreError> {
        validate_segment(name)?;
        Ok(CollectionPath(format!("{}/{name}", self.0)))
    }

    /// The last path segment.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, id)| id)
    }

    /// The collection containing this document.
    #[must_use]
    pub fn parent(&self) -> CollectionPath {
        CollectionPath(
            self.0
                .rsplit_once('/')
                .map_or_else(String::new, |(parent, _)| parent.to_owned()),
        )
    }

    /// The full path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Documents
// =============================================================================

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub fields: Fields,
}

impl Document {
    /// The document ID (last path segment).
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.id()
    }
}

/// Equality filter on a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    /// Match documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the given fields satisfy this filter.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Collection/document CRUD over a schemaless store.
///
/// Every call is a single request; implementations do not retry.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if absent.
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Write a document. With `merge`, top-level fields are merged into an
    /// existing document; otherwise the document is replaced. Creates the
    /// document if it does not exist.
    async fn set_document(
        &self,
        path: &DocumentPath,
        fields: Fields,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Insert a document under a generated ID and return its path.
    async fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocumentPath, StoreError>;

    /// Insert a document only if nothing exists at `path`.
    ///
    /// Fails with `StoreError::AlreadyExists` otherwise. This is the
    /// check-and-set primitive used for uniqueness claims.
    async fn create_document(&self, path: &DocumentPath, fields: Fields)
    -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document succeeds.
    ///
    /// Sub-collections are not removed.
    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StoreError>;

    /// List documents directly inside a collection, in insertion order,
    /// optionally filtered on one field.
    async fn query_collection(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Generate a document ID.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Encode a serializable value as document fields.
///
/// # Errors
///
/// Returns `StoreError::Encode` if the value does not serialize to a JSON
/// object.
pub fn to_fields<T: serde::Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Encode(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

/// Decode document fields into a typed value.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if the fields do not match `T`.
pub fn from_fields<T: serde::de::DeserializeOwned>(document: &Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document.fields.clone())).map_err(|e| {
        StoreError::DataCorruption {
            path: document.path.clone(),
            message: e.to_string(),
        }
    })
}
