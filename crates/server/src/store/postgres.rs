//! `PostgreSQL`-backed document store.
//!
//! # Table: `bazaar.documents`
//!
//! One row per document, keyed by full path, with the fields in a JSONB
//! column. See `migrations/0001_documents.sql`.
//!
//! # Migrations
//!
//! The schema is created explicitly, never on server startup:
//! ```bash
//! cargo run -p smart-bazaar-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use super::{
    CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields, StoreError,
    new_document_id,
};

/// Schema for the documents table.
pub const SCHEMA_SQL: &str = include_str!("../../migrations/0001_documents.sql");

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the documents table and its indexes if they do not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if the statements fail.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

/// Document store over a `PostgreSQL` JSONB table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store using an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_fields(path: &DocumentPath, value: Value) -> Result<Fields, StoreError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::DataCorruption {
            path: path.clone(),
            message: format!("fields column is not an object: {other}"),
        }),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT fields FROM bazaar.documents WHERE path = $1")
            .bind(path.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Json(value): Json<Value> = row.try_get("fields")?;
        Ok(Some(Document {
            path: path.clone(),
            fields: decode_fields(path, value)?,
        }))
    }

    async fn set_document(
        &self,
        path: &DocumentPath,
        fields: Fields,
        merge: bool,
    ) -> Result<(), StoreError> {
        let sql = if merge {
            r"
            INSERT INTO bazaar.documents (path, collection, fields)
            VALUES ($1, $2, $3)
            ON CONFLICT (path) DO UPDATE
            SET fields = bazaar.documents.fields || EXCLUDED.fields,
                updated_at = now()
            "
        } else {
            r"
            INSERT INTO bazaar.documents (path, collection, fields)
            VALUES ($1, $2, $3)
            ON CONFLICT (path) DO UPDATE
            SET fields = EXCLUDED.fields,
                updated_at = now()
            "
        };

        sqlx::query(sql)
            .bind(path.as_str())
            .bind(path.parent().as_str())
            .bind(Json(Value::Object(fields)))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocumentPath, StoreError> {
        let path = collection.doc(&new_document_id())?;

        sqlx::query(
            r"
            INSERT INTO bazaar.documents (path, collection, fields)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(path.as_str())
        .bind(collection.as_str())
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await?;

        Ok(path)
    }

    async fn create_document(
        &self,
        path: &DocumentPath,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            INSERT INTO bazaar.documents (path, collection, fields)
            VALUES ($1, $2, $3)
            ON CONFLICT (path) DO NOTHING
            ",
        )
        .bind(path.as_str())
        .bind(path.parent().as_str())
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(path.clone()));
        }

        Ok(())
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM bazaar.documents WHERE path = $1")
            .bind(path.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn query_collection(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = match filter {
            Some(filter) => {
                sqlx::query(
                    r"
                    SELECT path, fields
                    FROM bazaar.documents
                    WHERE collection = $1
                      AND fields @> jsonb_build_object($2::text, $3::jsonb)
                    ORDER BY seq ASC
                    ",
                )
                .bind(collection.as_str())
                .bind(&filter.field)
                .bind(Json(&filter.value))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r"
                    SELECT path, fields
                    FROM bazaar.documents
                    WHERE collection = $1
                    ORDER BY seq ASC
                    ",
                )
                .bind(collection.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let path: String = row.try_get("path")?;
            let Json(value): Json<Value> = row.try_get("fields")?;
            let path = DocumentPath(path);
            let fields = decode_fields(&path, value)?;
            documents.push(Document { path, fields });
        }

        Ok(documents)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
