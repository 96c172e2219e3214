//! File entity model.
//!
//! Only file metadata lives here; the bytes themselves are held by an
//! external blob store and referenced through `blob_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored file's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// File name.
    pub name: String,
    /// The file owner.
    pub owner_id: Uuid,
    /// Containing folder (None for files at the root).
    pub folder_id: Option<Uuid>,
    /// Identifier of the blob in the external store.
    pub blob_id: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME content type.
    pub content_type: Option<String>,
    /// When the file record was created.
    pub created_at: DateTime<Utc>,
    /// When the file record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// File name.
    pub name: String,
    /// The file owner.
    pub owner_id: Uuid,
    /// Containing folder (None for root).
    pub folder_id: Option<Uuid>,
    /// Blob identifier in the external store.
    pub blob_id: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME content type.
    pub content_type: Option<String>,
}
