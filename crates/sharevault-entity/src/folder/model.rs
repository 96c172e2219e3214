//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in the file hierarchy.
///
/// Folders form a tree through `parent_id`. The tree property is not
/// enforced by the data model; reparenting must reject any new parent
/// that is the folder itself or one of its descendants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// The folder owner.
    pub owner_id: Uuid,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<Uuid>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// The folder owner.
    pub owner_id: Uuid,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
}
