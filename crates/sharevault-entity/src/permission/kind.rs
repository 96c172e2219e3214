//! Permission kind catalog model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named capability such as "read", "edit", "delete", or "share".
///
/// Kinds are always resolved by name. A name that does not map to any
/// kind grants nothing (fail closed), so retiring a permission name is
/// safe.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionKind {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Unique capability name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the kind was created.
    pub created_at: DateTime<Utc>,
}

/// Well-known capability names seeded by the initial migration.
pub mod names {
    /// Read a file or folder.
    pub const READ: &str = "read";
    /// Modify contents or metadata.
    pub const EDIT: &str = "edit";
    /// Delete the resource.
    pub const DELETE: &str = "delete";
    /// Grant or revoke permissions on the resource.
    pub const SHARE: &str = "share";
}
