//! Role and role membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named role that users can be members of.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

/// Membership of a user in a role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleMembership {
    /// The member user.
    pub user_id: Uuid,
    /// The role.
    pub role_id: Uuid,
    /// When the membership was granted.
    pub created_at: DateTime<Utc>,
}
