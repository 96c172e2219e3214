//! Grant entities.
//!
//! Grants are strictly additive: access is the union of ownership,
//! direct grants, and role-derived grants. There is no deny entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An explicit per-subject, per-resource capability, independent of roles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DirectGrant {
    /// The resource (file or folder) granted on.
    pub resource_id: Uuid,
    /// The subject receiving the capability.
    pub user_id: Uuid,
    /// The granted permission kind.
    pub permission_id: Uuid,
    /// Who created the grant.
    pub granted_by: Uuid,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

/// A capability granted to every member of a role.
///
/// When `resource_id` is `None` the grant is global; otherwise it applies
/// to that single resource.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleGrant {
    /// The role whose members receive the capability.
    pub role_id: Uuid,
    /// The granted permission kind.
    pub permission_id: Uuid,
    /// Scope: a single resource, or None for a global grant.
    pub resource_id: Option<Uuid>,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}
