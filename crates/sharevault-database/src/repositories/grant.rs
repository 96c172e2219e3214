//! Grant repository: the persisted side of the grant store.
//!
//! Reads are keyed lookups over four relations: resource ownership,
//! direct grants, role membership, and role grants. Writes are used by
//! the sharing service and the admin CLI.

use sqlx::PgPool;
use uuid::Uuid;

use sharevault_core::error::{AppError, ErrorKind};
use sharevault_core::result::AppResult;
use sharevault_entity::permission::{DirectGrant, PermissionKind, RoleGrant};
use sharevault_entity::role::Role;

/// Everything one permission decision needs, read atomically.
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct GrantSnapshot {
    /// The resource's owner, if the resource exists.
    pub owner_id: Option<Uuid>,
    /// The capability's catalog ID, if the name is known.
    pub kind_id: Option<Uuid>,
    /// Whether a direct grant covers (resource, subject, capability).
    pub has_direct_grant: bool,
    /// Whether any of the subject's roles holds the capability on the
    /// resource (or globally).
    pub has_role_grant: bool,
}

/// Repository over the permission catalog and grant relations.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a permission kind by name.
    pub async fn find_kind_by_name(&self, name: &str) -> AppResult<Option<PermissionKind>> {
        sqlx::query_as::<_, PermissionKind>("SELECT * FROM permission_kinds WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve permission kind", e)
            })
    }

    /// Read everything a single permission decision needs.
    ///
    /// One statement, so the whole read runs against one MVCC snapshot:
    /// a decision can never combine grant states that did not coexist.
    /// Resource ownership covers both files and folders; role grants
    /// with a NULL resource scope apply globally.
    pub async fn grant_snapshot(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<GrantSnapshot> {
        sqlx::query_as::<_, GrantSnapshot>(
            "SELECT \
                (SELECT owner_id FROM files WHERE id = $1 \
                 UNION ALL \
                 SELECT owner_id FROM folders WHERE id = $1 \
                 LIMIT 1) AS owner_id, \
                k.id AS kind_id, \
                (k.id IS NOT NULL AND EXISTS( \
                    SELECT 1 FROM direct_grants \
                    WHERE resource_id = $1 AND user_id = $2 AND permission_id = k.id \
                )) AS has_direct_grant, \
                (k.id IS NOT NULL AND EXISTS( \
                    SELECT 1 FROM role_grants rg \
                    JOIN role_memberships rm ON rm.role_id = rg.role_id \
                    WHERE rm.user_id = $2 AND rg.permission_id = k.id \
                      AND (rg.resource_id = $1 OR rg.resource_id IS NULL) \
                )) AS has_role_grant \
             FROM (VALUES (1)) AS one(x) \
             LEFT JOIN permission_kinds k ON k.name = $3",
        )
        .bind(resource_id)
        .bind(user_id)
        .bind(permission_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read grant snapshot", e)
        })
    }

    /// List the direct grants on a resource.
    pub async fn list_direct_grants(&self, resource_id: Uuid) -> AppResult<Vec<DirectGrant>> {
        sqlx::query_as::<_, DirectGrant>(
            "SELECT * FROM direct_grants WHERE resource_id = $1 ORDER BY created_at",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list direct grants", e))
    }

    /// List the role grants scoped to a resource.
    pub async fn list_role_grants(&self, resource_id: Uuid) -> AppResult<Vec<RoleGrant>> {
        sqlx::query_as::<_, RoleGrant>(
            "SELECT * FROM role_grants WHERE resource_id = $1 ORDER BY created_at",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list role grants", e))
    }

    /// Record a direct grant. Idempotent: re-granting an existing triple
    /// is a no-op.
    pub async fn insert_direct_grant(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_id: Uuid,
        granted_by: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO direct_grants (resource_id, user_id, permission_id, granted_by) \
             VALUES ($1, $2, $3, $4) ON CONFLICT DO NOTHING",
        )
        .bind(resource_id)
        .bind(user_id)
        .bind(permission_id)
        .bind(granted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert grant", e))?;
        Ok(())
    }

    /// Remove a direct grant. Returns `true` if a grant was removed.
    pub async fn delete_direct_grant(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM direct_grants \
             WHERE resource_id = $1 AND user_id = $2 AND permission_id = $3",
        )
        .bind(resource_id)
        .bind(user_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete grant", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a role grant, optionally scoped to a resource.
    pub async fn insert_role_grant(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
        resource_id: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_grants (role_id, permission_id, resource_id) \
             VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .bind(resource_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert role grant", e)
        })?;
        Ok(())
    }

    /// Find a role by name.
    pub async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    /// Create a role.
    pub async fn create_role(&self, name: &str, description: Option<&str>) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create role", e))
    }

    /// Add a user to a role.
    pub async fn add_role_member(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_memberships (user_id, role_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add role member", e))?;
        Ok(())
    }
}
