//! Grant management on files and folders.
//!
//! Only a subject who owns the resource or holds the "share" capability
//! on it may view or mutate its grants. The resolver's ownership bypass
//! covers the owner case, so the gate is a single `has_permission` call.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sharevault_auth::access::PermissionResolver;
use sharevault_core::error::AppError;
use sharevault_core::result::AppResult;
use sharevault_database::repositories::GrantRepository;
use sharevault_entity::permission::{DirectGrant, PermissionKind, RoleGrant, names};

/// All grants attached to one resource.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResourceGrants {
    /// Per-user grants.
    pub direct: Vec<DirectGrant>,
    /// Role grants scoped to this resource.
    pub role: Vec<RoleGrant>,
}

/// Manages direct and role grants on resources.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Grant repository.
    grant_repo: Arc<GrantRepository>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(grant_repo: Arc<GrantRepository>, resolver: Arc<PermissionResolver>) -> Self {
        Self {
            grant_repo,
            resolver,
        }
    }

    /// Grants a capability on a resource directly to a user.
    pub async fn grant_direct(
        &self,
        actor_id: Uuid,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<()> {
        self.require_share(resource_id, actor_id).await?;
        let kind = self.known_kind(permission_name).await?;

        self.grant_repo
            .insert_direct_grant(resource_id, user_id, kind.id, actor_id)
            .await?;

        info!(
            actor_id = %actor_id,
            resource_id = %resource_id,
            user_id = %user_id,
            permission = permission_name,
            "Direct grant added"
        );
        Ok(())
    }

    /// Revokes a direct grant. Returns `true` if a grant was removed.
    pub async fn revoke_direct(
        &self,
        actor_id: Uuid,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<bool> {
        self.require_share(resource_id, actor_id).await?;
        let kind = self.known_kind(permission_name).await?;

        let removed = self
            .grant_repo
            .delete_direct_grant(resource_id, user_id, kind.id)
            .await?;

        if removed {
            info!(
                actor_id = %actor_id,
                resource_id = %resource_id,
                user_id = %user_id,
                permission = permission_name,
                "Direct grant revoked"
            );
        }
        Ok(removed)
    }

    /// Grants a capability on a resource to every member of a role.
    pub async fn grant_role(
        &self,
        actor_id: Uuid,
        resource_id: Uuid,
        role_name: &str,
        permission_name: &str,
    ) -> AppResult<()> {
        self.require_share(resource_id, actor_id).await?;
        let kind = self.known_kind(permission_name).await?;

        let role = self
            .grant_repo
            .find_role_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        // Sharing only produces resource-scoped grants; global grants
        // are an administrative operation.
        self.grant_repo
            .insert_role_grant(role.id, kind.id, Some(resource_id))
            .await?;

        info!(
            actor_id = %actor_id,
            resource_id = %resource_id,
            role = role_name,
            permission = permission_name,
            "Role grant added"
        );
        Ok(())
    }

    /// Lists all grants attached to a resource.
    pub async fn list_grants(&self, actor_id: Uuid, resource_id: Uuid) -> AppResult<ResourceGrants> {
        self.require_share(resource_id, actor_id).await?;

        let direct = self.grant_repo.list_direct_grants(resource_id).await?;
        let role = self.grant_repo.list_role_grants(resource_id).await?;
        Ok(ResourceGrants { direct, role })
    }

    async fn require_share(&self, resource_id: Uuid, actor_id: Uuid) -> AppResult<()> {
        if self
            .resolver
            .has_permission(resource_id, actor_id, names::SHARE)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You do not have permission to manage sharing on this resource",
            ))
        }
    }

    async fn known_kind(&self, permission_name: &str) -> AppResult<PermissionKind> {
        self.grant_repo
            .find_kind_by_name(permission_name)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Unknown permission kind '{permission_name}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sharevault_auth::access::InMemoryGrantStore;
    use sharevault_core::config::DatabaseConfig;
    use sharevault_core::error::ErrorKind;
    use sharevault_database::DatabasePool;

    // The share gate runs before any repository access, so these tests
    // back the service with a lazy pool that never reaches a server;
    // grants live in the in-memory store behind the resolver.
    fn offline_grant_repo() -> Arc<GrantRepository> {
        let config = DatabaseConfig {
            url: "postgres://vault@localhost:1/offline".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        };
        let db = DatabasePool::connect_lazy(&config).unwrap();
        Arc::new(GrantRepository::new(db.into_pool()))
    }

    fn harness() -> (Arc<InMemoryGrantStore>, ShareService) {
        let store = Arc::new(InMemoryGrantStore::new());
        let resolver = Arc::new(PermissionResolver::new(store.clone()));
        let service = ShareService::new(offline_grant_repo(), resolver);
        (store, service)
    }

    #[tokio::test]
    async fn test_grant_direct_denied_without_share_capability() {
        let (store, service) = harness();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        store.add_kind(names::SHARE);

        let stranger = Uuid::new_v4();
        let err = service
            .grant_direct(stranger, file, Uuid::new_v4(), "read")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_revoke_direct_denied_without_share_capability() {
        let (store, service) = harness();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        store.add_kind(names::SHARE);

        let err = service
            .revoke_direct(Uuid::new_v4(), file, Uuid::new_v4(), "read")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_grant_role_denied_without_share_capability() {
        let (store, service) = harness();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        store.add_kind(names::SHARE);

        let err = service
            .grant_role(Uuid::new_v4(), file, "editors", "edit")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_list_grants_denied_without_share_capability() {
        let (store, service) = harness();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        store.add_kind(names::SHARE);

        let err = service
            .list_grants(Uuid::new_v4(), file)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_owner_clears_the_share_gate() {
        let (store, service) = harness();
        let owner = Uuid::new_v4();
        let file = Uuid::new_v4();
        store.add_resource(file, owner);

        // The owner passes the gate; the call then reaches the offline
        // repository and fails there, not with an authorization error.
        let err = service.list_grants(owner, file).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_share_capability_holder_clears_the_gate() {
        let (store, service) = harness();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        let share = store.add_kind(names::SHARE);

        let delegate = Uuid::new_v4();
        store.add_direct_grant(file, delegate, share);

        let err = service.list_grants(delegate, file).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
