//! Permission resolver.
//!
//! Resolution order, short-circuiting on the first grant found:
//! 1. Ownership bypass — the owner holds every capability.
//! 2. Capability catalog — an unknown permission name denies (fail closed).
//! 3. Direct grant.
//! 4. Role-derived grant (resource-scoped or global).
//! 5. Deny.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use sharevault_core::result::AppResult;

use super::store::GrantStore;

/// Decides whether a subject may perform a named action on a resource.
///
/// Read-only and lock-free; denial is a normal `Ok(false)`, never an
/// error. Only storage failures surface as `Err`.
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn GrantStore>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a resolver over the given grant store.
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self { store }
    }

    /// Returns whether `user_id` may perform `permission_name` on
    /// `resource_id`.
    ///
    /// The ownership bypass is evaluated before the capability catalog
    /// lookup, so an owner is granted even for permission names that do
    /// not exist. Worth auditing whenever new capability names are
    /// introduced.
    pub async fn has_permission(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<bool> {
        let snapshot = self
            .store
            .grant_snapshot(resource_id, user_id, permission_name)
            .await?;

        // 1. Ownership bypass. A missing resource yields no owner and
        //    falls through to the remaining checks.
        if snapshot.owner_id == Some(user_id) {
            debug!(%resource_id, %user_id, permission = permission_name, "granted: owner");
            return Ok(true);
        }

        // 2. Unknown capability names never grant anything.
        if snapshot.kind_id.is_none() {
            debug!(
                %resource_id,
                %user_id,
                permission = permission_name,
                "denied: unknown capability"
            );
            return Ok(false);
        }

        // 3. Direct grant.
        if snapshot.has_direct_grant {
            debug!(%resource_id, %user_id, permission = permission_name, "granted: direct");
            return Ok(true);
        }

        // 4. Role-derived grant. Any matching role suffices; there is
        //    no need to enumerate every matching role.
        if snapshot.has_role_grant {
            debug!(%resource_id, %user_id, permission = permission_name, "granted: role");
            return Ok(true);
        }

        // 5. No grant found.
        debug!(%resource_id, %user_id, permission = permission_name, "denied");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::memory::InMemoryGrantStore;

    fn setup() -> (Arc<InMemoryGrantStore>, PermissionResolver) {
        let store = Arc::new(InMemoryGrantStore::new());
        let resolver = PermissionResolver::new(store.clone());
        (store, resolver)
    }

    #[tokio::test]
    async fn test_owner_has_every_permission() {
        let (store, resolver) = setup();
        let owner = Uuid::new_v4();
        let file = Uuid::new_v4();
        store.add_resource(file, owner);
        store.add_kind("read");

        assert!(resolver.has_permission(file, owner, "read").await.unwrap());
        assert!(resolver.has_permission(file, owner, "delete").await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_bypass_covers_unknown_capability() {
        let (store, resolver) = setup();
        let owner = Uuid::new_v4();
        let file = Uuid::new_v4();
        store.add_resource(file, owner);

        // No such kind exists in the catalog; the owner is still granted.
        assert!(
            resolver
                .has_permission(file, owner, "no-such-capability")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_capability_denies_non_owner() {
        let (store, resolver) = setup();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());

        let stranger = Uuid::new_v4();
        assert!(
            !resolver
                .has_permission(file, stranger, "no-such-capability")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_default_deny() {
        let (store, resolver) = setup();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        store.add_kind("read");

        let stranger = Uuid::new_v4();
        assert!(!resolver.has_permission(file, stranger, "read").await.unwrap());
    }

    #[tokio::test]
    async fn test_direct_grant_is_per_capability() {
        let (store, resolver) = setup();
        let owner = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let file = Uuid::new_v4();
        store.add_resource(file, owner);
        let read = store.add_kind("read");
        store.add_kind("delete");
        store.add_direct_grant(file, reader, read);

        assert!(resolver.has_permission(file, reader, "read").await.unwrap());
        assert!(!resolver.has_permission(file, reader, "delete").await.unwrap());
    }

    #[tokio::test]
    async fn test_role_grant_resolves_through_membership() {
        let (store, resolver) = setup();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        let edit = store.add_kind("edit");

        let editor_role = Uuid::new_v4();
        let member = Uuid::new_v4();
        store.add_role_member(member, editor_role);
        store.add_role_grant(editor_role, edit, Some(file));

        assert!(resolver.has_permission(file, member, "edit").await.unwrap());

        let non_member = Uuid::new_v4();
        assert!(!resolver.has_permission(file, non_member, "edit").await.unwrap());
    }

    #[tokio::test]
    async fn test_role_grant_scoped_to_other_resource_denies() {
        let (store, resolver) = setup();
        let file = Uuid::new_v4();
        let other_file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        store.add_resource(other_file, Uuid::new_v4());
        let edit = store.add_kind("edit");

        let role = Uuid::new_v4();
        let member = Uuid::new_v4();
        store.add_role_member(member, role);
        store.add_role_grant(role, edit, Some(other_file));

        assert!(!resolver.has_permission(file, member, "edit").await.unwrap());
    }

    #[tokio::test]
    async fn test_global_role_grant_applies_to_any_resource() {
        let (store, resolver) = setup();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        let read = store.add_kind("read");

        let auditor_role = Uuid::new_v4();
        let auditor = Uuid::new_v4();
        store.add_role_member(auditor, auditor_role);
        store.add_role_grant(auditor_role, read, None);

        assert!(resolver.has_permission(file, auditor, "read").await.unwrap());
    }

    #[tokio::test]
    async fn test_multiple_matching_roles_still_grant() {
        let (store, resolver) = setup();
        let file = Uuid::new_v4();
        store.add_resource(file, Uuid::new_v4());
        let read = store.add_kind("read");

        let member = Uuid::new_v4();
        for _ in 0..3 {
            let role = Uuid::new_v4();
            store.add_role_member(member, role);
            store.add_role_grant(role, read, Some(file));
        }

        assert!(resolver.has_permission(file, member, "read").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_resource_degrades_to_grant_checks() {
        let (store, resolver) = setup();
        let ghost = Uuid::new_v4();
        let user = Uuid::new_v4();
        let read = store.add_kind("read");

        // No owner recorded; only the grant relations can grant.
        assert!(!resolver.has_permission(ghost, user, "read").await.unwrap());

        store.add_direct_grant(ghost, user, read);
        assert!(resolver.has_permission(ghost, user, "read").await.unwrap());
    }

    #[tokio::test]
    async fn test_ownership_transfer_revokes_old_owner() {
        let (store, resolver) = setup();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let u3 = Uuid::new_v4();
        let f1 = Uuid::new_v4();

        store.add_resource(f1, u1);
        let read = store.add_kind("read");
        store.add_kind("edit");
        store.add_direct_grant(f1, u2, read);

        assert!(resolver.has_permission(f1, u2, "read").await.unwrap());
        assert!(!resolver.has_permission(f1, u2, "edit").await.unwrap());

        // Ownership moves to u3; u1 keeps no implicit access.
        store.set_owner(f1, u3);
        assert!(!resolver.has_permission(f1, u1, "read").await.unwrap());
        assert!(resolver.has_permission(f1, u3, "read").await.unwrap());
    }
}
