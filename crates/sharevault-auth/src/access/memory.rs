//! In-memory grant store.
//!
//! Backs the resolver in unit tests and single-node tooling where no
//! PostgreSQL instance is available. All relations live behind one
//! mutex, so each call observes a consistent snapshot.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use sharevault_core::result::AppResult;
use sharevault_database::repositories::GrantSnapshot;
use sharevault_entity::permission::PermissionKind;

use super::store::GrantStore;

#[derive(Debug, Default)]
struct Relations {
    /// resource id → owner id.
    owners: HashMap<Uuid, Uuid>,
    /// capability name → kind.
    kinds: HashMap<String, PermissionKind>,
    /// (resource, user, permission) triples.
    direct: HashSet<(Uuid, Uuid, Uuid)>,
    /// user id → role ids.
    memberships: HashMap<Uuid, Vec<Uuid>>,
    /// (role, permission, optional resource scope) triples.
    role_grants: HashSet<(Uuid, Uuid, Option<Uuid>)>,
}

/// A grant store holding all relations in memory.
#[derive(Debug, Default)]
pub struct InMemoryGrantStore {
    relations: Mutex<Relations>,
}

impl InMemoryGrantStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resource with its owner.
    pub fn add_resource(&self, resource_id: Uuid, owner_id: Uuid) {
        self.relations
            .lock()
            .unwrap()
            .owners
            .insert(resource_id, owner_id);
    }

    /// Reassigns a resource to a new owner.
    pub fn set_owner(&self, resource_id: Uuid, owner_id: Uuid) {
        self.add_resource(resource_id, owner_id);
    }

    /// Registers a capability name in the catalog and returns its ID.
    pub fn add_kind(&self, name: &str) -> Uuid {
        let kind = PermissionKind {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        let id = kind.id;
        self.relations
            .lock()
            .unwrap()
            .kinds
            .insert(name.to_string(), kind);
        id
    }

    /// Records a direct grant.
    pub fn add_direct_grant(&self, resource_id: Uuid, user_id: Uuid, permission_id: Uuid) {
        self.relations
            .lock()
            .unwrap()
            .direct
            .insert((resource_id, user_id, permission_id));
    }

    /// Removes a direct grant.
    pub fn remove_direct_grant(&self, resource_id: Uuid, user_id: Uuid, permission_id: Uuid) {
        self.relations
            .lock()
            .unwrap()
            .direct
            .remove(&(resource_id, user_id, permission_id));
    }

    /// Adds a user to a role.
    pub fn add_role_member(&self, user_id: Uuid, role_id: Uuid) {
        self.relations
            .lock()
            .unwrap()
            .memberships
            .entry(user_id)
            .or_default()
            .push(role_id);
    }

    /// Records a role grant, optionally scoped to a resource.
    pub fn add_role_grant(&self, role_id: Uuid, permission_id: Uuid, resource_id: Option<Uuid>) {
        self.relations
            .lock()
            .unwrap()
            .role_grants
            .insert((role_id, permission_id, resource_id));
    }
}

#[async_trait]
impl GrantStore for InMemoryGrantStore {
    async fn grant_snapshot(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<GrantSnapshot> {
        // Single lock region: the whole decision reads one state.
        let relations = self.relations.lock().unwrap();

        let owner_id = relations.owners.get(&resource_id).copied();
        let kind_id = relations.kinds.get(permission_name).map(|k| k.id);

        let (has_direct_grant, has_role_grant) = match kind_id {
            None => (false, false),
            Some(kind_id) => {
                let direct = relations
                    .direct
                    .contains(&(resource_id, user_id, kind_id));
                let roles = relations
                    .memberships
                    .get(&user_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let role = roles.iter().any(|role| {
                    relations
                        .role_grants
                        .contains(&(*role, kind_id, Some(resource_id)))
                        || relations.role_grants.contains(&(*role, kind_id, None))
                });
                (direct, role)
            }
        };

        Ok(GrantSnapshot {
            owner_id,
            kind_id,
            has_direct_grant,
            has_role_grant,
        })
    }
}
