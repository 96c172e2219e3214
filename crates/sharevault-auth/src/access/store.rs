//! The grant store seam.
//!
//! `GrantStore` is a read-only view over four relations: resource
//! ownership, the permission catalog, direct grants, and role
//! membership/grants. The whole view for one decision is read as a
//! single consistent snapshot, so a decision can never combine grant
//! states that did not coexist. The production implementation delegates
//! to the Postgres [`GrantRepository`]; tests and single-node tooling
//! use [`super::memory::InMemoryGrantStore`].

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sharevault_core::result::AppResult;
use sharevault_database::repositories::{GrantRepository, GrantSnapshot};

/// Read-only view over grants and ownership, as seen by the resolver.
#[async_trait]
pub trait GrantStore: Send + Sync + 'static {
    /// Reads everything one permission decision needs, atomically.
    ///
    /// A missing resource surfaces as `owner_id: None`, not as an
    /// error; the resolver degrades to the non-ownership checks.
    async fn grant_snapshot(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<GrantSnapshot>;
}

/// Postgres-backed grant store delegating to [`GrantRepository`].
#[derive(Debug, Clone)]
pub struct PgGrantStore {
    repo: Arc<GrantRepository>,
}

impl PgGrantStore {
    /// Creates a new Postgres-backed grant store.
    pub fn new(repo: Arc<GrantRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl GrantStore for PgGrantStore {
    async fn grant_snapshot(
        &self,
        resource_id: Uuid,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<GrantSnapshot> {
        self.repo
            .grant_snapshot(resource_id, user_id, permission_name)
            .await
    }
}
