//! The credential store seam.
//!
//! `CredentialStore` persists refresh token records. The one operation
//! with a concurrency discipline is `consume_and_replace`: marking the
//! predecessor used and inserting the successor must be a single atomic
//! unit, so concurrent rotations of the same token produce exactly one
//! winner.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sharevault_core::result::AppResult;
use sharevault_database::repositories::{RefreshTokenRepository, UserRepository};
use sharevault_entity::token::RefreshTokenRecord;

/// Persistence seam for refresh token records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Finds a record by its opaque token value.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>>;

    /// Inserts a freshly issued record.
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()>;

    /// Atomically consumes the predecessor and inserts the successor.
    /// Returns `false` when another rotation already consumed the
    /// predecessor (or it was revoked in the meantime); the successor is
    /// not inserted in that case.
    async fn consume_and_replace(
        &self,
        old_token: &str,
        successor: &RefreshTokenRecord,
    ) -> AppResult<bool>;

    /// Revokes every still-active record for a subject. Returns the
    /// number of records revoked.
    async fn revoke_all_active_for_user(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Resolves a subject id to the email embedded in fresh access tokens.
#[async_trait]
pub trait SubjectDirectory: Send + Sync + 'static {
    /// Returns the subject's email, or `None` if the subject no longer
    /// exists.
    async fn email_for(&self, user_id: Uuid) -> AppResult<Option<String>>;
}

/// Postgres-backed subject directory delegating to [`UserRepository`].
#[derive(Debug, Clone)]
pub struct PgSubjectDirectory {
    repo: Arc<UserRepository>,
}

impl PgSubjectDirectory {
    /// Creates a new Postgres-backed subject directory.
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SubjectDirectory for PgSubjectDirectory {
    async fn email_for(&self, user_id: Uuid) -> AppResult<Option<String>> {
        Ok(self.repo.find_by_id(user_id).await?.map(|u| u.email))
    }
}

/// Postgres-backed credential store delegating to
/// [`RefreshTokenRepository`].
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    repo: Arc<RefreshTokenRepository>,
}

impl PgCredentialStore {
    /// Creates a new Postgres-backed credential store.
    pub fn new(repo: Arc<RefreshTokenRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>> {
        self.repo.find_by_token(token).await
    }

    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        self.repo.insert(record).await
    }

    async fn consume_and_replace(
        &self,
        old_token: &str,
        successor: &RefreshTokenRecord,
    ) -> AppResult<bool> {
        self.repo.consume_and_replace(old_token, successor).await
    }

    async fn revoke_all_active_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        self.repo.revoke_all_active_for_user(user_id).await
    }
}
