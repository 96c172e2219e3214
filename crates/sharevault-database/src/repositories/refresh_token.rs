//! Refresh token repository implementation.
//!
//! The `token` column carries a UNIQUE constraint; `consume_and_replace`
//! is the only write path that both consumes a predecessor and creates
//! its successor, and it does so in a single transaction.

use sqlx::PgPool;
use uuid::Uuid;

use sharevault_core::error::{AppError, ErrorKind};
use sharevault_core::result::AppResult;
use sharevault_entity::token::RefreshTokenRecord;

/// Repository for persisted refresh token records.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a record by its opaque token value.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>("SELECT * FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Insert a freshly issued record.
    pub async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens \
             (id, user_id, token, jti, used, revoked, issued_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.token)
        .bind(record.jti)
        .bind(record.used)
        .bind(record.revoked)
        .bind(record.issued_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert refresh token", e)
        })?;
        Ok(())
    }

    /// Atomically mark a predecessor token as used and insert its
    /// successor.
    ///
    /// The guarded UPDATE makes concurrent rotations of the same token
    /// race cleanly: exactly one caller sees `rows_affected == 1` and
    /// wins; every other caller gets `false` and the successor is not
    /// inserted.
    pub async fn consume_and_replace(
        &self,
        old_token: &str,
        successor: &RefreshTokenRecord,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let consumed = sqlx::query(
            "UPDATE refresh_tokens SET used = TRUE \
             WHERE token = $1 AND used = FALSE AND revoked = FALSE",
        )
        .bind(old_token)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume refresh token", e)
        })?;

        if consumed.rows_affected() != 1 {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back rotation", e)
            })?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO refresh_tokens \
             (id, user_id, token, jti, used, revoked, issued_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(successor.id)
        .bind(successor.user_id)
        .bind(&successor.token)
        .bind(successor.jti)
        .bind(successor.used)
        .bind(successor.revoked)
        .bind(successor.issued_at)
        .bind(successor.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert successor token", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit rotation", e)
        })?;

        Ok(true)
    }

    /// Explicitly revoke a token. Returns `true` if a record was revoked.
    pub async fn revoke(&self, token: &str) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE token = $1")
                .bind(token)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to revoke token", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every still-active token for a subject. Used as the
    /// compromise response when a replay is detected. Returns the number
    /// of tokens revoked.
    pub async fn revoke_all_active_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE \
             WHERE user_id = $1 AND used = FALSE AND revoked = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
        })?;
        Ok(result.rows_affected())
    }
}
