//! Persisted refresh token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted refresh token.
///
/// `used` and `revoked` transition false→true exactly once and are never
/// reset. Expiry is computed from `expires_at`, not stored as a state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The owning subject.
    pub user_id: Uuid,
    /// Opaque token value. Unique and unguessable.
    #[serde(skip_serializing)]
    pub token: String,
    /// JWT ID of the access token issued alongside this record.
    pub jti: Uuid,
    /// Whether this token was consumed by a successful rotation.
    pub used: bool,
    /// Whether this token was explicitly invalidated.
    pub revoked: bool,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Check whether the token has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check whether the token is still trustworthy as of `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.revoked && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(now: DateTime<Utc>) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "opaque".to_string(),
            jti: Uuid::new_v4(),
            used: false,
            revoked: false,
            issued_at: now,
            expires_at: now + chrono::Duration::days(7),
        }
    }

    #[test]
    fn test_active_until_expiry() {
        let now = Utc::now();
        let rec = record(now);
        assert!(rec.is_active(now));
        assert!(rec.is_active(now + chrono::Duration::days(7)));
        assert!(!rec.is_active(now + chrono::Duration::days(7) + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_used_or_revoked_is_inactive() {
        let now = Utc::now();
        let mut rec = record(now);
        rec.used = true;
        assert!(!rec.is_active(now));

        let mut rec = record(now);
        rec.revoked = true;
        assert!(!rec.is_active(now));
    }
}
