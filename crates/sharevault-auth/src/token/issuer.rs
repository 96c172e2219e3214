//! Access/refresh token pair issuance and rotation.
//!
//! Refresh tokens are single-use: a successful rotation consumes the
//! presented token and issues a successor. Reuse of a consumed token is
//! treated as a replay signal and answered by revoking every other
//! active token the subject holds.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sharevault_core::result::AppResult;
use sharevault_core::traits::Clock;
use sharevault_entity::token::RefreshTokenRecord;

use crate::jwt::JwtEncoder;

use super::error::TokenError;
use super::store::{CredentialStore, SubjectDirectory};

/// Number of random bytes in an opaque refresh token value (384 bits).
const REFRESH_TOKEN_BYTES: usize = 48;

/// A freshly issued access + refresh token pair.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token (JWT).
    pub access_token: String,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issues and rotates access/refresh token pairs.
#[derive(Clone)]
pub struct TokenIssuer {
    /// Access token encoder.
    jwt: Arc<JwtEncoder>,
    /// Refresh token persistence.
    store: Arc<dyn CredentialStore>,
    /// Subject email lookup for re-minting access tokens.
    subjects: Arc<dyn SubjectDirectory>,
    /// Injectable time source.
    clock: Arc<dyn Clock>,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates a new token issuer.
    pub fn new(
        jwt: Arc<JwtEncoder>,
        store: Arc<dyn CredentialStore>,
        subjects: Arc<dyn SubjectDirectory>,
        clock: Arc<dyn Clock>,
        refresh_ttl_days: u64,
    ) -> Self {
        Self {
            jwt,
            store,
            subjects,
            clock,
            refresh_ttl_days: refresh_ttl_days as i64,
        }
    }

    /// Mints a new access + refresh pair for a subject and persists the
    /// refresh token record.
    pub async fn issue_pair(&self, user_id: Uuid, email: &str) -> AppResult<TokenPair> {
        let now = self.clock.now();
        let access = self.jwt.generate_access_token(user_id, email, now)?;
        let refresh_value = generate_refresh_value();
        let refresh_expires_at = now + chrono::Duration::days(self.refresh_ttl_days);

        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id,
            token: refresh_value.clone(),
            jti: access.jti,
            used: false,
            revoked: false,
            issued_at: now,
            expires_at: refresh_expires_at,
        };
        self.store.insert(&record).await?;

        debug!(%user_id, jti = %access.jti, "Issued token pair");

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh_value,
            access_expires_at: access.expires_at,
            refresh_expires_at,
        })
    }

    /// Exchanges a valid, unused refresh token for a new pair,
    /// consuming the presented token.
    ///
    /// All rejection reasons surface to callers as one undifferentiated
    /// authentication failure; the internal [`TokenError`] kind is
    /// logged for abuse detection.
    pub async fn rotate(&self, refresh_token: &str) -> AppResult<TokenPair> {
        match self.try_rotate(refresh_token).await? {
            Ok(pair) => Ok(pair),
            Err(kind) => {
                info!(reason = %kind, "Refresh token rejected");
                Err(kind.into())
            }
        }
    }

    /// Inner rotation with the full failure taxonomy.
    async fn try_rotate(
        &self,
        refresh_token: &str,
    ) -> AppResult<Result<TokenPair, TokenError>> {
        let Some(record) = self.store.find_by_token(refresh_token).await? else {
            return Ok(Err(TokenError::Invalid));
        };

        if record.used {
            // Replay of a consumed token: assume the credential leaked
            // and invalidate everything else the subject holds.
            let revoked = self
                .store
                .revoke_all_active_for_user(record.user_id)
                .await?;
            warn!(
                user_id = %record.user_id,
                revoked_tokens = revoked,
                "Refresh token replay detected; revoked subject's active tokens"
            );
            return Ok(Err(TokenError::Reused));
        }

        if record.revoked {
            return Ok(Err(TokenError::Revoked));
        }

        let now = self.clock.now();
        if record.is_expired(now) {
            return Ok(Err(TokenError::Expired));
        }

        let Some(email) = self.subjects.email_for(record.user_id).await? else {
            // Subject vanished between issuance and rotation.
            return Ok(Err(TokenError::Invalid));
        };

        // Mint the successor before consuming the predecessor, so the
        // consume + insert happen as one atomic unit in the store.
        let access = self.jwt.generate_access_token(record.user_id, &email, now)?;
        let refresh_value = generate_refresh_value();
        let refresh_expires_at = now + chrono::Duration::days(self.refresh_ttl_days);

        let successor = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            token: refresh_value.clone(),
            jti: access.jti,
            used: false,
            revoked: false,
            issued_at: now,
            expires_at: refresh_expires_at,
        };

        if !self
            .store
            .consume_and_replace(refresh_token, &successor)
            .await?
        {
            // A concurrent rotation won the race; this attempt is the
            // second use of the predecessor.
            warn!(user_id = %record.user_id, "Lost rotation race for refresh token");
            return Ok(Err(TokenError::Reused));
        }

        debug!(user_id = %record.user_id, jti = %access.jti, "Rotated refresh token");

        Ok(Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh_value,
            access_expires_at: access.expires_at,
            refresh_expires_at,
        }))
    }
}

/// Generates an opaque, URL-safe refresh token value from CSPRNG bytes.
fn generate_refresh_value() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::memory::{InMemoryCredentialStore, InMemorySubjectDirectory};
    use sharevault_core::config::AuthConfig;
    use sharevault_core::error::ErrorKind;
    use sharevault_core::traits::clock::FixedClock;

    struct Harness {
        issuer: TokenIssuer,
        store: Arc<InMemoryCredentialStore>,
        clock: Arc<FixedClock>,
        user_id: Uuid,
    }

    fn harness() -> Harness {
        let config = AuthConfig {
            jwt_secret: "issuer-test-secret".to_string(),
            ..AuthConfig::default()
        };
        let store = Arc::new(InMemoryCredentialStore::new());
        let subjects = Arc::new(InMemorySubjectDirectory::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let user_id = Uuid::new_v4();
        subjects.add(user_id, "dave@example.com");

        let issuer = TokenIssuer::new(
            Arc::new(JwtEncoder::new(&config)),
            store.clone(),
            subjects,
            clock.clone(),
            config.refresh_ttl_days,
        );

        Harness {
            issuer,
            store,
            clock,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_issue_pair_persists_record() {
        let h = harness();
        let pair = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        let record = h.store.get(&pair.refresh_token).unwrap();
        assert_eq!(record.user_id, h.user_id);
        assert!(!record.used);
        assert!(!record.revoked);
        assert_eq!(
            record.expires_at,
            h.clock.now() + chrono::Duration::days(7)
        );
    }

    #[tokio::test]
    async fn test_refresh_values_are_unique_and_opaque() {
        let h = harness();
        let a = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();
        let b = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        assert_ne!(a.refresh_token, b.refresh_token);
        // 48 random bytes → 64 base64 characters.
        assert_eq!(a.refresh_token.len(), 64);
    }

    #[tokio::test]
    async fn test_rotation_chain_succeeds() {
        let h = harness();
        let first = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        let second = h.issuer.rotate(&first.refresh_token).await.unwrap();
        assert!(h.store.get(&first.refresh_token).unwrap().used);

        // The successor rotates normally in turn.
        let third = h.issuer.rotate(&second.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, third.refresh_token);
    }

    #[tokio::test]
    async fn test_second_rotation_of_same_token_fails() {
        let h = harness();
        let first = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        h.issuer.rotate(&first.refresh_token).await.unwrap();
        let err = h.issuer.rotate(&first.refresh_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_replay_revokes_other_active_tokens() {
        let h = harness();
        let first = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();
        let second = h.issuer.rotate(&first.refresh_token).await.unwrap();

        // Replaying the consumed token burns the live successor too.
        assert!(h.issuer.rotate(&first.refresh_token).await.is_err());
        assert!(h.store.get(&second.refresh_token).unwrap().revoked);
        assert!(h.issuer.rotate(&second.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_token_fails() {
        let h = harness();
        assert!(h.issuer.rotate("not-a-real-token").await.is_err());
    }

    #[tokio::test]
    async fn test_revoked_token_fails() {
        let h = harness();
        let pair = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();
        h.store.revoke(&pair.refresh_token);

        assert!(h.issuer.rotate(&pair.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_token_fails_even_if_never_used() {
        let h = harness();
        let pair = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        h.clock.advance(chrono::Duration::days(7) + chrono::Duration::seconds(1));
        assert!(h.issuer.rotate(&pair.refresh_token).await.is_err());

        let record = h.store.get(&pair.refresh_token).unwrap();
        assert!(!record.used);
    }

    #[tokio::test]
    async fn test_rotation_at_expiry_boundary_succeeds() {
        let h = harness();
        let pair = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        // `now == expires_at` is still inside the validity window.
        h.clock.advance(chrono::Duration::days(7));
        assert!(h.issuer.rotate(&pair.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_rotations_have_one_winner() {
        let h = harness();
        let pair = h.issuer.issue_pair(h.user_id, "dave@example.com").await.unwrap();

        let issuer_a = h.issuer.clone();
        let issuer_b = h.issuer.clone();
        let token_a = pair.refresh_token.clone();
        let token_b = pair.refresh_token.clone();

        let (a, b) = tokio::join!(issuer_a.rotate(&token_a), issuer_b.rotate(&token_b));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    }
}
