//! JWT access token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use sharevault_core::config::AuthConfig;
use sharevault_core::error::AppError;

use super::claims::Claims;

/// Creates signed JWT access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer claim value.
    issuer: String,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

/// A freshly minted access token with its metadata.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The encoded JWT.
    pub token: String,
    /// The token's unique identifier.
    pub jti: Uuid,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            access_ttl_minutes: config.access_ttl_minutes as i64,
        }
    }

    /// Generates a new access token for the given user, with a fresh JTI.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AppError> {
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);
        let jti = Uuid::new_v4();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(AccessToken {
            token,
            jti,
            expires_at: exp,
        })
    }
}
