//! JWT access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use sharevault_core::config::AuthConfig;
use sharevault_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature validity, issuer, and expiration.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-for-unit-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let cfg = config();
        let encoder = JwtEncoder::new(&cfg);
        let decoder = JwtDecoder::new(&cfg);

        let user_id = Uuid::new_v4();
        let access = encoder
            .generate_access_token(user_id, "alice@example.com", Utc::now())
            .unwrap();

        let claims = decoder.decode_access_token(&access.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.jti, access.jti);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let encoder = JwtEncoder::new(&config());
        let other = AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            ..AuthConfig::default()
        };
        let decoder = JwtDecoder::new(&other);

        let access = encoder
            .generate_access_token(Uuid::new_v4(), "bob@example.com", Utc::now())
            .unwrap();

        assert!(decoder.decode_access_token(&access.token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let cfg = config();
        let encoder = JwtEncoder::new(&cfg);
        let decoder = JwtDecoder::new(&cfg);

        let issued = Utc::now() - chrono::Duration::hours(3);
        let access = encoder
            .generate_access_token(Uuid::new_v4(), "carol@example.com", issued)
            .unwrap();

        assert!(decoder.decode_access_token(&access.token).is_err());
    }
}
