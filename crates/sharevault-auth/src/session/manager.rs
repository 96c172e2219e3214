//! Authentication lifecycle manager — registration, login, refresh flows.

use std::sync::Arc;

use tracing::{info, warn};

use sharevault_core::error::AppError;
use sharevault_core::result::AppResult;
use sharevault_database::repositories::UserRepository;
use sharevault_entity::user::{CreateUser, User};

use crate::password::{PasswordHasher, PasswordValidator};
use crate::token::{TokenIssuer, TokenPair};

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
}

/// Manages registration, login, and token refresh.
#[derive(Clone)]
pub struct AuthManager {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Password policy enforcement.
    password_validator: Arc<PasswordValidator>,
    /// Token pair issuance and rotation.
    token_issuer: Arc<TokenIssuer>,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager").finish()
    }
}

impl AuthManager {
    /// Creates a new auth manager.
    pub fn new(
        user_repo: Arc<UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        password_validator: Arc<PasswordValidator>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            password_validator,
            token_issuer,
        }
    }

    /// Registers a new account:
    ///
    /// 1. Enforce password policy
    /// 2. Check email uniqueness
    /// 3. Hash the password
    /// 4. Insert the user
    pub async fn register(
        &self,
        email: &str,
        display_name: Option<&str>,
        password: &str,
    ) -> AppResult<User> {
        self.password_validator.validate(password)?;

        if self.user_repo.email_exists(email).await? {
            return Err(AppError::conflict("Email address is already registered"));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email: email.to_string(),
                display_name: display_name.map(str::to_string),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Performs the login flow:
    ///
    /// 1. Find user by email
    /// 2. Check account status
    /// 3. Verify password
    /// 4. Issue token pair
    ///
    /// Unknown email and wrong password produce the same error, so a
    /// probing client cannot enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Err(invalid_credentials());
        };

        verify_login(&user, password, &self.password_hasher)?;

        let tokens = self.token_issuer.issue_pair(user.id, &user.email).await?;
        info!(user_id = %user.id, "Login successful");

        Ok(LoginResult { tokens, user })
    }

    /// Exchanges a refresh token for a new pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        self.token_issuer.rotate(refresh_token).await
    }
}

/// Gate for a located account. The status check runs before the
/// password check: an inactive account answers identically whether or
/// not the password is correct.
fn verify_login(user: &User, password: &str, hasher: &PasswordHasher) -> AppResult<()> {
    if !user.status.can_login() {
        warn!(user_id = %user.id, status = ?user.status, "Login rejected for inactive account");
        return Err(AppError::authorization(
            "Account is not active. Contact an administrator.",
        ));
    }

    if !hasher.verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    Ok(())
}

fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid email or password")
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use uuid::Uuid;

    use sharevault_core::error::ErrorKind;
    use sharevault_entity::user::UserStatus;

    fn account(status: UserStatus, hasher: &PasswordHasher, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "sam@example.com".to_string(),
            display_name: None,
            password_hash: hasher.hash_password(password).unwrap(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_inactive_account_rejected_regardless_of_password() {
        let hasher = PasswordHasher::new();
        let user = account(UserStatus::Disabled, &hasher, "correct horse battery");

        // Same answer for the right and the wrong password, so the
        // rejection cannot be used to test passwords.
        let right = verify_login(&user, "correct horse battery", &hasher).unwrap_err();
        let wrong = verify_login(&user, "nope", &hasher).unwrap_err();
        assert_eq!(right.kind, ErrorKind::Authorization);
        assert_eq!(wrong.kind, ErrorKind::Authorization);
        assert_eq!(right.message, wrong.message);
    }

    #[test]
    fn test_wrong_password_on_active_account() {
        let hasher = PasswordHasher::new();
        let user = account(UserStatus::Active, &hasher, "correct horse battery");

        let err = verify_login(&user, "nope", &hasher).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_active_account_with_correct_password_passes() {
        let hasher = PasswordHasher::new();
        let user = account(UserStatus::Active, &hasher, "correct horse battery");

        assert!(verify_login(&user, "correct horse battery", &hasher).is_ok());
    }
}
