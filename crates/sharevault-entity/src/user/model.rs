//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::UserStatus;

/// A registered user in the ShareVault system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login email address.
    pub email: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Argon2id password hash (PHC string, salt embedded).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account status.
    pub status: UserStatus,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login email address.
    pub email: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
}
