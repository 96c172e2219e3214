//! User account status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is active and may authenticate.
    Active,
    /// Account is administratively disabled.
    Disabled,
    /// Account is soft-deleted and must never authenticate.
    Deleted,
}

impl UserStatus {
    /// Check whether this status permits login.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = sharevault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "disabled" => Ok(Self::Disabled),
            "deleted" => Ok(Self::Deleted),
            _ => Err(sharevault_core::AppError::validation(format!(
                "Invalid user status: '{s}'. Expected one of: active, disabled, deleted"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(!UserStatus::Disabled.can_login());
        assert!(!UserStatus::Deleted.can_login());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("active".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!("DELETED".parse::<UserStatus>().unwrap(), UserStatus::Deleted);
        assert!("gone".parse::<UserStatus>().is_err());
    }
}
