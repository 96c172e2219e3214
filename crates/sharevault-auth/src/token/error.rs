//! Refresh token failure taxonomy.

use thiserror::Error;

use sharevault_core::error::AppError;

/// Why a refresh token was rejected.
///
/// The distinction matters for logging and abuse detection; callers
/// outside this crate see a single undifferentiated authentication
/// failure, so a probing client learns nothing about token state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// No record matches the presented token value.
    #[error("refresh token not recognized")]
    Invalid,
    /// The token was already consumed by a rotation — a replay signal.
    #[error("refresh token already used")]
    Reused,
    /// The token was explicitly revoked.
    #[error("refresh token revoked")]
    Revoked,
    /// The token's expiry has passed.
    #[error("refresh token expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        // One message for all four kinds.
        AppError::authentication("Refresh token is not valid; please authenticate again")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharevault_core::error::ErrorKind;

    #[test]
    fn test_all_kinds_collapse_to_one_external_message() {
        let messages: Vec<String> = [
            TokenError::Invalid,
            TokenError::Reused,
            TokenError::Revoked,
            TokenError::Expired,
        ]
        .into_iter()
        .map(|e| {
            let app: AppError = e.into();
            assert_eq!(app.kind, ErrorKind::Authentication);
            app.message
        })
        .collect();

        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }
}
