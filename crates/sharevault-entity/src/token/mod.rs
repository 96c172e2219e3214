//! Refresh token entities.

pub mod record;

pub use record::RefreshTokenRecord;
