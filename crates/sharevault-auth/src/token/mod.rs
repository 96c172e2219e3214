//! Refresh token issuance, validation, and rotation.

pub mod error;
pub mod issuer;
pub mod memory;
pub mod store;

pub use error::TokenError;
pub use issuer::{TokenIssuer, TokenPair};
pub use memory::{InMemoryCredentialStore, InMemorySubjectDirectory};
pub use store::{CredentialStore, SubjectDirectory};
