//! # sharevault-auth
//!
//! Access control and credential lifecycle for ShareVault.
//!
//! ## Modules
//!
//! - `access` — permission resolution over ownership, direct grants, and
//!   role-derived grants
//! - `token` — refresh token issuance, validation, and rotation
//! - `jwt` — access token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `session` — login, registration, and refresh flows

pub mod access;
pub mod jwt;
pub mod password;
pub mod session;
pub mod token;

pub use access::{GrantStore, PermissionResolver};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::AuthManager;
pub use token::{CredentialStore, TokenError, TokenIssuer, TokenPair};
