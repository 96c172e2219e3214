//! Registration, login, and refresh flows.

pub mod manager;

pub use manager::{AuthManager, LoginResult};
