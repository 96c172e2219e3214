//! # sharevault-core
//!
//! Core crate for ShareVault. Contains configuration schemas, the
//! injectable clock trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ShareVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
