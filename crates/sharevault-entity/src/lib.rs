//! # sharevault-entity
//!
//! Domain entity models for ShareVault: users, roles, files, folders,
//! permission grants, and refresh token records.
//!
//! Relations are expressed as flat foreign-key fields; lookups go through
//! the repository layer, never through live object graphs.

pub mod file;
pub mod folder;
pub mod permission;
pub mod role;
pub mod token;
pub mod user;
