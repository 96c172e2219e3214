//! # sharevault-service
//!
//! Business logic services for ShareVault.
//!
//! ## Modules
//!
//! - `file` — file metadata CRUD and ownership transfer
//! - `folder` — folder CRUD and reparenting with cycle prevention
//! - `share` — grant and revoke access on resources

pub mod file;
pub mod folder;
pub mod share;

pub use file::FileService;
pub use folder::FolderService;
pub use share::ShareService;
