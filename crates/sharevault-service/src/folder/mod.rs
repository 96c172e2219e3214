//! Folder management — CRUD and reparenting with cycle prevention.

pub mod reparent;
pub mod service;

pub use service::FolderService;
