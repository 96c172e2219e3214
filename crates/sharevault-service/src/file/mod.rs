//! File metadata management with permission enforcement.

pub mod service;

pub use service::FileService;
