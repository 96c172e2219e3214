//! Sharing — grant and revoke access on resources.

pub mod service;

pub use service::{ResourceGrants, ShareService};
