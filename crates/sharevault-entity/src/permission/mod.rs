//! Permission catalog and grant entities.

pub mod grant;
pub mod kind;

pub use grant::{DirectGrant, RoleGrant};
pub use kind::{PermissionKind, names};
