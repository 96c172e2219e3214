//! Role entities.

pub mod model;

pub use model::{Role, RoleMembership};
