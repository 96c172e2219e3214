//! Permission resolution over ownership, direct grants, and role grants.

pub mod memory;
pub mod resolver;
pub mod store;

pub use memory::InMemoryGrantStore;
pub use resolver::PermissionResolver;
pub use store::GrantStore;
