//! Repository implementations for all ShareVault entities.

pub mod file;
pub mod folder;
pub mod grant;
pub mod refresh_token;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use grant::{GrantRepository, GrantSnapshot};
pub use refresh_token::RefreshTokenRepository;
pub use user::UserRepository;
