//! Users, sessions and the user directory.

pub mod commands;
pub mod directory;
pub mod identity;
pub mod session;

pub use commands::UserCommandService;
pub use directory::{default_users, UserDirectory};
pub use identity::User;
pub use session::Session;
