//! Accounts and sessions for fanzone.
//!
//! This crate provides:
//! - Argon2 password hashing and signed password-reset tokens
//! - Session storage (in-memory, or SQLite via the `sqlite` feature)
//! - Axum extractors for the current user
//! - The auth POST routes and flash messages

mod config;
mod error;
mod extractors;
pub mod flash;
mod handlers;
pub mod password;
pub mod reset;
mod sessions;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AuthRejection, CurrentUser, OptionalUser};
pub use flash::{redirect_with_flash, FlashMessage};
pub use handlers::{auth_routes, session_cookie};
pub use reset::{LogNotifier, OutboxNotifier, ResetNotifier};
pub use sessions::MemorySessionStore;
#[cfg(feature = "sqlite")]
pub use sessions::SqliteSessionStore;
pub use state::AuthState;
