//! Session storage implementations.
//!
//! - [`MemorySessionStore`]: process-local, for tests and development
//! - [`SqliteSessionStore`]: SQLite via sqlx (with the `sqlite` feature)

mod inmemory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use inmemory::MemorySessionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSessionStore;
