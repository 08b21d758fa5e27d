use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file (default: "fanzone.db")
    pub sqlite_path: String,
    /// Path to the session store database (default: "fanzone-sessions.db")
    pub session_db_path: String,
    /// Directory served under `/static` (default: "static")
    pub static_dir: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "fanzone.db")
    /// - `SESSION_DB_PATH` - session database path (default: "fanzone-sessions.db")
    /// - `STATIC_DIR` - static asset directory (default: "static")
    /// - `REQUEST_TIMEOUT_SECONDS` - request timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "fanzone.db".to_string()),
            session_db_path: env::var("SESSION_DB_PATH")
                .unwrap_or_else(|_| "fanzone-sessions.db".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
