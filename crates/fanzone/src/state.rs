//! Application state with repository-based storage.
//!
//! Handlers receive repository trait objects; the SQLite implementation is
//! wired in by `main`, tests use an in-memory database.

use std::sync::Arc;

use fanzone_auth::AuthState;
use fanzone_core::storage::{
    CommentRepository, HealthCheck, NewsRepository, PlayerRepository, RoleRepository,
    TeamRepository, UserRepository,
};

use crate::config::Config;
use crate::storage::sqlite::SqliteRepository;

/// Shared application state.
///
/// Cloned for each request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub roles: Arc<dyn RoleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub health: Arc<dyn HealthCheck>,
    /// Sessions, accounts and auth configuration.
    pub auth: AuthState,
    pub config: Config,
}

impl AppState {
    /// Builds the state with one SQLite repository behind every trait.
    pub fn new(repo: Arc<SqliteRepository>, auth: AuthState, config: Config) -> Self {
        Self {
            roles: repo.clone(),
            users: repo.clone(),
            teams: repo.clone(),
            players: repo.clone(),
            news: repo.clone(),
            comments: repo.clone(),
            health: repo,
            auth,
            config,
        }
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}
