//! Application state for auth.

use std::sync::Arc;

use axum::extract::FromRef;
use fanzone_core::auth::SessionRepository;
use fanzone_core::storage::{RoleRepository, UserRepository};

use crate::config::AuthConfig;
use crate::reset::ResetNotifier;

/// Shared state for auth handlers and extractors.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<dyn SessionRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub notifier: Arc<dyn ResetNotifier>,
    pub config: AuthConfig,
}

impl AuthState {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        notifier: Arc<dyn ResetNotifier>,
        config: AuthConfig,
    ) -> Self {
        Self {
            sessions,
            users,
            roles,
            notifier,
            config,
        }
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
