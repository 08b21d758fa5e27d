use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{AuthError, Session, SessionId};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Session storage abstraction.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session.
    async fn create_session(&self, session: &Session) -> Result<()>;

    /// Retrieve session by ID.
    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Delete a specific session.
    async fn delete_session(&self, id: &SessionId) -> Result<()>;

    /// Delete all sessions for a user.
    async fn delete_user_sessions(&self, user_id: i64) -> Result<()>;

    /// Drop sessions that expired at or before `now`, returning how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}
