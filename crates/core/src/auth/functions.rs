use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::{Session, SessionId};

const SESSION_ID_LEN: usize = 32;

/// Generate a random alphanumeric session ID.
pub fn generate_session_id() -> SessionId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect();
    SessionId::new(id)
}

/// Builds a session for `user_id` that expires `ttl` after `now`.
pub fn new_session(user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Session {
    Session {
        id: generate_session_id(),
        user_id,
        created_at: now,
        expires_at: calculate_expiry(now, ttl),
    }
}

/// Check if a session has expired.
pub fn is_session_expired(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_at <= now
}

/// Calculate session expiry from creation time and TTL.
pub fn calculate_expiry(created_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created_at + ttl
}
