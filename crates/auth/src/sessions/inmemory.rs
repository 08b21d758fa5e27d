//! In-memory session storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use fanzone_core::auth::{is_session_expired, Result, Session, SessionId, SessionRepository};

/// In-memory session store for development and testing.
///
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id.as_str()).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id.as_str());
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: i64) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !is_session_expired(s, now));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_session(id: &str, user_id: i64) -> Session {
        Session {
            id: SessionId::new(id.to_string()),
            user_id,
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(24),
        }
    }

    fn sid(id: &str) -> SessionId {
        SessionId::new(id.to_string())
    }

    #[tokio::test]
    async fn test_session_create_and_get() {
        let store = MemorySessionStore::new();
        store
            .create_session(&create_test_session("session-1", 7))
            .await
            .unwrap();

        let retrieved = store.get_session(&sid("session-1")).await.unwrap().unwrap();
        assert_eq!(retrieved.id.as_str(), "session-1");
        assert_eq!(retrieved.user_id, 7);
    }

    #[tokio::test]
    async fn test_session_get_nonexistent() {
        let store = MemorySessionStore::new();
        assert!(store.get_session(&sid("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_delete() {
        let store = MemorySessionStore::new();
        store
            .create_session(&create_test_session("session-1", 7))
            .await
            .unwrap();
        store.delete_session(&sid("session-1")).await.unwrap();

        assert!(store.get_session(&sid("session-1")).await.unwrap().is_none());
        assert!(store.delete_session(&sid("session-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_sessions() {
        let store = MemorySessionStore::new();
        for (id, user) in [("s1", 1), ("s2", 1), ("s3", 2)] {
            store
                .create_session(&create_test_session(id, user))
                .await
                .unwrap();
        }

        store.delete_user_sessions(1).await.unwrap();

        assert!(store.get_session(&sid("s1")).await.unwrap().is_none());
        assert!(store.get_session(&sid("s2")).await.unwrap().is_none());
        assert!(store.get_session(&sid("s3")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        let mut stale = create_test_session("stale", 1);
        stale.expires_at = now - Duration::minutes(1);
        store.create_session(&stale).await.unwrap();
        store
            .create_session(&create_test_session("fresh", 1))
            .await
            .unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert!(store.get_session(&sid("stale")).await.unwrap().is_none());
        assert!(store.get_session(&sid("fresh")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = MemorySessionStore::new();
        let clone = store.clone();
        store
            .create_session(&create_test_session("session-1", 7))
            .await
            .unwrap();

        assert!(clone.get_session(&sid("session-1")).await.unwrap().is_some());
    }
}
