use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use super::{Session, SessionStore};

/// Process-local session store; entries expire after `idle` without access.
#[derive(Clone)]
pub struct MemorySessionStore {
    cache: Cache<String, Session>,
}

impl MemorySessionStore {
    pub fn new(idle: Duration, max_sessions: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.cache.insert(id.clone(), session).await;
        debug!(session_id = %id, "session_created");
        id
    }

    async fn get(&self, id: &str) -> Option<Session> {
        self.cache.get(id).await
    }

    async fn put(&self, id: &str, session: Session) {
        self.cache.insert(id.to_string(), session).await;
    }

    async fn remove(&self, id: &str) {
        self.cache.invalidate(id).await;
        debug!(session_id = %id, "session_removed");
    }
}
