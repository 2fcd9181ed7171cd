//! Login sessions keyed by an opaque cookie value.
//!
//! A session keeps the user and the admin slots apart, so logging out of one
//! leaves the other signed in.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::SessionUser;

pub use memory::MemorySessionStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub admin: Option<SessionUser>,
}

impl Session {
    pub fn is_empty(&self) -> bool { self.user.is_none() && self.admin.is_none() }
}

/// Storage abstraction for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `session` under a fresh id and return the id.
    async fn create(&self, session: Session) -> String;
    async fn get(&self, id: &str) -> Option<Session>;
    /// Replace the session stored under `id`.
    async fn put(&self, id: &str, session: Session);
    async fn remove(&self, id: &str);
}
