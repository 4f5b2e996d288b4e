use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Section, User};
use crate::database::store::{StoreError, UserStore};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    by_username: HashMap<String, Uuid>,
}

/// In-process store with the same uniqueness and replacement rules as Postgres.
///
/// Used by the test suite and by `DATABASE_URL=memory://` for local runs.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a user, simulating a record that disappears after token issuance
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.remove(&id)?;
        inner.by_username.remove(&user.username);
        Some(user)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_username
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        // Check and insert under one write lock, the in-memory unique constraint
        let mut inner = self.inner.write().await;
        if inner.by_username.contains_key(username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let user = User::new(username, password_hash);
        inner.by_username.insert(user.username.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn replace_sections(&self, id: Uuid, sections: &[Section]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        user.sections = sections.to_vec();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
