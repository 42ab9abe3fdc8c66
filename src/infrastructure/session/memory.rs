use async_trait::async_trait;
use dashmap::DashMap;

use crate::entities::session::SessionRecord;
use crate::errors::AppError;
use crate::session::SessionStore;

/// Process-local registry. Lost on restart and invisible to other
/// instances; the default for single-instance deployments and tests.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, token: &str, record: SessionRecord) -> Result<(), AppError> {
        self.sessions.insert(token.to_string(), record);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        match self.sessions.get(token) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.clone())),
            Some(_) => {
                // Evict lazily so a dead token never resolves again
                drop(self.sessions.remove(token));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: &str) -> Result<(), AppError> {
        self.sessions.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired());
        Ok((before - self.sessions.len()) as u64)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}
