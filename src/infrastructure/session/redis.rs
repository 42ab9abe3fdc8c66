use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::entities::session::SessionRecord;
use crate::errors::AppError;
use crate::session::SessionStore;

/// Redis-backed registry: survives restarts and is shared across
/// instances. Records carry a server-side TTL matching `expires_at`.
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(pool: Pool) -> Self {
        RedisSessionStore { pool }
    }

    fn key(token: &str) -> String {
        format!("session:{}", token)
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, AppError> {
        self.pool
            .get()
            .await
            .map_err(|e| AppError::InternalError(format!("Redis pool error: {}", e)))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, token: &str, record: SessionRecord) -> Result<(), AppError> {
        let payload = serde_json::to_string(&record)
            .map_err(|e| AppError::InternalError(format!("Session encode error: {}", e)))?;

        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(token), payload, record.ttl_seconds().max(1))
            .await
            .map_err(|e| AppError::InternalError(format!("Redis error: {}", e)))
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(Self::key(token))
            .await
            .map_err(|e| AppError::InternalError(format!("Redis error: {}", e)))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let record: SessionRecord = serde_json::from_str(&raw)
            .map_err(|e| AppError::InternalError(format!("Session decode error: {}", e)))?;

        // The server-side TTL should have dropped it already; double-check
        // the timestamp in case of clock drift between writers.
        if record.is_expired() {
            let _: Result<(), _> = conn.del(Self::key(token)).await;
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn remove(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(Self::key(token))
            .await
            .map_err(|e| AppError::InternalError(format!("Redis error: {}", e)))
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        // Redis expires keys itself; nothing to sweep.
        Ok(0)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        conn.ping::<String>()
            .await
            .map(|_| ())
            .map_err(|e| AppError::InternalError(format!("Redis error: {}", e)))
    }
}
