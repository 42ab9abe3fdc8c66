use async_trait::async_trait;

use crate::entities::session::SessionRecord;
use crate::errors::AppError;

pub mod memory;
pub mod redis;

pub use memory::MemorySessionStore;
pub use redis::RedisSessionStore;

/// Keyed session registry. Implementations must treat `expires_at` as
/// authoritative: a lookup of an expired record misses and evicts it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: &str, record: SessionRecord) -> Result<(), AppError>;
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, AppError>;
    async fn remove(&self, token: &str) -> Result<(), AppError>;
    /// Sweeps expired entries, returning how many were dropped. Stores
    /// with server-side expiry may report zero.
    async fn purge_expired(&self) -> Result<u64, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}
