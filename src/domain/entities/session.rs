use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::Role;

/// What the registry holds per opaque token. Serializable so the Redis
/// store can persist it as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(user_id: Uuid, email: String, role: Role, ttl: chrono::Duration) -> Self {
        SessionRecord {
            user_id,
            email,
            role,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Seconds until expiry, clamped at zero. Used as the Redis TTL.
    pub fn ttl_seconds(&self) -> u64 {
        self.expires_at
            .signed_duration_since(Utc::now())
            .num_seconds()
            .max(0) as u64
    }
}

/// Request-scoped identity resolved from the session cookie, inserted
/// into request extensions by the session middleware.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl CurrentSession {
    pub fn from_record(token: &str, record: &SessionRecord) -> Self {
        CurrentSession {
            token: token.to_string(),
            user_id: record.user_id,
            email: record.email.clone(),
            role: record.role,
        }
    }
}
