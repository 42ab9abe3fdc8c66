use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::session::SessionStore;

/// Hourly sweep of expired session records. Stores with server-side
/// expiry report zero and the sweep is a no-op.
pub async fn start_session_purge_task(store: Arc<dyn SessionStore>) {
    let mut interval = interval(Duration::from_secs(60 * 60));

    loop {
        interval.tick().await;

        match store.purge_expired().await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Purged {} expired sessions", count),
            Err(e) => tracing::error!("Session purge failed: {}", e),
        }
    }
}
