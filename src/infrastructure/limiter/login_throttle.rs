use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

#[derive(Debug)]
struct AttemptWindow {
    window_start: Instant,
    count: u64,
    last_seen: Instant,
}

impl AttemptWindow {
    fn new() -> Self {
        let now = Instant::now();
        AttemptWindow {
            window_start: now,
            count: 0,
            last_seen: now,
        }
    }
}

/// Fixed-window login throttle keyed by client address. Counts every
/// attempt; once the window limit is hit, callers get the seconds left
/// until the window rolls over.
#[derive(Clone)]
pub struct LoginThrottle {
    attempts: Arc<DashMap<String, Arc<Mutex<AttemptWindow>>>>,
    max_attempts: u64,
    window: Duration,
}

impl LoginThrottle {
    pub fn new(max_attempts: u64, window: Duration, idle_ttl: Duration) -> Self {
        let throttle = LoginThrottle {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            window,
        };

        // Evict windows nobody has touched for a while
        {
            let map = throttle.attempts.clone();
            tokio::spawn(async move {
                loop {
                    sleep(Duration::from_secs(60)).await;
                    let now = Instant::now();
                    map.retain(|_, entry| {
                        now.duration_since(entry.lock().last_seen) <= idle_ttl
                    });
                }
            });
        }

        throttle
    }

    /// Records one attempt for `key`. `Err` carries the retry-after in
    /// whole seconds.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let entry = self
            .attempts
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(AttemptWindow::new())))
            .clone();

        let mut window = entry.lock();
        let now = Instant::now();
        window.last_seen = now;

        if now.duration_since(window.window_start) >= self.window {
            window.window_start = now;
            window.count = 0;
        }

        if window.count < self.max_attempts {
            window.count += 1;
            Ok(())
        } else {
            let elapsed = now.duration_since(window.window_start);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            Err(retry_after)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn attempts_under_the_limit_pass() {
        let throttle = LoginThrottle::new(3, Duration::from_secs(60), Duration::from_secs(300));
        for _ in 0..3 {
            assert!(throttle.check("1.2.3.4").is_ok());
        }
    }

    #[actix_rt::test]
    async fn limit_is_enforced_per_key() {
        let throttle = LoginThrottle::new(2, Duration::from_secs(60), Duration::from_secs(300));
        assert!(throttle.check("a").is_ok());
        assert!(throttle.check("a").is_ok());

        let retry_after = throttle.check("a").unwrap_err();
        assert!(retry_after >= 1);

        // A different client is unaffected
        assert!(throttle.check("b").is_ok());
    }

    #[actix_rt::test]
    async fn window_rolls_over() {
        let throttle = LoginThrottle::new(1, Duration::from_millis(20), Duration::from_secs(300));
        assert!(throttle.check("a").is_ok());
        assert!(throttle.check("a").is_err());

        sleep(Duration::from_millis(30)).await;
        assert!(throttle.check("a").is_ok());
    }
}
