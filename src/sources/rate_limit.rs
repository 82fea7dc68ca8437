use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum spacing between outbound requests.
///
/// The slot lock is held across the wait, so concurrent callers queue up and
/// are released one spacing apart.
pub struct RateLimiter {
    spacing: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last: Mutex::new(None),
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.spacing;
            if ready_at > Instant::now() {
                sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}
