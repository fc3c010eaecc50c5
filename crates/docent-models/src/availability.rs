use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::completion::CompletionModel;

/// TTL'd backend health verdict.
///
/// A verdict is rechecked only after the interval expires, so routing
/// does not pay a health probe before every classification call. A
/// cached "unavailable" verdict short-circuits without any network
/// round-trip.
pub struct AvailabilityCache {
    interval: Duration,
    verdict: Mutex<Option<(Instant, bool)>>,
}

impl AvailabilityCache {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            verdict: Mutex::new(None),
        }
    }

    /// Current availability of `model`, probing only when the cached
    /// verdict has expired.
    pub async fn check(&self, model: &dyn CompletionModel) -> bool {
        let mut verdict = self.verdict.lock().await;
        if let Some((checked_at, available)) = *verdict {
            if checked_at.elapsed() < self.interval {
                return available;
            }
        }

        let available = model.ping().await;
        if !available {
            tracing::warn!("completion backend health probe failed");
        }
        *verdict = Some((Instant::now(), available));
        available
    }

    /// Record an observed failure so the next window short-circuits.
    pub async fn mark_unavailable(&self) {
        let mut verdict = self.verdict.lock().await;
        *verdict = Some((Instant::now(), false));
    }
}

impl Default for AvailabilityCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
