use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

/// Relative spread applied around a nominal delay (+/- 20%)
const JITTER_RATIO: f64 = 0.2;

/// Simulated external-call latency with seedable jitter.
///
/// Shared by every activity of a worker; the lock is only held while drawing
/// a sample, never across a sleep.
pub struct LatencySimulator {
    rng: Mutex<StdRng>,
}

impl LatencySimulator {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// `nominal` shifted by a uniform offset in [-20%, +20%], in whole
    /// milliseconds and never negative.
    pub fn jittered(&self, nominal: Duration) -> Duration {
        let nominal_ms = nominal.as_millis() as f64;
        let variance = nominal_ms * JITTER_RATIO;
        let sample: f64 = self.rng().gen();

        let offset = (sample * 2.0 * variance).floor() - variance;
        Duration::from_millis((nominal_ms + offset).max(0.0) as u64)
    }

    /// Sleep for a jittered `nominal`.
    pub async fn pause(&self, nominal: Duration) {
        let delay = self.jittered(nominal);
        info!(delay_ms = delay.as_millis() as u64, "Simulating delay");
        tokio::time::sleep(delay).await;
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LatencySimulator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
