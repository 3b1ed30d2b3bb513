use std::time::Duration;

/// Retry bounds for the conditional claim write.
///
/// A lost race on the availability flip means another claim consumed the
/// candidate seat between selection and write; the engine re-selects up
/// to `max_attempts` times with exponential backoff capped at
/// `max_backoff`. Exhaustion is reported the same way as a sold-out
/// flight, because from the caller's side no seat could be obtained.
#[derive(Debug, Clone)]
pub struct ClaimPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(80),
        }
    }
}

impl ClaimPolicy {
    /// Backoff before the retry following attempt `attempt` (zero-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exp = self
            .base_backoff
            .saturating_mul(2u32.saturating_pow(attempt));
        exp.min(self.max_backoff)
    }
}
