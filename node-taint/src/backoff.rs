use std::time::Duration;

use time::ext::NumericalStdDuration as _;

/// Exponential backoff between removal attempts.
///
/// The first attempt runs immediately. The delay before attempt `n` (`n >= 2`)
/// is `initial_delay * multiplier^(n - 2)`, clamped to `max_delay` when set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_attempts: u32,
    pub max_delay: Option<Duration>,
}

impl BackoffPolicy {
    pub fn new(initial_delay: Duration, multiplier: f64, max_attempts: u32) -> Self {
        Self {
            initial_delay,
            multiplier,
            max_attempts,
            max_delay: None,
        }
    }

    pub fn with_max_delay(self, max_delay: impl Into<Option<Duration>>) -> Self {
        Self {
            max_delay: max_delay.into(),
            ..self
        }
    }

    /// Number of attempts actually made. At least one attempt always runs.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait before `attempt` (1-based), `None` for the first attempt
    /// and for attempts past the budget.
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt < 2 || attempt > self.attempts() {
            return None;
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.max(1.0).powi(exponent);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        Some(self.max_delay.map_or(delay, |max_delay| delay.min(max_delay)))
    }

    /// Every delay of the schedule, in order.
    pub fn delays(&self) -> Vec<Duration> {
        (2..=self.attempts())
            .filter_map(|attempt| self.delay(attempt))
            .collect()
    }

    /// Worst-case time spent sleeping when every attempt fails.
    pub fn total_delay(&self) -> Duration {
        self.delays()
            .into_iter()
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for BackoffPolicy {
    /// 500ms doubling over 10 attempts, i.e. the last delay is 0.5s * 2^8 = 128s.
    fn default() -> Self {
        Self::new(500.std_milliseconds(), 2.0, 10)
    }
}
