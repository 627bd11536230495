use crate::error::ConfigError;
use std::time::Duration;
use tokio::time::Instant;

/// Longest accepted window, so that window deadlines always fit in an [Instant].
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// At most `calls` calls per fixed `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    period: Duration,
    calls: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(3),
            calls: 1,
        }
    }
}

impl RateLimit {
    pub fn new(period: Duration, calls: u32) -> Result<Self, ConfigError> {
        if calls == 0 {
            return Err(ConfigError::ZeroCallsPerPeriod);
        }
        if period > MAX_PERIOD {
            return Err(ConfigError::PeriodTooLong(period));
        }
        Ok(Self { period, calls })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

/// A fixed window limiter that defers calls instead of rejecting them.
///
/// A window opens with the first call made after the previous one expired.
/// Once `calls` have been made inside it, [FixedWindowLimiter::until_ready]
/// sleeps until the window closes and then opens the next one.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: RateLimit,
    window: Option<Window>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    reset: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            window: None,
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Waits until one more call is allowed and records it.
    pub async fn until_ready(&mut self) {
        let now = Instant::now();
        let calls = self.limit.calls;
        match &mut self.window {
            Some(w) if w.reset > now && w.count < calls => {
                w.count += 1;
            }
            Some(w) if w.reset > now => {
                let reset = w.reset;
                tracing::debug!(
                    wait_ms = reset.saturating_duration_since(now).as_millis() as u64,
                    calls,
                    period_ms = self.limit.period.as_millis() as u64,
                    "Rate limit reached, deferring call"
                );
                tokio::time::sleep_until(reset).await;
                self.open_window(reset);
            }
            _ => self.open_window(now),
        }
    }

    fn open_window(&mut self, start: Instant) {
        self.window = Some(Window {
            reset: start + self.limit.period,
            count: 1,
        });
    }
}
