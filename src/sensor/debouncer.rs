use std::time::Duration;

use tokio::time::Instant;

/// Accepts an edge only when the quiet period has elapsed since the last
/// accepted one. Rejected edges do not extend the window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            last_accepted: None,
        }
    }

    pub fn accept(
        &mut self,
        now: Instant,
    ) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.quiet_period {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }
}
