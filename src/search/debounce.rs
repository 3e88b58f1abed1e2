use std::time::{Duration, Instant};

/// Fires once after the input has been quiet for `quiet`. Every `arm` restarts
/// the period, so a burst of keystrokes collapses into a single firing.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    armed_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    /// Returns true exactly once per quiet period and disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_quiet_period_only_once() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(1000));
        d.arm(t0);
        assert!(!d.fire(t0 + Duration::from_millis(999)));
        assert!(d.fire(t0 + Duration::from_millis(1000)));
        assert!(!d.fire(t0 + Duration::from_millis(5000)));
    }

    #[test]
    fn rearming_restarts_the_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(1000));
        d.arm(t0);
        d.arm(t0 + Duration::from_millis(800));
        assert!(!d.fire(t0 + Duration::from_millis(1500)));
        assert!(!d.fire(t0 + Duration::from_millis(1799)));
        assert!(d.fire(t0 + Duration::from_millis(1800)));
    }

    #[test]
    fn disarmed_never_fires() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.arm(t0);
        d.disarm();
        assert!(!d.fire(t0 + Duration::from_secs(1)));
    }
}
