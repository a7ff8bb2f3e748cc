use std::time::Duration;

use web_time::Instant;

/// Trailing-edge debouncer: only the last value scheduled within `delay`
/// of the previous one is released.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the quiet period.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Whether a value is waiting to be released.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => {
                self.pending.take().map(|(_, value)| value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_only_last_value_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(250));
        d.schedule(t0, 1);
        d.schedule(t0 + Duration::from_millis(100), 2);

        assert_eq!(d.poll(t0 + Duration::from_millis(300)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(350)), Some(2));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + Duration::from_millis(1000)), None);
    }
}
