//! Debounce guard and cooperative countdown, both driven by caller-supplied
//! instants so the UI frame loop is the only clock.

use std::time::{Duration, Instant};

/// Drops actions that arrive within `window` of the last accepted one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Single-shot timer polled from the frame loop.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    deadline: Option<Instant>,
}

impl Countdown {
    pub fn start(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
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
    fn debounce_drops_rapid_duplicates() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(250));
        assert!(d.accept(t0));
        assert!(!d.accept(t0 + Duration::from_millis(100)));
        assert!(d.accept(t0 + Duration::from_millis(300)));
        // the dropped event does not extend the window
        assert!(!d.accept(t0 + Duration::from_millis(400)));
        assert!(d.accept(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn zero_window_accepts_everything() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        assert!(d.accept(t0));
        assert!(d.accept(t0));
    }

    #[test]
    fn countdown_fires_once() {
        let t0 = Instant::now();
        let mut c = Countdown::default();
        assert!(!c.fire(t0));
        c.start(t0, Duration::from_secs(2));
        assert_eq!(c.remaining(t0 + Duration::from_secs(1)), Some(Duration::from_secs(1)));
        assert!(!c.fire(t0 + Duration::from_secs(1)));
        assert!(c.fire(t0 + Duration::from_secs(2)));
        assert!(!c.fire(t0 + Duration::from_secs(3)));
        assert!(!c.is_running());
    }

    #[test]
    fn cancelled_countdown_never_fires() {
        let t0 = Instant::now();
        let mut c = Countdown::default();
        c.start(t0, Duration::from_millis(10));
        c.cancel();
        assert!(!c.fire(t0 + Duration::from_secs(1)));
    }
}
