//! Search-box debouncing with caller-supplied time.
//!
//! The general feed waits for a 500 ms pause in typing; the my-listings
//! screen applies every keystroke immediately. Time is passed in rather than
//! read from a clock so hosts can drive it from their own timers and tests
//! stay deterministic.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePolicy {
    Immediate,
    /// Apply the latest text once no input arrived for this long.
    Window(Duration),
}

impl DebouncePolicy {
    pub const GENERAL_FEED: DebouncePolicy = DebouncePolicy::Window(Duration::from_millis(500));
}

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    policy: DebouncePolicy,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            pending: None,
        }
    }

    pub fn policy(&self) -> DebouncePolicy {
        self.policy
    }

    /// Record a keystroke. Returns the text to apply now, if any.
    pub fn input(&mut self, text: String, now: Instant) -> Option<String> {
        match self.policy {
            DebouncePolicy::Immediate => {
                self.pending = None;
                Some(text)
            }
            DebouncePolicy::Window(window) => {
                self.pending = Some((text, now + window));
                None
            }
        }
    }

    /// Release the pending text once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_policy_passes_text_through() {
        let mut d = SearchDebouncer::new(DebouncePolicy::Immediate);
        let now = Instant::now();
        assert_eq!(d.input("d".into(), now), Some("d".to_string()));
        assert_eq!(d.poll(now + Duration::from_secs(5)), None);
    }

    #[test]
    fn window_restarts_on_each_keystroke() {
        let mut d = SearchDebouncer::new(DebouncePolicy::GENERAL_FEED);
        let t0 = Instant::now();
        assert_eq!(d.input("d".into(), t0), None);
        assert_eq!(d.input("dh".into(), t0 + Duration::from_millis(300)), None);

        assert_eq!(d.poll(t0 + Duration::from_millis(500)), None);
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(800)));
        assert_eq!(d.poll(t0 + Duration::from_millis(800)), Some("dh".to_string()));
        assert_eq!(d.poll(t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn cancel_drops_pending_text() {
        let mut d = SearchDebouncer::new(DebouncePolicy::GENERAL_FEED);
        let t0 = Instant::now();
        d.input("x".into(), t0);
        d.cancel();
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }
}
