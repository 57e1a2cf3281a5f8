//! Filler questions for idle periods

use std::time::Duration;

use rand::seq::SliceRandom;

/// Decides when silence has gone on long enough to play filler content
pub struct IdleFallback {
    pool: Vec<String>,
    interval: Duration,
    enabled: bool,
}

impl IdleFallback {
    /// Create a fallback over the given filler pool
    #[must_use]
    pub fn new(pool: Vec<String>, interval: Duration, enabled: bool) -> Self {
        Self {
            pool,
            interval,
            enabled,
        }
    }

    /// Whether the fallback should fire on this tick
    ///
    /// Queued questions have strict priority: the fallback never fires while
    /// the queue holds an entry, and never before the idle interval has
    /// elapsed since the last completed playback.
    #[must_use]
    pub fn should_fire(&self, queue_empty: bool, idle_for: Duration) -> bool {
        self.enabled && !self.pool.is_empty() && queue_empty && idle_for >= self.interval
    }

    /// Uniformly pick one filler question
    #[must_use]
    pub fn pick(&self) -> Option<&str> {
        self.pool
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback(enabled: bool) -> IdleFallback {
        IdleFallback::new(
            vec!["what is rust".to_string(), "why streams".to_string()],
            Duration::from_secs(60),
            enabled,
        )
    }

    #[test]
    fn never_fires_with_queued_questions() {
        let fb = fallback(true);
        assert!(!fb.should_fire(false, Duration::from_secs(600)));
    }

    #[test]
    fn never_fires_before_idle_interval() {
        let fb = fallback(true);
        assert!(!fb.should_fire(true, Duration::from_secs(59)));
        assert!(fb.should_fire(true, Duration::from_secs(60)));
        assert!(fb.should_fire(true, Duration::from_secs(61)));
    }

    #[test]
    fn never_fires_when_disabled() {
        let fb = fallback(false);
        assert!(!fb.should_fire(true, Duration::from_secs(600)));
    }

    #[test]
    fn never_fires_with_empty_pool() {
        let fb = IdleFallback::new(Vec::new(), Duration::from_secs(60), true);
        assert!(!fb.should_fire(true, Duration::from_secs(600)));
        assert!(fb.pick().is_none());
    }

    #[test]
    fn pick_draws_from_pool() {
        let fb = fallback(true);
        for _ in 0..20 {
            let picked = fb.pick().unwrap();
            assert!(picked == "what is rust" || picked == "why streams");
        }
    }
}
