//! [`Cooldowns`] – timed disable windows for behaviors.
//!
//! A behavior that exhausts its retry budget calls [`Cooldowns::disable`]
//! and completes.  The candidate policy consults [`Cooldowns::is_disabled`]
//! before proposing that behavior again, so the failure turns into a quiet
//! pause instead of an endless propose/fail cycle.
//!
//! Time is always passed in explicitly; nothing here reads the clock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

/// Tracks, per behavior name, the instant until which it stays disabled.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use waypilot_kernel::Cooldowns;
///
/// let now = Instant::now();
/// let mut cd = Cooldowns::new();
/// cd.disable("loot", now, Duration::from_secs(20));
///
/// assert!(cd.is_disabled("loot", now + Duration::from_secs(5)));
/// assert!(!cd.is_disabled("loot", now + Duration::from_secs(20)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Cooldowns {
    until: HashMap<String, Instant>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable `behavior` for `duration` starting at `now`.
    ///
    /// Disabling an already disabled behavior extends the window only if
    /// the new deadline is later.
    pub fn disable(&mut self, behavior: &str, now: Instant, duration: Duration) {
        let deadline = now + duration;
        let entry = self.until.entry(behavior.to_string()).or_insert(deadline);
        if *entry < deadline {
            *entry = deadline;
        }
        info!(behavior, secs = duration.as_secs_f32(), "behavior disabled");
    }

    /// True while `behavior`'s window is still open at `now`.
    pub fn is_disabled(&self, behavior: &str, now: Instant) -> bool {
        self.until.get(behavior).is_some_and(|&t| now < t)
    }

    /// Time left in `behavior`'s window, if any.
    pub fn remaining(&self, behavior: &str, now: Instant) -> Option<Duration> {
        self.until
            .get(behavior)
            .and_then(|&t| t.checked_duration_since(now))
            .filter(|d| !d.is_zero())
    }

    /// Every behavior still disabled at `now` with its time left, by name.
    pub fn active(&self, now: Instant) -> Vec<(&str, Duration)> {
        let mut open: Vec<(&str, Duration)> = self
            .until
            .keys()
            .filter_map(|name| Some((name.as_str(), self.remaining(name, now)?)))
            .collect();
        open.sort_unstable_by_key(|&(name, _)| name);
        open
    }

    /// Drop every window (used between test runs and on `/run` restarts).
    pub fn reset(&mut self) {
        self.until.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_behavior_is_enabled() {
        let cd = Cooldowns::new();
        assert!(!cd.is_disabled("combat", Instant::now()));
    }

    #[test]
    fn window_expires() {
        let t0 = Instant::now();
        let mut cd = Cooldowns::new();
        cd.disable("emergency_heal", t0, Duration::from_secs(30));
        assert!(cd.is_disabled("emergency_heal", t0));
        assert!(cd.is_disabled("emergency_heal", t0 + Duration::from_secs(29)));
        assert!(!cd.is_disabled("emergency_heal", t0 + Duration::from_secs(30)));
    }

    #[test]
    fn shorter_disable_does_not_shrink_window() {
        let t0 = Instant::now();
        let mut cd = Cooldowns::new();
        cd.disable("loot", t0, Duration::from_secs(20));
        cd.disable("loot", t0, Duration::from_secs(1));
        assert!(cd.is_disabled("loot", t0 + Duration::from_secs(10)));
    }

    #[test]
    fn remaining_reports_time_left() {
        let t0 = Instant::now();
        let mut cd = Cooldowns::new();
        cd.disable("loot", t0, Duration::from_secs(20));
        assert_eq!(
            cd.remaining("loot", t0 + Duration::from_secs(5)),
            Some(Duration::from_secs(15))
        );
        assert_eq!(cd.remaining("loot", t0 + Duration::from_secs(25)), None);
        assert_eq!(cd.remaining("combat", t0), None);
    }

    #[test]
    fn active_lists_open_windows_by_name() {
        let t0 = Instant::now();
        let mut cd = Cooldowns::new();
        cd.disable("loot", t0, Duration::from_secs(20));
        cd.disable("emergency_heal", t0, Duration::from_secs(30));
        cd.disable("combat", t0, Duration::from_secs(1));
        let at = t0 + Duration::from_secs(10);
        assert_eq!(
            cd.active(at),
            vec![
                ("emergency_heal", Duration::from_secs(20)),
                ("loot", Duration::from_secs(10)),
            ]
        );
        cd.reset();
        assert!(cd.active(t0).is_empty());
    }
}
