//! Per-path cooldown tracking.
//!
//! Committing an edit makes the host save again; the cooldown keeps that
//! follow-up save from being processed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Minimum interval before the same path is processed again.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Age after which a tracked path is forgotten.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// Last-processed timestamps keyed by path.
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    cooldown: Duration,
    expiry: Duration,
    last_processed: HashMap<PathBuf, Instant>,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, DEFAULT_EXPIRY)
    }
}

impl CooldownTracker {
    /// Tracker with custom windows.
    #[must_use]
    pub fn new(cooldown: Duration, expiry: Duration) -> Self {
        Self {
            cooldown,
            expiry,
            last_processed: HashMap::new(),
        }
    }

    /// Whether `path` was processed less than the cooldown ago.
    #[must_use]
    pub fn is_cooling_down(&self, path: &Path, now: Instant) -> bool {
        self.last_processed
            .get(path)
            .is_some_and(|last| now.saturating_duration_since(*last) < self.cooldown)
    }

    /// Mark `path` as processed at `now`.
    pub fn record(&mut self, path: &Path, now: Instant) {
        self.last_processed.insert(path.to_path_buf(), now);
    }

    /// Drop entries older than the expiry. Returns how many were removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.last_processed.len();
        let expiry = self.expiry;
        self.last_processed
            .retain(|_, last| now.saturating_duration_since(*last) <= expiry);
        before - self.last_processed.len()
    }

    /// Number of tracked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_processed.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_processed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_window() {
        let mut tracker = CooldownTracker::default();
        let path = Path::new("/p/main.go");
        let t0 = Instant::now();

        assert!(!tracker.is_cooling_down(path, t0));
        tracker.record(path, t0);
        assert!(tracker.is_cooling_down(path, t0 + Duration::from_secs(3)));
        assert!(!tracker.is_cooling_down(path, t0 + Duration::from_secs(5)));
        assert!(!tracker.is_cooling_down(Path::new("/p/other.go"), t0));
    }

    #[test]
    fn test_sweep_removes_expired_only() {
        let mut tracker = CooldownTracker::default();
        let t0 = Instant::now();
        tracker.record(Path::new("/old.go"), t0);
        tracker.record(Path::new("/new.go"), t0 + Duration::from_secs(200));

        assert_eq!(tracker.sweep(t0 + Duration::from_secs(300)), 0);
        assert_eq!(tracker.sweep(t0 + Duration::from_secs(301)), 1);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.is_cooling_down(Path::new("/new.go"), t0 + Duration::from_secs(201)));
    }
}
