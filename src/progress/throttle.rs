use std::time::{Duration, Instant};

/// Rate limit for progress writes during playback.
///
/// `should_save` grants at most one save per `interval`; teardown paths call
/// `mark_saved` after an unconditional save so the window restarts.
#[derive(Debug, Clone)]
pub struct SaveThrottle {
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
}

impl SaveThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: None,
            dirty: false,
        }
    }

    /// Note that in-memory progress changed since the last save.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a throttled save is due at `now`.
    pub fn should_save(&self, now: Instant) -> bool {
        self.dirty
            && self
                .last_save
                .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }

    pub fn mark_saved(&mut self, now: Instant) {
        self.last_save = Some(now);
        self.dirty = false;
    }
}
