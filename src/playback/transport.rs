//! Clock-driven transport state.
//!
//! `Transport` tracks one loaded lecture the way a media element does:
//! position advances with wall time scaled by the playback rate while
//! playing, and stops at the duration. All time is passed in explicitly so
//! the state machine can be driven deterministically.

use std::time::Instant;

use super::types::PlaybackEvent;

#[derive(Debug)]
struct Loaded {
    id: String,
    duration: f64,
    /// Position at `started_at` (or the frozen position while paused).
    offset: f64,
    started_at: Option<Instant>,
    ended: bool,
}

impl Loaded {
    fn position(&self, rate: f64, now: Instant) -> f64 {
        let running = self
            .started_at
            .map_or(0.0, |st| now.saturating_duration_since(st).as_secs_f64() * rate);
        (self.offset + running).clamp(0.0, self.duration)
    }

    fn position_event(&self, position: f64) -> PlaybackEvent {
        PlaybackEvent::PositionChanged {
            id: self.id.clone(),
            position,
            duration: self.duration,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Transport {
    rate: f64,
    loaded: Option<Loaded>,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            rate: 1.0,
            loaded: None,
        }
    }
}

impl Transport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn rate(&self) -> f64 {
        self.rate
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.loaded.as_ref().is_some_and(|l| l.started_at.is_some())
    }

    #[cfg(test)]
    pub(crate) fn current_id(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.id.as_str())
    }

    pub(crate) fn position(&self, now: Instant) -> Option<f64> {
        self.loaded.as_ref().map(|l| l.position(self.rate, now))
    }

    /// Load `id`, paused at zero. Replaces anything loaded before.
    ///
    /// Only metadata is reported. The first position report comes from a
    /// seek or from the clock once playing, so a stored resume point is not
    /// overwritten by the initial zero.
    pub(crate) fn load(&mut self, id: String, duration: f64) -> Vec<PlaybackEvent> {
        let mut events = self.stop();
        let loaded = Loaded {
            id,
            duration,
            offset: 0.0,
            started_at: None,
            ended: false,
        };
        events.push(PlaybackEvent::Loaded {
            id: loaded.id.clone(),
            duration,
        });
        self.loaded = Some(loaded);
        events
    }

    pub(crate) fn play(&mut self, now: Instant) -> Vec<PlaybackEvent> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Vec::new();
        };
        if loaded.started_at.is_some() {
            return Vec::new();
        }
        let mut events = Vec::new();
        // Playing again after the end restarts from the top.
        if loaded.ended || loaded.offset >= loaded.duration {
            loaded.offset = 0.0;
            loaded.ended = false;
            events.push(loaded.position_event(0.0));
        }
        loaded.started_at = Some(now);
        events.push(PlaybackEvent::StateChanged {
            id: loaded.id.clone(),
            playing: true,
        });
        events
    }

    pub(crate) fn pause(&mut self, now: Instant) -> Vec<PlaybackEvent> {
        let rate = self.rate;
        let Some(loaded) = self.loaded.as_mut() else {
            return Vec::new();
        };
        if loaded.started_at.is_none() {
            return Vec::new();
        }
        let position = loaded.position(rate, now);
        loaded.offset = position;
        loaded.started_at = None;
        vec![
            loaded.position_event(position),
            PlaybackEvent::StateChanged {
                id: loaded.id.clone(),
                playing: false,
            },
        ]
    }

    pub(crate) fn toggle(&mut self, now: Instant) -> Vec<PlaybackEvent> {
        if self.is_playing() {
            self.pause(now)
        } else {
            self.play(now)
        }
    }

    /// Jump to `target` seconds, clamped to `[0, duration]`.
    pub(crate) fn seek_to(&mut self, target: f64, now: Instant) -> Vec<PlaybackEvent> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Vec::new();
        };
        let target = if target.is_finite() { target } else { 0.0 };
        loaded.offset = target.clamp(0.0, loaded.duration);
        loaded.ended = false;
        if loaded.started_at.is_some() {
            loaded.started_at = Some(now);
        }
        vec![loaded.position_event(loaded.offset)]
    }

    pub(crate) fn seek_by(&mut self, delta: f64, now: Instant) -> Vec<PlaybackEvent> {
        match self.position(now) {
            Some(position) => self.seek_to(position + delta, now),
            None => Vec::new(),
        }
    }

    /// Change the rate without jumping: elapsed time so far is folded into
    /// the offset at the old rate.
    pub(crate) fn set_rate(&mut self, rate: f64, now: Instant) {
        if !(rate.is_finite() && rate > 0.0) {
            return;
        }
        let old = self.rate;
        if let Some(loaded) = self.loaded.as_mut() {
            if loaded.started_at.is_some() {
                loaded.offset = loaded.position(old, now);
                loaded.started_at = Some(now);
            }
        }
        self.rate = rate;
    }

    pub(crate) fn stop(&mut self) -> Vec<PlaybackEvent> {
        match self.loaded.take() {
            Some(loaded) if loaded.started_at.is_some() => vec![PlaybackEvent::StateChanged {
                id: loaded.id,
                playing: false,
            }],
            _ => Vec::new(),
        }
    }

    /// Periodic position report. Emits `Ended` once when the clock reaches
    /// the duration.
    pub(crate) fn tick(&mut self, now: Instant) -> Vec<PlaybackEvent> {
        let rate = self.rate;
        let Some(loaded) = self.loaded.as_mut() else {
            return Vec::new();
        };
        if loaded.started_at.is_none() {
            return Vec::new();
        }

        let position = loaded.position(rate, now);
        if position < loaded.duration {
            return vec![loaded.position_event(position)];
        }

        loaded.offset = loaded.duration;
        loaded.started_at = None;
        loaded.ended = true;
        vec![
            loaded.position_event(loaded.duration),
            PlaybackEvent::StateChanged {
                id: loaded.id.clone(),
                playing: false,
            },
            PlaybackEvent::Ended {
                id: loaded.id.clone(),
            },
        ]
    }
}
