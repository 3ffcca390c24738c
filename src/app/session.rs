use std::time::{Duration, Instant};

use crate::playback::{PlaybackEvent, PlayerCmd};

use super::model::{App, PlaybackState};

impl App {
    /// Start the lecture under the cursor.
    pub fn play_selected(&mut self, now: Instant) -> Vec<PlayerCmd> {
        self.load_lecture(self.selected, now)
    }

    /// Make `index` the current lecture and ask the player to load it.
    ///
    /// Progress of the lecture being left is saved first.
    pub fn load_lecture(&mut self, index: usize, now: Instant) -> Vec<PlayerCmd> {
        let Some(item) = self.library.get(index) else {
            return Vec::new();
        };
        let id = item.id.clone();
        let known = item.duration;
        let Some(source) = self.library.resolve(item) else {
            tracing::warn!(%id, "lecture source is no longer available");
            self.show_error(
                "This lecture is no longer available. Please select the folder again.",
                Some(now + self.notice_lifetime()),
            );
            return Vec::new();
        };

        if self.current.is_some() {
            self.save_progress(now);
        }

        self.current = Some(index);
        self.selected = index;
        self.playback = PlaybackState::Loading;
        self.position = 0.0;
        self.duration = known;
        self.pending_advance = None;
        self.resume_target = None;

        tracing::debug!(%id, "loading lecture");
        vec![PlayerCmd::Load {
            id,
            source,
            duration_hint: (known > 0.0).then_some(known),
        }]
    }

    pub fn previous_lecture(&mut self, now: Instant) -> Vec<PlayerCmd> {
        match self.current {
            Some(i) if i > 0 => self.load_lecture(i - 1, now),
            _ => Vec::new(),
        }
    }

    pub fn next_lecture(&mut self, now: Instant) -> Vec<PlayerCmd> {
        match self.current {
            Some(i) if i + 1 < self.library.len() => self.load_lecture(i + 1, now),
            _ => Vec::new(),
        }
    }

    fn transport_ready(&self) -> bool {
        self.current.is_some()
            && matches!(
                self.playback,
                PlaybackState::Playing | PlaybackState::Paused
            )
    }

    pub fn toggle_pause(&mut self) -> Vec<PlayerCmd> {
        if !self.transport_ready() {
            return Vec::new();
        }
        vec![PlayerCmd::TogglePause]
    }

    /// Seek by the configured step, backwards or forwards.
    pub fn seek_relative(&mut self, forward: bool) -> Vec<PlayerCmd> {
        if !self.transport_ready() {
            return Vec::new();
        }
        let step = self.settings.controls.seek_seconds as f64;
        vec![PlayerCmd::SeekBy(if forward { step } else { -step })]
    }

    /// Step through the configured rates. Stops at either end.
    pub fn cycle_rate(&mut self, faster: bool) -> Vec<PlayerCmd> {
        let last = self.settings.playback.rates.len().saturating_sub(1);
        let next = if faster {
            (self.rate_index + 1).min(last)
        } else {
            self.rate_index.saturating_sub(1)
        };
        if next == self.rate_index {
            return Vec::new();
        }
        self.rate_index = next;
        vec![PlayerCmd::SetRate(self.rate())]
    }

    /// Apply one event from the player.
    ///
    /// Events for anything but the current lecture are stale and dropped.
    pub fn handle_playback_event(&mut self, event: PlaybackEvent, now: Instant) -> Vec<PlayerCmd> {
        let Some(current_id) = self.current_item().map(|i| i.id.clone()) else {
            return Vec::new();
        };
        if event.id() != current_id {
            tracing::trace!(id = event.id(), "stale playback event ignored");
            return Vec::new();
        }

        match event {
            PlaybackEvent::Loaded { id, duration } => {
                if let Some(item) = self.library.item_mut(&id) {
                    if self.progress.correct_duration(item, duration) {
                        self.throttle.mark_dirty();
                    }
                }
                self.duration = duration;
                self.playback = PlaybackState::Paused;

                let mut cmds = Vec::new();
                let resume = self.progress.resume_time(&id);
                if resume > 0.0 && resume < duration {
                    tracing::debug!(%id, resume, "resuming lecture");
                    self.resume_target = Some(resume);
                    cmds.push(PlayerCmd::SeekTo(resume));
                }
                cmds.push(PlayerCmd::Play);
                cmds
            }
            PlaybackEvent::PositionChanged {
                id,
                position,
                duration,
            } => {
                if let Some(target) = self.resume_target {
                    if position < target {
                        tracing::trace!(%id, position, "position before resume seek ignored");
                        return Vec::new();
                    }
                    self.resume_target = None;
                }
                self.position = position;
                self.duration = duration;
                if self.progress.record_position(&id, position, duration) {
                    self.throttle.mark_dirty();
                }
                self.save_progress_throttled(now);
                Vec::new()
            }
            PlaybackEvent::StateChanged { playing, .. } => {
                self.playback = if playing {
                    PlaybackState::Playing
                } else {
                    PlaybackState::Paused
                };
                Vec::new()
            }
            PlaybackEvent::Ended { id } => {
                tracing::info!(%id, "lecture ended");
                self.progress.mark_completed(&id);
                self.save_progress(now);
                self.playback = PlaybackState::Stopped;
                self.position = 0.0;

                let has_next = self.current.is_some_and(|i| i + 1 < self.library.len());
                if self.settings.playback.auto_advance && has_next {
                    let delay = Duration::from_millis(self.settings.playback.auto_advance_delay_ms);
                    self.pending_advance = Some(now + delay);
                }
                Vec::new()
            }
            PlaybackEvent::Error { id, message } => {
                tracing::warn!(%id, %message, "playback error");
                self.playback = PlaybackState::Stopped;
                self.resume_target = None;
                self.show_error(
                    format!("Unable to load the lecture video: {message}"),
                    Some(now + self.notice_lifetime()),
                );
                Vec::new()
            }
        }
    }

    /// Time-driven housekeeping: expire notices, run a due auto-advance and
    /// flush progress the throttle held back.
    pub fn tick(&mut self, now: Instant) -> Vec<PlayerCmd> {
        if self
            .notice
            .as_ref()
            .and_then(|n| n.expires_at)
            .is_some_and(|at| now >= at)
        {
            self.notice = None;
        }

        self.save_progress_throttled(now);

        match self.pending_advance {
            Some(at) if now >= at => {
                self.pending_advance = None;
                self.next_lecture(now)
            }
            _ => Vec::new(),
        }
    }

    /// Final save and locator release before the process exits.
    pub fn shutdown(&mut self, now: Instant) {
        self.save_progress(now);
        self.library.release();
        tracing::info!("session closed");
    }
}
