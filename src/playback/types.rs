//! Messages exchanged with the player thread.
//!
//! Commands flow in as `PlayerCmd`; everything the player observes flows
//! back out as `PlaybackEvent`. Every event carries the id of the lecture
//! it belongs to so the receiver can drop reports from a superseded load.

use crate::library::MediaSource;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCmd {
    /// Replace whatever is loaded with `source`. Loading never starts
    /// playback on its own.
    Load {
        id: String,
        source: MediaSource,
        /// Known duration, used when the container cannot be probed.
        duration_hint: Option<f64>,
    },
    Play,
    Pause,
    TogglePause,
    /// Jump to an absolute position in seconds.
    SeekTo(f64),
    /// Seek by a relative number of seconds (positive or negative).
    SeekBy(f64),
    SetRate(f64),
    /// Unload the current lecture.
    Stop,
    /// Stop and terminate the player thread.
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Metadata is available; `duration` is in seconds.
    Loaded { id: String, duration: f64 },
    PositionChanged {
        id: String,
        position: f64,
        duration: f64,
    },
    StateChanged { id: String, playing: bool },
    /// Playback ran to the natural end.
    Ended { id: String },
    Error { id: String, message: String },
}

impl PlaybackEvent {
    pub fn id(&self) -> &str {
        match self {
            PlaybackEvent::Loaded { id, .. }
            | PlaybackEvent::PositionChanged { id, .. }
            | PlaybackEvent::StateChanged { id, .. }
            | PlaybackEvent::Ended { id }
            | PlaybackEvent::Error { id, .. } => id,
        }
    }
}
