//! Playback backend.
//!
//! A `Player` owns a background thread running a clock-driven transport.
//! The rest of the program only talks to it through `PlayerCmd` and
//! `PlaybackEvent` values; no state is shared across the thread boundary.

mod player;
mod probe;
mod thread;
mod transport;
mod types;

pub use player::Player;
pub use types::{PlaybackEvent, PlayerCmd};
