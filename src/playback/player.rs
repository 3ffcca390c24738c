use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_player_thread;
use super::types::{PlaybackEvent, PlayerCmd};

/// Handle to the player thread.
pub struct Player {
    tx: Sender<PlayerCmd>,
    events: Receiver<PlaybackEvent>,
    join: Option<JoinHandle<()>>,
}

impl Player {
    /// Spawn a player reporting positions every `tick`.
    pub fn new(tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let (event_tx, events) = mpsc::channel::<PlaybackEvent>();
        let join = spawn_player_thread(rx, event_tx, tick);

        Self {
            tx,
            events,
            join: Some(join),
        }
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), mpsc::SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Drain every event produced since the last call, without blocking.
    pub fn try_events(&self) -> Vec<PlaybackEvent> {
        self.events.try_iter().collect()
    }

    /// Block up to `timeout` for the next event.
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PlaybackEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Stop the thread and wait for it to exit.
    pub fn quit(&mut self) {
        let _ = self.send(PlayerCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.quit();
    }
}
