use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::probe::probe_duration;
use super::transport::Transport;
use super::types::{PlaybackEvent, PlayerCmd};

/// Run the transport on its own thread.
///
/// Commands are applied as they arrive; between commands the loop wakes
/// every `tick` to report the position. The thread exits on `Quit` or when
/// either channel end is dropped.
pub(super) fn spawn_player_thread(
    rx: Receiver<PlayerCmd>,
    events: Sender<PlaybackEvent>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut transport = Transport::new();

        loop {
            let out = match rx.recv_timeout(tick) {
                Ok(PlayerCmd::Quit) => {
                    tracing::debug!("player thread quitting");
                    let _ = emit(&events, transport.stop());
                    break;
                }
                Ok(cmd) => apply(&mut transport, cmd, Instant::now()),
                Err(RecvTimeoutError::Timeout) => transport.tick(Instant::now()),
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if emit(&events, out).is_err() {
                // Nobody is listening anymore.
                break;
            }
        }
    })
}

fn emit(events: &Sender<PlaybackEvent>, out: Vec<PlaybackEvent>) -> Result<(), ()> {
    for event in out {
        events.send(event).map_err(|_| ())?;
    }
    Ok(())
}

fn apply(transport: &mut Transport, cmd: PlayerCmd, now: Instant) -> Vec<PlaybackEvent> {
    match cmd {
        PlayerCmd::Load {
            id,
            source,
            duration_hint,
        } => match probe_duration(&source, duration_hint) {
            Ok(duration) => {
                tracing::info!(%id, source = %source.describe(), duration, "loaded");
                transport.load(id, duration)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to load");
                let mut out = transport.stop();
                out.push(PlaybackEvent::Error {
                    id,
                    message: e.to_string(),
                });
                out
            }
        },
        PlayerCmd::Play => transport.play(now),
        PlayerCmd::Pause => transport.pause(now),
        PlayerCmd::TogglePause => transport.toggle(now),
        PlayerCmd::SeekTo(target) => transport.seek_to(target, now),
        PlayerCmd::SeekBy(delta) => transport.seek_by(delta, now),
        PlayerCmd::SetRate(rate) => {
            transport.set_rate(rate, now);
            Vec::new()
        }
        PlayerCmd::Stop => transport.stop(),
        // Handled by the loop.
        PlayerCmd::Quit => Vec::new(),
    }
}
