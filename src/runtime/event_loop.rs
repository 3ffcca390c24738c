use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::playback::{Player, PlayerCmd};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: drains player events, runs housekeeping,
/// draws, then handles at most one key press. Returns `Ok(())` when the
/// user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    player: &Player,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        for event in player.try_events() {
            let cmds = app.handle_playback_event(event, now);
            dispatch(player, cmds);
        }
        let cmds = app.tick(now);
        dispatch(player, cmds);

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, player, state)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Forward commands produced by the app to the player thread.
pub fn dispatch(player: &Player, cmds: Vec<PlayerCmd>) {
    for cmd in cmds {
        if let Err(e) = player.send(cmd) {
            tracing::error!(error = %e, "player thread is gone");
            break;
        }
    }
}

fn handle_prompt_key(key: KeyEvent, app: &mut App, player: &Player) {
    match key.code {
        KeyCode::Esc => app.cancel_open_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Enter => {
            let cmds = app.submit_open_prompt(Instant::now());
            dispatch(player, cmds);
        }
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        _ => {}
    }
}

fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    player: &Player,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.open_prompt.is_some() {
        state.pending_gg = false;
        handle_prompt_key(key, app, player);
        return Ok(false);
    }

    let now = Instant::now();
    let cmds = match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return Ok(true);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            return Ok(false);
        }
        KeyCode::Char('G') => {
            app.select_last();
            Vec::new()
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.next();
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prev();
            Vec::new()
        }
        KeyCode::Enter => app.play_selected(now),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('h') => app.previous_lecture(now),
        KeyCode::Char('l') => app.next_lecture(now),
        KeyCode::Char('H') | KeyCode::Left => app.seek_relative(false),
        KeyCode::Char('L') | KeyCode::Right => app.seek_relative(true),
        KeyCode::Char('<') => app.cycle_rate(false),
        KeyCode::Char('>') => app.cycle_rate(true),
        KeyCode::Char('o') => {
            app.begin_open_prompt();
            Vec::new()
        }
        KeyCode::Char('R') => app.refresh(now),
        KeyCode::Char('K') => {
            app.toggle_details_window();
            Vec::new()
        }
        KeyCode::Esc => {
            if app.details_window {
                app.toggle_details_window();
            } else {
                app.dismiss_notice();
            }
            Vec::new()
        }
        _ => Vec::new(),
    };

    // g pending should clear on any other key
    state.pending_gg = false;
    dispatch(player, cmds);
    Ok(false)
}
