use std::env;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::playback::{Player, PlayerCmd};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let _log_guard = logging::init(&settings.logging);

    let storage = startup::open_storage(&settings);
    let folder = startup::initial_folder(env::args().skip(1));

    let mut player = Player::new(Duration::from_millis(settings.playback.tick_ms));
    let mut app = App::new(settings, storage);
    event_loop::dispatch(&player, vec![PlayerCmd::SetRate(app.rate())]);

    if let Some(folder) = folder {
        let cmds = app.restore_folder(folder, Instant::now());
        event_loop::dispatch(&player, cmds);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &mut app, &player, &mut state);

    app.shutdown(Instant::now());
    player.quit();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
