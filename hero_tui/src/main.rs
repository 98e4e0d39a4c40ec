//! hero_tui - Interactive arena for exercising hero classes, effects and cooldowns

mod app;
mod ui;

use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing_subscriber::filter::EnvFilter;

/// Initialize logging, writing to HERO_LOG_PATH if set and discarding otherwise.
///
/// The terminal belongs to the UI, so nothing goes to stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("HERO_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::sink)
        .init();
}

fn main() -> io::Result<()> {
    init_logging();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    tracing::info!(seed, "starting hero_tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(seed);
    let mut last_tick = Instant::now();

    // Main loop
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match (key.code, key.modifiers) {
                    (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                    (KeyCode::Tab, _) => app.next_tab(),
                    (KeyCode::BackTab, _) => app.prev_tab(),
                    (KeyCode::Char('1'), _) => app.set_tab(0),
                    (KeyCode::Char('2'), _) => app.set_tab(1),
                    (KeyCode::Char('3'), _) => app.set_tab(2),
                    (KeyCode::Char('4'), _) => app.set_tab(3),
                    (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
                    (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
                    (KeyCode::Char('a'), _) => app.attack(),
                    (KeyCode::Char('u'), _) => app.ultimate(),
                    (KeyCode::Char('c'), _) => app.cycle_class(),
                    (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => app.level_up(),
                    (KeyCode::Char('x'), _) => app.kill_selected(),
                    (KeyCode::Char('s'), _) => app.respawn_selected(),
                    (KeyCode::Char('t'), _) => app.tick_time(1.0),
                    (KeyCode::Char(' '), _) => app.toggle_pause(),
                    (KeyCode::Char('n'), _) => app.start_round(),
                    (KeyCode::Char('e'), _) => app.end_round(),
                    (KeyCode::Char('d'), _) => app.dump_snapshot(),
                    (KeyCode::Char('r'), _) => app.reset(),
                    (KeyCode::Char('?'), _) => app.toggle_help(),
                    _ => {}
                }
            }
        }

        // Real-time clock, only advances while unpaused
        let now = Instant::now();
        app.tick(now.duration_since(last_tick).as_secs_f64());
        last_tick = now;
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!("hero_tui exited");
    Ok(())
}
