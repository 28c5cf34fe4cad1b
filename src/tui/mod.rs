pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;

use crate::dashboard::{load_snapshot, DashboardSnapshot};
use crate::predictor::RemotePredictor;

/// Longest a background assessment may run before the dashboard renders the
/// fallback score instead
pub const LOAD_DEADLINE: Duration = Duration::from_secs(20);

fn spawn_load(app: &App, predictor: &Option<Arc<dyn RemotePredictor>>) -> JoinHandle<DashboardSnapshot> {
    let config = app.config.clone();
    let reading = app.reading;
    let predictor = predictor.clone();

    tokio::spawn(async move {
        load_snapshot(&config, reading, predictor.as_deref(), Some(LOAD_DEADLINE)).await
    })
}

pub async fn run_tui(mut app: App, predictor: Option<Arc<dyn RemotePredictor>>) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let refresh_secs = app.config.auto_refresh_interval;
    let mut events = EventHandler::new(250, refresh_secs); // 250ms tick, N-second refresh

    // First assessment runs in the background so the frame appears at once
    let mut pending_load: Option<JoinHandle<DashboardSnapshot>> = Some(spawn_load(&app, &predictor));
    app.is_loading = true;

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => {
                app.last_interaction = std::time::Instant::now();
                handle_key_event(&mut app, key);
            }
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
            Event::Refresh => {
                app.needs_refresh = true;
            }
            Event::Resize => {}
        }

        // Pick up a finished background load
        if let Some(handle) = pending_load.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(snapshot) => app.update_snapshot(snapshot),
                Err(e) => app.show_flash(format!("Refresh failed: {}", e)),
            }
            app.is_loading = false;
        }

        if app.needs_refresh && pending_load.is_none() {
            let is_manual = app.force_refresh;
            let modal_open = app.input_mode != app::InputMode::Normal;
            let recent_interaction = app.last_interaction.elapsed() < Duration::from_secs(10);

            // Auto-refresh waits for the user to settle; 'r' always proceeds.
            // needs_refresh stays set so a suppressed refresh retries next tick.
            if is_manual || (!modal_open && !recent_interaction) {
                app.needs_refresh = false;
                app.force_refresh = false;
                pending_load = Some(spawn_load(&app, &predictor));
                app.is_loading = true;
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    if let Some(handle) = pending_load {
        handle.abort();
    }

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            KeyCode::Tab => app.toggle_view(),

            KeyCode::Char('j') | KeyCode::Down => app.next_zone(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_zone(),

            KeyCode::Char('r') => {
                app.needs_refresh = true;
                app.force_refresh = true;
                app.show_flash("Re-assessing...".to_string());
            }

            KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('b') => app.show_breakdown(),

            _ => {}
        },
        app::InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.dismiss_breakdown(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
