//! jobsearch-tui: Terminal UI for the job search assistant
//!
//! This crate provides the TUI layer: a scrollable transcript, a query
//! input with history, and the event loop that drives one prediction
//! request at a time against the backend.

mod app;
mod event;
mod theme;
mod ui;
pub mod widgets;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use jobsearch_engine;

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};

use jobsearch_engine::{fetch_reply, Config, PredictClient, Reply};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(
    config: &Config,
    sessions_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, sessions_dir);
    let client = Arc::new(PredictClient::new(&config.endpoint));

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut events, &client).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: &Arc<PredictClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    // At most one request is in flight at a time
    let mut request_handle: Option<tokio::task::JoinHandle<Reply>> = None;

    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        // Check for a settled request (non-blocking)
        if request_handle
            .as_ref()
            .is_some_and(tokio::task::JoinHandle::is_finished)
        {
            if let Some(handle) = request_handle.take() {
                match handle.await {
                    Ok(reply) => app.apply_reply(reply),
                    Err(e) => {
                        tracing::warn!("request task failed: {e}");
                        app.apply_reply(Reply::Error(
                            jobsearch_engine::UNKNOWN_ERROR_FALLBACK.to_string(),
                        ));
                    }
                }
                app.save_session();
            }
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !handle_input_key(app, key, &mut request_handle, client) {
                        let action = event::key_to_action(key);
                        app.handle_action(action);
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                        MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            if let Some(handle) = request_handle.take() {
                handle.abort();
            }
            app.save_session();
            break;
        }
    }

    Ok(())
}

/// Handle key input for the query box.
/// Returns true if the key was handled (should not be processed as action).
fn handle_input_key(
    app: &mut App,
    key: crossterm::event::KeyEvent,
    request_handle: &mut Option<tokio::task::JoinHandle<Reply>>,
    client: &Arc<PredictClient>,
) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    // Let the action handler deal with Ctrl+C, Ctrl+E, etc.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        KeyCode::Esc | KeyCode::PageUp | KeyCode::PageDown => false,

        // Enter submits the query and starts the request
        KeyCode::Enter => {
            if let Some(query) = app.submit() {
                let client = Arc::clone(client);
                *request_handle = Some(tokio::spawn(async move {
                    fetch_reply(client.as_ref(), &query).await
                }));
            }
            true
        }

        KeyCode::Char(c) => {
            app.input.insert(c);
            app.sync_draft();
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            app.sync_draft();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            app.sync_draft();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::End => {
            app.input.move_end();
            true
        }
        KeyCode::Up => {
            app.input.history_prev();
            app.sync_draft();
            true
        }
        KeyCode::Down => {
            app.input.history_next();
            app.sync_draft();
            true
        }

        _ => false,
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

/// Key routing tests for the query box.
#[cfg(test)]
mod input_routing_tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn test_app() -> App {
        App::new(
            &Config::default(),
            std::env::temp_dir().join("jobsearch-routing-tests"),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        let client = Arc::new(PredictClient::new("http://localhost:5000"));
        let mut handle = None;
        handle_input_key(app, key(code), &mut handle, &client)
    }

    #[test]
    fn test_chars_go_to_input() {
        let mut app = test_app();
        assert!(press(&mut app, KeyCode::Char('h')));
        assert!(press(&mut app, KeyCode::Char('i')));
        assert_eq!(app.input.content(), "hi");
        assert_eq!(app.conversation.draft(), "hi");
    }

    #[test]
    fn test_backspace_edits_input() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input.content(), "h");
        assert_eq!(app.conversation.draft(), "h");
    }

    #[test]
    fn test_ctrl_keys_fall_through() {
        let mut app = test_app();
        let client = Arc::new(PredictClient::new("http://localhost:5000"));
        let mut handle = None;
        let evt = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_input_key(&mut app, evt, &mut handle, &client));
    }

    #[test]
    fn test_scroll_keys_fall_through() {
        let mut app = test_app();
        assert!(!press(&mut app, KeyCode::PageUp));
        assert!(!press(&mut app, KeyCode::PageDown));
        assert!(!press(&mut app, KeyCode::Esc));
    }

    #[tokio::test]
    async fn test_enter_on_blank_input_spawns_nothing() {
        let mut app = test_app();
        let client = Arc::new(PredictClient::new("http://localhost:5000"));
        let mut handle = None;
        press_enter(&mut app, &mut handle, &client);
        assert!(handle.is_none());
        assert!(!app.conversation.is_pending());
    }

    #[tokio::test]
    async fn test_enter_submits_and_spawns_request() {
        let mut app = test_app();
        let client = Arc::new(PredictClient::new("http://127.0.0.1:1"));
        let mut handle = None;

        press(&mut app, KeyCode::Char('x'));
        press_enter(&mut app, &mut handle, &client);

        assert!(app.conversation.is_pending());
        let reply = handle.take().unwrap().await.unwrap();
        // Nothing listens on port 1, so the reply is the connection error
        assert!(reply.is_error());
        assert_eq!(reply.text(), jobsearch_engine::CONNECT_FALLBACK);
    }

    fn press_enter(
        app: &mut App,
        handle: &mut Option<tokio::task::JoinHandle<Reply>>,
        client: &Arc<PredictClient>,
    ) {
        handle_input_key(app, key(KeyCode::Enter), handle, client);
    }
}
