//! Application state for the jobsearch TUI.

use std::path::PathBuf;

use jobsearch_engine::{Config, Conversation, Reply, Session, Submission, SubmitError};

use crate::event::Action;
use crate::theme::Symbols;
use crate::widgets::QueryInputState;

/// Ticks a notification stays on screen (at 250ms per tick).
const NOTIFICATION_TTL: usize = 12;

/// Main application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Conversation state machine.
    pub conversation: Conversation,
    /// Session backing the transcript on disk.
    pub session: Session,
    /// Query input state.
    pub input: QueryInputState,
    /// Transcript scroll offset from the bottom (0 = follow latest).
    pub transcript_scroll: usize,
    /// Tick counter for animations.
    tick: usize,
    /// Temporary notification message shown in the status line.
    pub notification: Option<String>,
    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,
    /// Backend endpoint, shown in the status line.
    pub endpoint: String,
    /// Directory session files are written to.
    sessions_dir: PathBuf,
}

impl App {
    /// Create a new application from loaded configuration.
    pub fn new(config: &Config, sessions_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            conversation: Conversation::new(),
            session: Session::new(),
            input: QueryInputState::new(),
            transcript_scroll: 0,
            tick: 0,
            notification: None,
            notification_ttl: 0,
            endpoint: config.endpoint.clone(),
            sessions_dir,
        }
    }

    /// Handle a non-editing action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Export => self.export_transcript(),
            Action::ScrollUp => {
                self.transcript_scroll = self.transcript_scroll.saturating_add(1);
            }
            Action::ScrollDown => {
                self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
            }
            Action::None => {}
        }
    }

    /// Mirror the input box content into the conversation draft.
    pub fn sync_draft(&mut self) {
        let content = self.input.content().to_string();
        self.conversation.update_draft(content);
    }

    /// Try to submit the current input.
    ///
    /// Returns the accepted query text if a request should be started.
    pub fn submit(&mut self) -> Option<String> {
        self.sync_draft();
        let raw = self.input.content().to_string();
        match self.conversation.submit(&raw) {
            Ok(Submission::Accepted { query }) => {
                // Record in input history and clear the box
                self.input.submit();
                self.transcript_scroll = 0;
                Some(query)
            }
            Ok(Submission::Ignored) => {
                self.input.clear();
                None
            }
            Err(SubmitError::RequestPending) => {
                self.set_notification("Still waiting for a reply".to_string());
                None
            }
        }
    }

    /// Apply a settled reply to the conversation.
    pub fn apply_reply(&mut self, reply: Reply) {
        self.conversation.settle(reply);
        self.transcript_scroll = 0;
    }

    /// Advance the tick counter.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        // Clear notification after TTL expires
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Current spinner frame for the pending indicator.
    pub fn spinner(&self) -> &'static str {
        Symbols::SPINNER[self.tick % Symbols::SPINNER.len()]
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TTL;
    }

    /// Persist the session transcript to the sessions directory.
    pub fn save_session(&mut self) {
        if self.conversation.messages().is_empty() {
            return;
        }
        self.session.sync_messages(self.conversation.messages());
        if let Err(e) = self.session.save(&self.sessions_dir) {
            tracing::warn!("failed to save session: {e}");
        }
    }

    /// Export the transcript as markdown next to the session files.
    pub fn export_transcript(&mut self) {
        self.session.sync_messages(self.conversation.messages());
        let path = self.sessions_dir.join("transcript-export.md");
        let markdown = self.session.to_markdown();
        if let Err(e) = std::fs::create_dir_all(&self.sessions_dir)
            .and_then(|()| std::fs::write(&path, markdown))
        {
            self.set_notification(format!("Export failed: {e}"));
        } else {
            self.set_notification(format!("Exported to {}", path.display()));
        }
    }
}
