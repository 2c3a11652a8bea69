//! Scrollable transcript pane.
//!
//! Renders the conversation history with role labels, wrapping each
//! message to the pane width. Scrolling is tracked as an offset from the
//! bottom so the pane follows new messages by default.

use jobsearch_engine::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Styles;

/// Scrollable pane showing the conversation transcript.
pub struct TranscriptPane<'a> {
    messages: &'a [Message],
    /// Lines scrolled up from the bottom (0 = follow latest).
    offset_from_bottom: usize,
    /// Whether a request is in flight.
    pending: bool,
    /// Current spinner frame, shown while pending.
    spinner: &'a str,
}

impl<'a> TranscriptPane<'a> {
    /// Create a new transcript pane.
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            offset_from_bottom: 0,
            pending: false,
            spinner: "",
        }
    }

    /// Set the scroll offset from the bottom.
    #[must_use]
    pub fn offset_from_bottom(mut self, offset: usize) -> Self {
        self.offset_from_bottom = offset;
        self
    }

    /// Set the pending indicator with the current spinner frame.
    #[must_use]
    pub fn pending(mut self, pending: bool, spinner: &'a str) -> Self {
        self.pending = pending;
        self.spinner = spinner;
        self
    }

    /// Label line for a message: styled role name plus local send time.
    fn role_label(message: &Message) -> Line<'static> {
        let (label, style) = match message.role {
            Role::User => ("You", Styles::user()),
            Role::Agent => ("Assistant", Styles::agent()),
            Role::Error => ("Error", Styles::error()),
        };
        let time = message
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M");
        Line::from(vec![
            Span::styled(label, style),
            Span::styled(format!("  {time}"), Styles::dim()),
        ])
    }

    /// Build the full set of display lines for the transcript.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let wrap_width = width.max(8);
        let mut lines = Vec::new();

        for message in self.messages {
            lines.push(Self::role_label(message));
            for wrapped in textwrap::wrap(&message.text, wrap_width) {
                lines.push(Line::from(wrapped.into_owned()));
            }
            lines.push(Line::default());
        }

        if self.pending {
            lines.push(Line::from(Span::styled("Assistant", Styles::agent())));
            lines.push(Line::from(Span::styled(
                format!("Thinking... {}", self.spinner),
                Styles::dim(),
            )));
        }

        lines
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for TranscriptPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let lines = self.build_lines(area.width as usize);
        let height = area.height as usize;

        // Scroll so the pane shows the bottom of the transcript, minus the
        // requested offset, clamped to the top.
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = max_scroll.saturating_sub(self.offset_from_bottom.min(max_scroll));

        Paragraph::new(lines)
            .style(Styles::default())
            .scroll((scroll as u16, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn buffer_content(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_transcript_renders_role_labels() {
        let messages = vec![
            Message::user("je cherche un travail"),
            Message::agent("Here are some openings."),
        ];

        let mut terminal = create_test_terminal(40, 12);
        terminal
            .draw(|frame| {
                let pane = TranscriptPane::new(&messages);
                frame.render_widget(pane, frame.area());
            })
            .unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("You"));
        assert!(content.contains("Assistant"));
        assert!(content.contains("je cherche un travail"));
    }

    #[test]
    fn test_transcript_renders_error_label() {
        let messages = vec![
            Message::user("hello"),
            Message::error("Failed to connect to the backend server."),
        ];

        let mut terminal = create_test_terminal(50, 12);
        terminal
            .draw(|frame| {
                let pane = TranscriptPane::new(&messages);
                frame.render_widget(pane, frame.area());
            })
            .unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("Error"));
        assert!(content.contains("Failed to connect"));
    }

    #[test]
    fn test_transcript_shows_pending_indicator() {
        let messages = vec![Message::user("hello")];

        let mut terminal = create_test_terminal(40, 12);
        terminal
            .draw(|frame| {
                let pane = TranscriptPane::new(&messages).pending(true, "/");
                frame.render_widget(pane, frame.area());
            })
            .unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("Thinking..."));
    }

    #[test]
    fn test_transcript_follows_bottom_by_default() {
        let messages: Vec<Message> = (0..20)
            .map(|i| Message::user(format!("message number {i}")))
            .collect();

        let mut terminal = create_test_terminal(40, 6);
        terminal
            .draw(|frame| {
                let pane = TranscriptPane::new(&messages);
                frame.render_widget(pane, frame.area());
            })
            .unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("message number 19"));
        assert!(!content.contains("message number 0 "));
    }

    #[test]
    fn test_transcript_scroll_offset_clamps() {
        let messages = vec![Message::user("only one")];

        // Offset far beyond the content must not panic or hide everything
        let mut terminal = create_test_terminal(40, 6);
        terminal
            .draw(|frame| {
                let pane = TranscriptPane::new(&messages).offset_from_bottom(1000);
                frame.render_widget(pane, frame.area());
            })
            .unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("only one"));
    }

    #[test]
    fn test_transcript_minimum_size() {
        let messages = vec![Message::user("hello")];

        // Very small terminal - should not panic
        let mut terminal = create_test_terminal(10, 2);
        terminal
            .draw(|frame| {
                let pane = TranscriptPane::new(&messages);
                frame.render_widget(pane, frame.area());
            })
            .unwrap();
    }
}
