//! Screen layout and rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::theme::Styles;
use crate::widgets::TranscriptPane;

/// Fixed height for the input area (content plus borders).
const INPUT_HEIGHT: u16 = 3;

/// Render the full screen.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_transcript(app, frame, chunks[1]);
    render_input(app, frame, chunks[2]);
    render_status(app, frame, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Job Search Assistant ", Styles::active()),
        Span::styled("ask about roles, skills, and openings", Styles::dim()),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_transcript(app: &App, frame: &mut Frame, area: Rect) {
    let pane = TranscriptPane::new(app.conversation.messages())
        .offset_from_bottom(app.transcript_scroll)
        .pending(app.conversation.is_pending(), app.spinner());
    frame.render_widget(pane, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let pending = app.conversation.is_pending();
    let border = if pending {
        Styles::border()
    } else {
        Styles::border_active()
    };

    let block = Block::default().borders(Borders::ALL).border_style(border);

    let input = app
        .input
        .widget()
        .block(block)
        .focused(!pending)
        .placeholder("Type your question and press Enter");
    frame.render_widget(input, area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let line = if let Some(notification) = &app.notification {
        Line::from(Span::styled(format!(" {notification}"), Styles::active()))
    } else {
        let state = if app.conversation.is_pending() {
            Span::styled("waiting", Styles::agent())
        } else {
            Span::styled("ready", Styles::dim())
        };
        Line::from(vec![
            Span::styled(format!(" {} ", app.endpoint), Styles::dim()),
            state,
            Span::styled(
                "  Enter send | PgUp/PgDn scroll | Ctrl+E export | Esc quit",
                Styles::dim(),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
