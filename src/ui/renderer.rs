use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;
use unicode_width::UnicodeWidthStr;

use crate::core::controller::{Phase, SessionSnapshot};
use crate::core::message::Role;

const TITLE: &str = "Ollama Chat";
const HINTS: &str = "Enter send · Tab/Shift-Tab model · Ctrl+R reload models · Esc quit";

/// Draw one frame. Reads the snapshot only; never touches controller state.
pub fn ui(f: &mut Frame, snapshot: &SessionSnapshot, input: &TextArea) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    f.render_widget(Paragraph::new(header_line(snapshot)), chunks[0]);
    render_transcript(f, snapshot, chunks[1]);
    f.render_widget(Paragraph::new(status_line(snapshot)), chunks[2]);
    f.render_widget(input, chunks[3]);
}

fn render_transcript(f: &mut Frame, snapshot: &SessionSnapshot, area: Rect) {
    let lines = build_transcript_lines(snapshot);
    let total = wrapped_height(&lines, area.width);
    let scroll = total.saturating_sub(area.height);

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, area);
}

pub fn header_line(snapshot: &SessionSnapshot) -> Line<'static> {
    let title = Span::styled(
        format!(" {TITLE} "),
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    );

    let model = match (snapshot.selected_model.as_deref(), snapshot.selected_index()) {
        (Some(id), Some(index)) => format!("Model: {id} ({}/{})", index + 1, snapshot.models.len()),
        (Some(id), None) => format!("Model: {id}"),
        (None, _) if snapshot.phase == Phase::AwaitingModels => "Loading models...".to_string(),
        (None, _) => "No models available".to_string(),
    };
    let model_style = if snapshot.is_pending() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    Line::from(vec![title, Span::raw(" "), Span::styled(model, model_style)])
}

/// Transcript lines for the visible messages, or the welcome text.
pub fn build_transcript_lines(snapshot: &SessionSnapshot) -> Vec<Line<'static>> {
    if snapshot.messages.is_empty() {
        return vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to Ollama Chat!",
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                "Send a message to start the conversation.",
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        ];
    }

    let mut lines = Vec::new();
    for message in &snapshot.messages {
        let (prefix, prefix_style, text_style) = match message.role {
            Role::User => (
                "You: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan),
            ),
            Role::Assistant => ("", Style::default(), Style::default()),
            // Never present in a snapshot; kept for exhaustiveness.
            Role::System => continue,
        };

        for (index, text) in message.content.lines().enumerate() {
            let mut spans = Vec::with_capacity(2);
            if index == 0 && !prefix.is_empty() {
                spans.push(Span::styled(prefix, prefix_style));
            }
            spans.push(Span::styled(text.to_string(), text_style));
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Error banner, loading indicator, last usage, or key hints, in that order.
pub fn status_line(snapshot: &SessionSnapshot) -> Line<'static> {
    if let Some(error) = &snapshot.last_error {
        return Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(error.clone(), Style::default().fg(Color::Red)),
        ]);
    }
    if snapshot.is_pending() {
        return Line::from(Span::styled(
            "Thinking...",
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    if let Some(usage) = snapshot.last_usage {
        return Line::from(Span::styled(
            format!(
                "tokens: {} prompt · {} completion · {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray)))
}

/// Rows `lines` occupy once wrapped at `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = width as usize;
    let rows: usize = lines
        .iter()
        .map(|line| {
            let line_width: usize = line
                .spans
                .iter()
                .map(|span| span.content.as_ref().width())
                .sum();
            line_width.div_ceil(width).max(1)
        })
        .sum();
    rows.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ModelInfo, Usage};
    use crate::core::message::Message;
    use ratatui::{backend::TestBackend, Terminal};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            messages: Vec::new(),
            models: vec![ModelInfo::new("llama3"), ModelInfo::new("mistral")],
            selected_model: Some("mistral".to_string()),
            phase: Phase::Idle,
            last_error: None,
            last_usage: None,
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn empty_conversation_shows_welcome() {
        let lines = build_transcript_lines(&snapshot());
        let text: Vec<_> = lines.iter().map(line_text).collect();
        assert!(text.contains(&"Welcome to Ollama Chat!".to_string()));
    }

    #[test]
    fn messages_render_in_insertion_order_with_user_prefix() {
        let mut snap = snapshot();
        snap.messages = vec![
            Message::user("hi"),
            Message::assistant("hello\nhow can I help?"),
            Message::user("hi"),
        ];
        let text: Vec<_> = build_transcript_lines(&snap).iter().map(line_text).collect();
        assert_eq!(
            text,
            vec![
                "You: hi",
                "",
                "hello",
                "how can I help?",
                "",
                "You: hi",
                "",
            ]
        );
    }

    #[test]
    fn header_shows_selected_model_position() {
        assert_eq!(
            line_text(&header_line(&snapshot())),
            " Ollama Chat  Model: mistral (2/2)"
        );

        let mut none = snapshot();
        none.models.clear();
        none.selected_model = None;
        assert!(line_text(&header_line(&none)).ends_with("No models available"));

        none.phase = Phase::AwaitingModels;
        assert!(line_text(&header_line(&none)).ends_with("Loading models..."));
    }

    #[test]
    fn status_prefers_error_over_thinking() {
        let mut snap = snapshot();
        snap.phase = Phase::Sending;
        assert_eq!(line_text(&status_line(&snap)), "Thinking...");

        snap.last_error = Some("boom".to_string());
        assert_eq!(line_text(&status_line(&snap)), "Error: boom");

        snap.last_error = None;
        snap.phase = Phase::Idle;
        snap.last_usage = Some(Usage {
            prompt_tokens: 5,
            completion_tokens: 2,
            total_tokens: 7,
        });
        assert_eq!(
            line_text(&status_line(&snap)),
            "tokens: 5 prompt · 2 completion · 7 total"
        );
    }

    #[test]
    fn wrapped_height_counts_wrapped_rows() {
        let lines = vec![Line::from("abcdefghij"), Line::from("")];
        assert_eq!(wrapped_height(&lines, 4), 3 + 1);
        assert_eq!(wrapped_height(&lines, 0), 0);
    }

    #[test]
    fn frame_shows_thinking_indicator_while_sending() {
        let mut snap = snapshot();
        snap.phase = Phase::Sending;
        snap.messages = vec![Message::user("hi")];

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let input = TextArea::default();
        terminal.draw(|f| ui(f, &snap, &input)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Thinking..."));
        assert!(rendered.contains("You: hi"));
    }
}
