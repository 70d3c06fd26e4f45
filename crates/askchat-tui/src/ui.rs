//! Layout and widget rendering.

use askchat_core::{ChatState, Message, Role};
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::markdown::RenderMarkdown;

/// Spinner frames for the loading indicator.
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Example prompts shown on the welcome panel.
const EXAMPLE_PROMPTS: &[&str] = &[
    "What is machine learning?",
    "Explain quantum physics",
    "How does DNA work?",
];

/// Render the entire UI. Pure function of its inputs: the same state
/// always produces the same frame.
pub fn render(
    frame: &mut Frame,
    state: &ChatState,
    cursor: usize,
    tick: usize,
    markdown: &dyn RenderMarkdown,
) {
    let input_rows = state.input.split('\n').count().clamp(1, 5) as u16;
    let [header_area, history_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(input_rows + 2),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header_area);
    render_history(frame, history_area, state, tick, markdown);
    render_input(frame, input_area, state, cursor);
    render_footer(frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        "Scientific Search",
        Style::default().fg(Color::DarkGray),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" AskChat ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(header, area);
}

fn render_history(
    frame: &mut Frame,
    area: Rect,
    state: &ChatState,
    tick: usize,
    markdown: &dyn RenderMarkdown,
) {
    let block = Block::default().borders(Borders::ALL).title(" Conversation ");
    let inner = block.inner(area);
    let width = inner.width.max(1) as usize;

    let lines = if state.messages.is_empty() && !state.busy {
        welcome_lines()
    } else {
        history_lines(state, width, tick, markdown)
    };

    // Stick to the bottom so the latest message stays visible
    let scroll = (lines.len() as u16).saturating_sub(inner.height);
    let history = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(history, area);
}

/// Welcome panel shown while the history is empty.
fn welcome_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome!",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Ask any scientific question and I'll help you find an answer."),
        Line::from(""),
        Line::from(Span::styled(
            "  Example questions:",
            Style::default().fg(Color::Yellow),
        )),
    ];
    for prompt in EXAMPLE_PROMPTS {
        lines.push(Line::from(format!("  - {}", prompt)));
    }
    lines
}

/// One block per message in insertion order, plus the loading indicator
/// while a question is in flight.
fn history_lines(
    state: &ChatState,
    width: usize,
    tick: usize,
    markdown: &dyn RenderMarkdown,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in &state.messages {
        lines.push(message_header(message));
        match message.role {
            Role::User => lines.extend(wrap_plain(&message.content, width)),
            Role::Bot => lines.extend(markdown.render(&message.content, width)),
        }
        lines.push(Line::from(""));
    }

    if state.busy {
        let spinner = SPINNER[(tick / 2) % SPINNER.len()];
        lines.push(Line::from(vec![
            Span::styled(
                "Bot",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled(spinner.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(
                " Generating response...",
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines
}

/// Role marker plus HH:MM timestamp.
fn message_header(message: &Message) -> Line<'static> {
    let (label, style) = match message.role {
        Role::User => (
            "You",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Role::Bot => (
            "Bot",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    };
    Line::from(vec![
        Span::styled(label, style),
        Span::styled(
            format!("  {}", message.timestamp.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Word-wrap plain text, preserving embedded newlines.
fn wrap_plain(text: &str, width: usize) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let used = current.chars().count();
            if used > 0 && used + 1 + word.chars().count() > width {
                out.push(Line::from(std::mem::take(&mut current)));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(Line::from(current));
    }
    out
}

fn render_input(frame: &mut Frame, area: Rect, state: &ChatState, cursor: usize) {
    let (title, style) = if state.busy {
        (
            " Question (waiting for response) ",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (" Question ", Style::default())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(style);
    let inner = block.inner(area);

    let text: Vec<Line> = if state.input.is_empty() {
        vec![Line::from(Span::styled(
            "Enter your question...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .input
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect()
    };

    frame.render_widget(Paragraph::new(text).style(style).block(block), area);

    if !state.busy && inner.width > 0 && inner.height > 0 {
        let (row, col) = cursor_position(&state.input, cursor);
        let x = inner.x + (col as u16).min(inner.width - 1);
        let y = inner.y + (row as u16).min(inner.height - 1);
        frame.set_cursor_position(Position::new(x, y));
    }
}

/// (row, column) of a char-indexed cursor within multi-line input.
fn cursor_position(input: &str, cursor: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for c in input.chars().take(cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (row, col)
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Line::from(Span::styled(
        " Enter: send | Alt+Enter: new line | Esc: quit ",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(footer), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use askchat_core::AskOutcome;
    use crate::markdown::MarkdownView;

    #[test]
    fn test_welcome_panel_lists_example_prompts() {
        let lines = welcome_lines();
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.as_ref())
            .collect();
        for prompt in EXAMPLE_PROMPTS {
            assert!(text.contains(prompt));
        }
    }

    #[test]
    fn test_history_lines_are_a_pure_function_of_state() {
        let renderer = MarkdownView::new();
        let mut state = ChatState::new();
        state.input = "What is machine learning?".to_string();
        state.submit();
        state.resolve(AskOutcome::Answered(Some("**ML** is...".to_string())));

        let first = history_lines(&state, 60, 0, &renderer);
        let second = history_lines(&state, 60, 0, &renderer);
        assert_eq!(first, second);
    }

    #[test]
    fn test_history_shows_messages_in_insertion_order() {
        let renderer = MarkdownView::new();
        let mut state = ChatState::new();
        state.input = "question".to_string();
        state.submit();
        state.resolve(AskOutcome::Answered(Some("answer".to_string())));

        let lines = history_lines(&state, 60, 0, &renderer);
        let texts: Vec<String> = lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect();
        let question = texts.iter().position(|t| t.contains("question")).unwrap();
        let answer = texts.iter().position(|t| t.contains("answer")).unwrap();
        assert!(question < answer);
    }

    #[test]
    fn test_busy_state_appends_loading_indicator() {
        let renderer = MarkdownView::new();
        let mut state = ChatState::new();
        state.input = "q".to_string();
        state.submit();

        let lines = history_lines(&state, 60, 0, &renderer);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("Generating response..."));
    }

    #[test]
    fn test_wrap_plain_preserves_newlines() {
        let lines = wrap_plain("first\nsecond", 60);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_cursor_position_tracks_rows_and_columns() {
        assert_eq!(cursor_position("hello", 3), (0, 3));
        assert_eq!(cursor_position("ab\ncd", 3), (1, 0));
        assert_eq!(cursor_position("ab\ncd", 5), (1, 2));
        assert_eq!(cursor_position("", 0), (0, 0));
    }
}
