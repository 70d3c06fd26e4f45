//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use askchat_core::ChatState;

use crate::event::{BackendCommand, UiEvent};
use crate::markdown::MarkdownView;
use crate::ui;

/// Main application with chat state and channel handles.
pub struct App {
    /// Headless chat state (history, input text, busy flag).
    state: ChatState,

    /// Char-indexed cursor into the input text.
    cursor: usize,

    /// Frame counter driving the loading spinner.
    tick: usize,

    /// Markdown renderer for bot answers.
    markdown: MarkdownView,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,

    should_quit: bool,
}

impl App {
    /// Create a new application instance with channel handles.
    pub fn new(ui_rx: mpsc::Receiver<UiEvent>, cmd_tx: mpsc::Sender<BackendCommand>) -> Self {
        Self {
            state: ChatState::new(),
            cursor: 0,
            tick: 0,
            markdown: MarkdownView::new(),
            ui_rx,
            cmd_tx,
            should_quit: false,
        }
    }

    /// Run the main event loop.
    ///
    /// This runs on the main thread and handles:
    /// - Drawing the UI
    /// - Processing keyboard input
    /// - Receiving resolved answers from the backend
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| {
                ui::render(frame, &self.state, self.cursor, self.tick, &self.markdown)
            })?;

            // Poll terminal events (non-blocking with short timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Process backend events (non-blocking)
            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }

            if self.state.busy {
                self.tick = self.tick.wrapping_add(1);
            }

            if self.should_quit {
                break;
            }
        }

        // Send quit command to backend
        let _ = self.cmd_tx.blocking_send(BackendCommand::Quit);

        Ok(())
    }

    /// Apply an event from the backend to the chat state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Resolved(outcome) => self.state.resolve(outcome),
        }
    }

    /// Handle a key press.
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }

            // Input is disabled while a question is in flight
            _ if self.state.busy => {}

            // Alt+Enter inserts a literal line break and never submits
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert_char('\n');
            }
            KeyCode::Enter => {
                if let Some(query) = self.state.submit() {
                    self.cursor = 0;
                    let _ = self.cmd_tx.blocking_send(BackendCommand::Ask(query));
                }
            }

            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c);
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_char_at_cursor();
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.state.input.chars().count() {
                    self.remove_char_at_cursor();
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                let len = self.state.input.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.state.input.chars().count();
            }

            _ => {}
        }
    }

    /// Insert a character at the cursor (char index into the input).
    fn insert_char(&mut self, c: char) {
        let byte_idx = self
            .state
            .input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.state.input.len());
        self.state.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Remove the character at the cursor position.
    fn remove_char_at_cursor(&mut self) {
        if let Some((byte_idx, _)) = self.state.input.char_indices().nth(self.cursor) {
            self.state.input.remove(byte_idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askchat_core::{AskOutcome, Role};

    fn app() -> (App, mpsc::Receiver<BackendCommand>, mpsc::Sender<UiEvent>) {
        let (ui_tx, ui_rx) = mpsc::channel(8);
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        (App::new(ui_rx, cmd_tx), cmd_rx, ui_tx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_submits_and_dispatches_question() {
        let (mut app, mut cmd_rx, _ui_tx) = app();
        type_text(&mut app, "What is machine learning?");

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state.messages.len(), 1);
        assert_eq!(app.state.messages[0].role, Role::User);
        assert!(app.state.busy);
        assert_eq!(app.cursor, 0);
        match cmd_rx.try_recv() {
            Ok(BackendCommand::Ask(query)) => assert_eq!(query, "What is machine learning?"),
            other => panic!("expected Ask command, got {:?}", other),
        }
    }

    #[test]
    fn test_alt_enter_inserts_newline_without_submitting() {
        let (mut app, mut cmd_rx, _ui_tx) = app();
        type_text(&mut app, "line one");

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));

        assert_eq!(app.state.input, "line one\n");
        assert!(app.state.messages.is_empty());
        assert!(!app.state.busy);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_enter_on_empty_input_sends_nothing() {
        let (mut app, mut cmd_rx, _ui_tx) = app();
        type_text(&mut app, "   ");

        press(&mut app, KeyCode::Enter);

        assert!(app.state.messages.is_empty());
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_input_is_disabled_while_busy() {
        let (mut app, mut cmd_rx, _ui_tx) = app();
        type_text(&mut app, "first");
        press(&mut app, KeyCode::Enter);
        let _ = cmd_rx.try_recv();

        type_text(&mut app, "second");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state.messages.len(), 1);
        assert!(app.state.input.is_empty());
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_quit_keys_still_work_while_busy() {
        let (mut app, _cmd_rx, _ui_tx) = app();
        type_text(&mut app, "q");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_resolved_event_appends_bot_message() {
        let (mut app, _cmd_rx, _ui_tx) = app();
        type_text(&mut app, "q");
        press(&mut app, KeyCode::Enter);

        app.apply_event(UiEvent::Resolved(AskOutcome::Answered(Some(
            "answer".to_string(),
        ))));

        assert_eq!(app.state.messages.len(), 2);
        assert_eq!(app.state.messages[1].role, Role::Bot);
        assert!(!app.state.busy);
    }

    #[test]
    fn test_cursor_editing_mid_input() {
        let (mut app, _cmd_rx, _ui_tx) = app();
        type_text(&mut app, "held");

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.state.input, "helld");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.state.input, "held");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.state.input, "eld");

        press(&mut app, KeyCode::End);
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_ctrl_char_is_not_inserted() {
        let (mut app, _cmd_rx, _ui_tx) = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert!(app.state.input.is_empty());
    }
}
