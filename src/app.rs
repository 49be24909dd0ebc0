use crate::types::TextSource;

use scramble_text::{EngineState, ScrambleEngine, ScrambleText};

use ratatui::{
    crossterm::event::{self, KeyCode},
    prelude::*,
    widgets::*,
};
use std::time::Duration;
use tui_input::{Input, InputRequest};

pub struct App {
    source: TextSource,
    label: usize,
    text: String,
    active: bool,
    engine: ScrambleEngine,
    input: Input,
}

impl App {
    pub fn new(source: TextSource, engine: ScrambleEngine, active: bool) -> Self {
        let text = match &source {
            TextSource::Fixed(text) => text.clone(),
            TextSource::Labels(labels) => labels.first().cloned().unwrap_or_default(),
        };

        let mut app = Self {
            source,
            label: 0,
            input: Input::new(text.clone()),
            text,
            active,
            engine,
        };
        app.sync();

        app
    }

    pub fn tick(&mut self, delta: Duration) {
        self.engine.advance(delta);
    }

    pub fn next_label(&mut self) {
        if let TextSource::Labels(labels) = &self.source
            && !labels.is_empty()
        {
            self.label = (self.label + 1) % labels.len();
            self.text = labels[self.label].clone();
            self.input = Input::new(self.text.clone());
            self.sync();
        }
    }

    pub fn handle_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.active = !self.active;
                self.sync();
            }
            KeyCode::Enter => {
                self.text = self.input.value().to_string();
                self.sync();
            }
            KeyCode::F(5) => {
                self.next_label();
            }
            KeyCode::Char(c) => {
                self.input.handle(InputRequest::InsertChar(c));
            }
            KeyCode::Backspace => {
                self.input.handle(InputRequest::DeletePrevChar);
            }
            KeyCode::Left => {
                self.input.handle(InputRequest::GoToPrevChar);
            }
            KeyCode::Right => {
                self.input.handle(InputRequest::GoToNextChar);
            }
            _ => {}
        }
    }

    /// Pushes the current text and activation flag into the engine.
    fn sync(&mut self) {
        self.engine.render(&self.text, self.active);
    }

    pub fn teardown(&mut self) {
        self.engine.teardown();
    }

    pub fn display(&self) -> String {
        self.engine.display_string()
    }

    pub fn status(&self) -> String {
        let state = match self.engine.state() {
            EngineState::Idle => "Idle",
            EngineState::Scrambling => "Scrambling",
        };

        format!(
            "{} | Timers: {} | Cycle: {} | Time: {:.1}s",
            state,
            self.engine.pending_timers(),
            self.engine.generation(),
            self.engine.elapsed().as_secs_f64()
        )
    }

    pub fn draw_ui(&self, f: &mut Frame) {
        let area = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(3), // Title
                    Constraint::Length(3), // Scrambled label
                    Constraint::Length(3), // Input
                    Constraint::Length(3), // Status
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        let title = Paragraph::new("Scramble Text").alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let style = if self.active {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let label = ScrambleText::new(self.engine.display())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().title("Label").borders(Borders::ALL));
        f.render_widget(label, chunks[1]);

        let input_block = Block::default()
            .title("Text (Enter to apply)")
            .borders(Borders::ALL);
        let input_inner = input_block.inner(chunks[2]);
        let width = input_inner.width.max(1) as usize;
        let scroll = self.input.visual_scroll(width);

        let input_paragraph = Paragraph::new(self.input.value())
            .scroll((0, scroll as u16))
            .block(input_block);
        f.render_widget(input_paragraph, chunks[2]);

        let cursor_x = self.input.visual_cursor().saturating_sub(scroll) as u16;
        f.set_cursor_position((input_inner.x + cursor_x, input_inner.y));

        let hint = "Tab: toggle | F5: next label | Esc: quit";
        let status_block = Block::default().title("Status").borders(Borders::ALL);
        let status_paragraph =
            Paragraph::new(format!("{} | {}", self.status(), hint)).block(status_block);
        f.render_widget(status_paragraph, chunks[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};
    use scramble_text::ScrambleConfig;

    fn app(source: TextSource) -> App {
        let engine = ScrambleEngine::seeded(ScrambleConfig::default(), 11).unwrap();
        App::new(source, engine, true)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn tab_settles_the_label() {
        let mut app = app(TextSource::Fixed("SIGNAL".into()));
        app.tick(Duration::from_secs(1));
        assert!(app.status().starts_with("Scrambling | Timers: 6"));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.display(), "SIGNAL");
        assert!(app.status().starts_with("Idle | Timers: 0"));

        app.tick(Duration::from_secs(1));
        assert_eq!(app.display(), "SIGNAL");
    }

    #[test]
    fn enter_applies_edited_text() {
        let mut app = app(TextSource::Fixed("AB".into()));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('Z'));
        press(&mut app, KeyCode::Char('Q'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.display().chars().count(), 3);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.display(), "AZQ");
    }

    #[test]
    fn f5_cycles_labels() {
        let labels = vec!["ONE".to_string(), "TWO".to_string()];
        let mut app = app(TextSource::Labels(labels));
        app.teardown();
        assert_eq!(app.display(), "ONE");

        press(&mut app, KeyCode::F(5));
        assert_eq!(app.display(), "TWO");
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.display(), "ONE");
    }
}
