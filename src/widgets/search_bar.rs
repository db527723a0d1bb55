//! Plain search bar: an input with a magnifier marker and a clear
//! affordance that only appears once there is something to clear.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchBarAction {
    None,
    Changed(String),
    Cleared,
    /// User left the input (Esc or Enter)
    Done(String),
}

pub struct SearchBar {
    input: Input,
    placeholder: String,
    use_glyphs: bool,
}

impl SearchBar {
    pub fn new(placeholder: impl Into<String>, use_glyphs: bool) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
            use_glyphs,
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchBarAction {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                SearchBarAction::Done(self.input.value().to_string())
            }
            KeyCode::Char('u')
                if key
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::CONTROL) =>
            {
                self.input.reset();
                SearchBarAction::Cleared
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&crossterm::event::Event::Key(key));
                let after = self.input.value().to_string();
                if before != after {
                    SearchBarAction::Changed(after)
                } else {
                    SearchBarAction::None
                }
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let icon = if self.use_glyphs { "🔍 " } else { "? " };

        let mut spans = vec![Span::raw(icon)];
        if self.input.value().is_empty() {
            spans.push(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::raw(self.input.value().to_string()));
            spans.push(Span::raw(" "));
            spans.push(Span::styled("×", Style::default().fg(Color::Red)));
        }

        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let widget = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(widget, area);

        if focused {
            let offset = icon.chars().count() as u16;
            f.set_cursor_position((
                area.x + offset + self.input.cursor() as u16 + 1,
                area.y + 1,
            ));
        }
    }
}
