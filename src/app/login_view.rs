//! Login form
//!
//! Two fields and a submit. The view only collects credentials; the shell
//! owns the network call and the session transition, and pushes any
//! failure message back in for inline display.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::api::LoginRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum LoginAction {
    None,
    Submit(LoginRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Username,
    Password,
}

pub struct LoginView {
    username: Input,
    password: Input,
    focus: LoginField,
    error: Option<String>,
    submitting: bool,
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            username: Input::default(),
            password: Input::default(),
            focus: LoginField::Username,
            error: None,
            submitting: false,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.submitting = false;
    }

    pub fn reset(&mut self) {
        self.username.reset();
        self.password.reset();
        self.focus = LoginField::Username;
        self.error = None;
        self.submitting = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.submitting {
            return LoginAction::None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                // two fields, so any direction just swaps
                self.focus = match self.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                LoginAction::None
            }
            KeyCode::Esc => {
                self.error = None;
                LoginAction::None
            }
            KeyCode::Enter => {
                if self.focus == LoginField::Username && self.password.value().is_empty() {
                    self.focus = LoginField::Password;
                    return LoginAction::None;
                }
                self.submitting = true;
                LoginAction::Submit(LoginRequest {
                    username: self.username.value().to_string(),
                    password: self.password.value().to_string(),
                })
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                LoginAction::None
            }
            _ => {
                let event = crossterm::event::Event::Key(key);
                match self.focus {
                    LoginField::Username => self.username.handle_event(&event),
                    LoginField::Password => self.password.handle_event(&event),
                };
                LoginAction::None
            }
        }
    }

    /// Submission finished (either way); re-enable input
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let form = centered_rect(area, 40, 11);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(form);

        let field = |title: &str, value: String, focused: bool| {
            let style = if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Paragraph::new(value).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(style),
            )
        };

        f.render_widget(
            field(
                "Username",
                self.username.value().to_string(),
                self.focus == LoginField::Username,
            ),
            chunks[0],
        );

        let masked = "•".repeat(self.password.value().chars().count());
        f.render_widget(
            field("Password", masked, self.focus == LoginField::Password),
            chunks[1],
        );

        let hint = if self.submitting {
            Line::styled("Signing in...", Style::default().fg(Color::DarkGray))
        } else {
            Line::styled(
                "Enter to sign in, Tab to switch fields",
                Style::default().fg(Color::DarkGray),
            )
        };
        f.render_widget(Paragraph::new(hint).centered(), chunks[2]);

        if let Some(error) = &self.error {
            let line = Line::styled(
                error.clone(),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_widget(Paragraph::new(line).centered(), chunks[3]);
        }

        let (input, chunk) = match self.focus {
            LoginField::Username => (&self.username, chunks[0]),
            LoginField::Password => (&self.password, chunks[1]),
        };
        f.set_cursor_position((chunk.x + input.cursor() as u16 + 1, chunk.y + 1));
    }
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
