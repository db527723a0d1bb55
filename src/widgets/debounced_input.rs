//! Debounced text input
//!
//! Wraps a text input so expensive consumers (filtering a large row set on
//! every keystroke) only see the value once it has settled. Every keystroke
//! reschedules the single pending timer; when the window elapses the final
//! value is delivered exactly once.

use crate::utils::debouncer::Debouncer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of handling a key in the debounced input
#[derive(Debug, Clone, PartialEq)]
pub enum DebouncedInputAction {
    /// Nothing to do yet
    Continue,
    /// Buffer changed; the settled value will arrive via `check_debounce`
    InputChanged(String),
    /// User pressed Enter to confirm immediately
    Confirm(String),
    /// User pressed Esc to leave the input
    Cancel,
    /// Key is not for this widget
    PassThrough,
}

#[derive(Debug, Clone)]
pub struct DebouncedInputConfig {
    /// Quiet window in milliseconds
    pub debounce_ms: u64,
    pub title: String,
    pub placeholder: String,
    pub style: Style,
    /// Show a "typing..." marker while a fire is pending
    pub show_debounce_indicator: bool,
}

impl Default for DebouncedInputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            title: "Search".to_string(),
            placeholder: String::new(),
            style: Style::default().fg(Color::Yellow),
            show_debounce_indicator: true,
        }
    }
}

pub struct DebouncedInput {
    input: Input,
    debouncer: Debouncer,
    /// Last value that was delivered to the owner
    last_settled: Option<String>,
    config: DebouncedInputConfig,
    active: bool,
}

impl DebouncedInput {
    pub fn new() -> Self {
        Self::with_config(DebouncedInputConfig::default())
    }

    pub fn with_config(config: DebouncedInputConfig) -> Self {
        Self {
            input: Input::default(),
            debouncer: Debouncer::new(config.debounce_ms),
            last_settled: None,
            config,
            active: false,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.debouncer.reset();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Overwrite the buffer from outside; the external value is
    /// authoritative and does not trigger a debounced delivery
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.last_settled = Some(value.clone());
        self.input = Input::default().with_value(value);
        self.debouncer.reset();
    }

    pub fn clear(&mut self) {
        self.input.reset();
        self.debouncer.trigger();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DebouncedInputAction {
        if !self.active {
            return DebouncedInputAction::PassThrough;
        }

        match key.code {
            KeyCode::Esc => {
                self.deactivate();
                DebouncedInputAction::Cancel
            }
            KeyCode::Enter => {
                let value = self.input.value().to_string();
                self.debouncer.reset();
                self.last_settled = Some(value.clone());
                DebouncedInputAction::Confirm(value)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                DebouncedInputAction::PassThrough
            }
            _ => {
                self.input.handle_event(&crossterm::event::Event::Key(key));
                let current = self.input.value().to_string();

                if self.last_settled.as_deref() != Some(current.as_str()) {
                    self.debouncer.trigger();
                    DebouncedInputAction::InputChanged(current)
                } else {
                    DebouncedInputAction::Continue
                }
            }
        }
    }

    /// Poll from the event loop tick; returns the settled value once per
    /// burst of keystrokes
    pub fn check_debounce(&mut self) -> Option<String> {
        if self.debouncer.should_execute() {
            let value = self.input.value().to_string();
            if self.last_settled.as_deref() != Some(value.as_str()) {
                self.last_settled = Some(value.clone());
                return Some(value);
            }
        }
        None
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let title = if self.config.show_debounce_indicator && self.debouncer.is_pending() {
            format!("{} (typing...)", self.config.title)
        } else {
            self.config.title.clone()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.config.style);

        let text = if self.input.value().is_empty() && !self.active {
            self.config.placeholder.clone()
        } else {
            self.input.value().to_string()
        };

        let style = if self.input.value().is_empty() && !self.active {
            Style::default().fg(Color::DarkGray)
        } else {
            self.config.style
        };

        let widget = Paragraph::new(text).block(block).style(style);
        f.render_widget(widget, area);

        if self.active {
            f.set_cursor_position((area.x + self.input.cursor() as u16 + 1, area.y + 1));
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = title.into();
    }
}

impl Default for DebouncedInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for custom-configured inputs
pub struct DebouncedInputBuilder {
    config: DebouncedInputConfig,
}

impl DebouncedInputBuilder {
    pub fn new() -> Self {
        Self {
            config: DebouncedInputConfig::default(),
        }
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce_ms = ms;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.config.style = style;
        self
    }

    pub fn show_indicator(mut self, show: bool) -> Self {
        self.config.show_debounce_indicator = show;
        self
    }

    pub fn build(self) -> DebouncedInput {
        DebouncedInput::with_config(self.config)
    }
}

impl Default for DebouncedInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn burst_settles_once_with_final_value() {
        let mut input = DebouncedInputBuilder::new().debounce_ms(10).build();
        input.activate();

        input.handle_key(key('a'));
        input.handle_key(key('b'));
        input.handle_key(key('c'));
        assert_eq!(input.check_debounce(), None);

        sleep(Duration::from_millis(15));
        assert_eq!(input.check_debounce(), Some("abc".to_string()));
        // nothing more to deliver
        sleep(Duration::from_millis(15));
        assert_eq!(input.check_debounce(), None);
    }

    #[test]
    fn unchanged_value_does_not_redeliver() {
        let mut input = DebouncedInputBuilder::new().debounce_ms(5).build();
        input.activate();
        input.handle_key(key('x'));
        sleep(Duration::from_millis(10));
        assert_eq!(input.check_debounce(), Some("x".to_string()));

        // backspace then retype the same value
        input.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        input.handle_key(key('x'));
        sleep(Duration::from_millis(10));
        assert_eq!(input.check_debounce(), None);
    }

    #[test]
    fn external_set_value_is_authoritative() {
        let mut input = DebouncedInputBuilder::new().debounce_ms(5).build();
        input.activate();
        input.set_value("seeded");
        assert_eq!(input.value(), "seeded");
        sleep(Duration::from_millis(10));
        assert_eq!(input.check_debounce(), None);
    }
}
