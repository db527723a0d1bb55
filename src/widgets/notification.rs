//! Status notifications
//!
//! One banner widget covers the inline notification and the success/error
//! popups of the original shell: a kind, a message, and a debouncer-driven
//! auto-dismiss.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::utils::debouncer::Debouncer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

pub struct Notification {
    current: Option<(NotificationKind, String)>,
    timer: Debouncer,
}

impl Notification {
    /// `ttl_ms` is how long a message stays up before auto-dismissing
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            current: None,
            timer: Debouncer::new(ttl_ms),
        }
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.current = Some((kind, message.into()));
        self.timer.trigger();
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.timer.reset();
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Poll from the event loop tick; expires the banner after its ttl
    pub fn tick(&mut self) {
        if self.timer.should_execute() {
            self.current = None;
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let Some((kind, message)) = &self.current else {
            return;
        };

        let (marker, color) = match kind {
            NotificationKind::Info => ("i", Color::Blue),
            NotificationKind::Success => ("✓", Color::Green),
            NotificationKind::Error => ("✗", Color::Red),
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", marker),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(message.clone()),
        ]);

        f.render_widget(Paragraph::new(line), area);
    }
}
