//! Top-level route table
//!
//! Routing here is configuration, not logic: one enum of views, an auth
//! gate picking the entry route, and a fallback error view for routes that
//! fail to load.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Records,
}

/// The auth gate: a non-empty stored token selects the main view
pub fn route_for_session(session: &SessionContext) -> Route {
    if session.is_logged_in() {
        Route::Records
    } else {
        Route::Login
    }
}

/// Fallback view for a route that failed to load: the error's message (or
/// HTTP status text) on top, any detail underneath
pub fn render_route_error(f: &mut Frame, area: Rect, message: &str, detail: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Fill(2),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(message.to_string()))
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .centered();
    f.render_widget(header, chunks[1]);

    if let Some(detail) = detail {
        let body = Paragraph::new(detail.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false })
            .centered();
        f.render_widget(body, chunks[2]);
    }
}
