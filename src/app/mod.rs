//! Application shell
//!
//! Owns the terminal, the route table, the session context, and the event
//! loop. Views receive keystrokes and hand back actions; session and route
//! transitions run through the pure reducer in `state`.

pub mod error_boundary;
pub mod login_view;
pub mod records_view;
pub mod router;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::AuthClient;
use crate::config::Config;
use crate::data::row_model::{Column, Row};
use crate::session::{SessionContext, SessionEvent};
use crate::state::{reduce, AppEvent, AppState, StateChange};
use crate::widgets::notification::Notification;

use login_view::{LoginAction, LoginView};
use records_view::{RecordsAction, RecordsView};
use router::{route_for_session, Route};

/// How long notifications stay up
const NOTIFICATION_TTL_MS: u64 = 4000;

pub struct AppShell {
    state: AppState,
    session: SessionContext,
    client: AuthClient,

    login: LoginView,
    records: RecordsView,
    notification: Notification,

    /// Set when the records data failed to load; the route renders the
    /// fallback error view instead of the table
    route_error: Option<String>,

    should_quit: bool,
}

impl AppShell {
    pub fn new(
        config: &Config,
        session: SessionContext,
        client: AuthClient,
        columns: Vec<Column>,
        rows: std::result::Result<Vec<Row>, String>,
    ) -> Self {
        let route = route_for_session(&session);
        let state = AppState {
            route,
            logged_in: session.is_logged_in(),
        };

        let (rows, route_error) = match rows {
            Ok(rows) => (rows, None),
            Err(message) => {
                warn!(target: "shell", "Records failed to load: {}", message);
                (Vec::new(), Some(message))
            }
        };

        Self {
            state,
            session,
            client,
            login: LoginView::new(),
            records: RecordsView::new(config, columns, rows),
            notification: Notification::new(NOTIFICATION_TTL_MS),
            route_error,
            should_quit: false,
        }
    }

    /// Set up the terminal, run the guarded event loop, and always restore
    /// the terminal before surfacing any failure
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = error_boundary::run_guarded(|| self.event_loop(&mut terminal));

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        info!(target: "shell", "Entering event loop on route {:?}", self.state.route);

        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }

            // Timers only advance between input events
            self.notification.tick();
            if self.state.route == Route::Records {
                self.records.check_debounce();
            }
        }

        Ok(())
    }

    fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(f.area());

        match self.state.route {
            Route::Login => self.login.render(f, chunks[0]),
            Route::Records => match &self.route_error {
                Some(message) => {
                    router::render_route_error(f, chunks[0], message, None);
                }
                None => self.records.render(f, chunks[0]),
            },
        }

        self.notification.render(f, chunks[1]);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.state.route {
            Route::Login => match self.login.handle_key(key) {
                LoginAction::Submit(credentials) => self.submit_login(credentials),
                LoginAction::None => {}
            },
            Route::Records => match self.records.handle_key(key) {
                RecordsAction::Logout => self.logout(),
                RecordsAction::PageSizeChanged(size) => {
                    self.notification.info(format!("Showing {} rows per page", size));
                }
                RecordsAction::None => {}
            },
        }
    }

    fn submit_login(&mut self, credentials: crate::api::LoginRequest) {
        match self.client.login(&credentials) {
            Ok(response) => {
                if let Err(e) = self.session.apply(SessionEvent::CredentialsSet {
                    token: response.token,
                }) {
                    self.login.set_error(e.to_string());
                    return;
                }
                self.login.finish_submit();
                self.apply_event(AppEvent::LoginSucceeded);
            }
            Err(e) => {
                let message = e.to_string();
                self.login.set_error(message.clone());
                self.apply_event(AppEvent::LoginFailed { message });
            }
        }
    }

    fn logout(&mut self) {
        if let Err(e) = self.session.apply(SessionEvent::LoggedOut) {
            self.notification.error(e.to_string());
            return;
        }
        self.login.reset();
        self.apply_event(AppEvent::LoggedOut);
    }

    fn apply_event(&mut self, event: AppEvent) {
        let change = reduce(&self.state, &event);
        self.apply_change(change);
        self.state.logged_in = self.session.is_logged_in();
    }

    fn apply_change(&mut self, change: StateChange) {
        if let Some(route) = change.route {
            info!(target: "shell", "Route {:?} -> {:?}", self.state.route, route);
            self.state.route = route;
        }
        if let Some((kind, message)) = change.notification {
            self.notification.show(kind, message);
        }
    }
}
