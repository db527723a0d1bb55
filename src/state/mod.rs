//! Application state transitions
//!
//! A small pure reducer: the shell feeds every [`AppEvent`] through
//! [`reduce`] and applies the returned [`StateChange`], so top-level
//! transitions stay testable without a terminal.

pub mod events;

pub use events::{AppEvent, StateChange};

use crate::app::router::Route;
use crate::widgets::notification::NotificationKind;
use tracing::debug;

/// The shell's top-level state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub logged_in: bool,
}

/// Pure transition: `(state, event) -> change`
pub fn reduce(_state: &AppState, event: &AppEvent) -> StateChange {
    debug!(target: "state", "Reducing {:?}", event);

    match event {
        AppEvent::RouteChanged { to, .. } => StateChange::route(*to),
        AppEvent::LoginSucceeded => StateChange::route(Route::Records).and(
            StateChange::notify(NotificationKind::Success, "Logged in"),
        ),
        AppEvent::LoginFailed { message } => {
            StateChange::notify(NotificationKind::Error, message.clone())
        }
        AppEvent::LoggedOut => StateChange::route(Route::Login)
            .and(StateChange::notify(NotificationKind::Info, "Logged out")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_out_state() -> AppState {
        AppState {
            route: Route::Login,
            logged_in: false,
        }
    }

    #[test]
    fn login_success_routes_to_records() {
        let change = reduce(&logged_out_state(), &AppEvent::LoginSucceeded);
        assert_eq!(change.route, Some(Route::Records));
        assert!(matches!(
            change.notification,
            Some((NotificationKind::Success, _))
        ));
    }

    #[test]
    fn login_failure_only_notifies() {
        let change = reduce(
            &logged_out_state(),
            &AppEvent::LoginFailed {
                message: "401 Unauthorized".to_string(),
            },
        );
        assert_eq!(change.route, None);
        assert_eq!(
            change.notification,
            Some((NotificationKind::Error, "401 Unauthorized".to_string()))
        );
    }

    #[test]
    fn changes_combine_with_later_fields_winning() {
        let combined = StateChange::route(Route::Login)
            .and(StateChange::route(Route::Records));
        assert_eq!(combined.route, Some(Route::Records));
    }
}
