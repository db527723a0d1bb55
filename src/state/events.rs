//! Application-level events and changes

use crate::app::router::Route;
use crate::widgets::notification::NotificationKind;

/// Events that can trigger app-level state changes
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Route changed
    RouteChanged { from: Route, to: Route },

    /// A login call succeeded
    LoginSucceeded,

    /// A login call failed with this message
    LoginFailed { message: String },

    /// The user logged out
    LoggedOut,
}

/// Changes to apply to the shell state
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StateChange {
    pub route: Option<Route>,
    pub notification: Option<(NotificationKind, String)>,
}

impl StateChange {
    pub fn route(route: Route) -> Self {
        Self {
            route: Some(route),
            ..Default::default()
        }
    }

    pub fn notify(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            notification: Some((kind, message.into())),
            ..Default::default()
        }
    }

    /// Combine with another change; later fields win
    pub fn and(mut self, other: StateChange) -> Self {
        if other.route.is_some() {
            self.route = other.route;
        }
        if other.notification.is_some() {
            self.notification = other.notification;
        }
        self
    }
}
