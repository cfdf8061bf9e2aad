//! View states - screen toggle and auth flow
//!
//! Two small state machines drive the rendering surface: which board screen
//! is shown, and where the user is in the login flow.

use serde::{Deserialize, Serialize};

/// Which board screen is shown
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Items not yet completed
    #[default]
    Active,

    /// Completed items with their completion stamps
    Completed,
}

impl Screen {
    pub fn toggled(self) -> Self {
        match self {
            Screen::Active => Screen::Completed,
            Screen::Completed => Screen::Active,
        }
    }
}

/// Where the user is in the login flow
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthView {
    /// No session; login or registration is offered
    #[default]
    Anonymous,

    /// Credentials submitted, awaiting the backend
    LoggingIn,

    /// Holding a session token
    Authenticated,
}

/// Events driving the view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    ShowActive,
    ShowCompleted,
    LoginStarted,
    LoginSucceeded,
    LoginFailed,
    SessionExpired,
    LoggedOut,
}

/// Result of handling a view event
#[derive(Debug, Clone)]
pub struct ViewTransition {
    pub from: ViewState,
    pub to: ViewState,
    pub event: ViewEvent,
    /// Whether the state actually changed
    pub changed: bool,
}

/// Combined view state
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ViewState {
    pub screen: Screen,
    pub auth: AuthView,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle an event and move to the next state. Events that make no
    /// sense in the current state leave it unchanged.
    pub fn handle_event(&mut self, event: ViewEvent) -> ViewTransition {
        let from = *self;
        let to = Self::compute_next(from, event);
        *self = to;

        ViewTransition {
            from,
            to,
            event,
            changed: from != to,
        }
    }

    fn compute_next(state: ViewState, event: ViewEvent) -> ViewState {
        use AuthView::*;
        use ViewEvent::*;

        match (state.auth, event) {
            // Screen toggling works in every auth state
            (_, ShowActive) => ViewState {
                screen: Screen::Active,
                ..state
            },
            (_, ShowCompleted) => ViewState {
                screen: Screen::Completed,
                ..state
            },

            (Anonymous, LoginStarted) => ViewState {
                auth: LoggingIn,
                ..state
            },
            (LoggingIn, LoginSucceeded) => ViewState {
                auth: Authenticated,
                ..state
            },
            (LoggingIn, LoginFailed) => ViewState {
                auth: Anonymous,
                ..state
            },
            (Authenticated, SessionExpired) | (Authenticated, LoggedOut) => ViewState {
                auth: Anonymous,
                ..state
            },

            // No transition
            _ => state,
        }
    }

    /// Check whether an event would change the state, without applying it.
    pub fn can_handle(&self, event: ViewEvent) -> bool {
        Self::compute_next(*self, event) != *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_flow() {
        let mut view = ViewState::new();
        assert_eq!(view.auth, AuthView::Anonymous);

        let t1 = view.handle_event(ViewEvent::LoginStarted);
        assert!(t1.changed);
        assert_eq!(view.auth, AuthView::LoggingIn);

        let t2 = view.handle_event(ViewEvent::LoginSucceeded);
        assert!(t2.changed);
        assert_eq!(view.auth, AuthView::Authenticated);
    }

    #[test]
    fn test_failed_login_returns_to_anonymous() {
        let mut view = ViewState::new();
        view.handle_event(ViewEvent::LoginStarted);
        view.handle_event(ViewEvent::LoginFailed);
        assert_eq!(view.auth, AuthView::Anonymous);
    }

    #[test]
    fn test_expiry_forces_reauthentication() {
        let mut view = ViewState::new();
        view.handle_event(ViewEvent::LoginStarted);
        view.handle_event(ViewEvent::LoginSucceeded);

        let t = view.handle_event(ViewEvent::SessionExpired);
        assert!(t.changed);
        assert_eq!(view.auth, AuthView::Anonymous);
    }

    #[test]
    fn test_screen_toggle_is_independent_of_auth() {
        let mut view = ViewState::new();
        assert_eq!(view.screen, Screen::Active);

        view.handle_event(ViewEvent::ShowCompleted);
        assert_eq!(view.screen, Screen::Completed);
        assert_eq!(view.auth, AuthView::Anonymous);

        view.handle_event(ViewEvent::ShowActive);
        assert_eq!(view.screen, Screen::Active);

        assert_eq!(Screen::Active.toggled(), Screen::Completed);
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        let mut view = ViewState::new();

        // Succeeding without having started is a no-op
        let t = view.handle_event(ViewEvent::LoginSucceeded);
        assert!(!t.changed);
        assert_eq!(view.auth, AuthView::Anonymous);

        assert!(!view.can_handle(ViewEvent::LoggedOut));
        assert!(view.can_handle(ViewEvent::LoginStarted));
    }
}
