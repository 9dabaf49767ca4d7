//! Sessions
//!
//! Identity is an explicit value: a [`Session`] exists only after a successful login and is
//! handed to every storefront flow. Editing a placed order additionally needs an [`EditGrant`],
//! which only a fresh password check produces.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors related to session state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A flow needs a logged-in user.
    #[error("not logged in")]
    NotLoggedIn,
}

/// Username and password submitted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account name
    pub username: String,

    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create a new set of credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    username: String,
    role: Option<String>,
}

impl Session {
    /// Create a session for a user the backend has authenticated.
    pub fn new(username: impl Into<String>, role: Option<String>) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// The logged-in user's name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role reported by the backend at login, if any.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Proof that the session's user re-entered their password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditGrant {
    username: String,
}

impl EditGrant {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Check whether the grant was issued to the holder of `session`.
    pub fn authorizes(&self, session: &Session) -> bool {
        self.username == session.username
    }
}

/// Login state held by an application shell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nobody is logged in.
    #[default]
    Anonymous,

    /// A user is logged in.
    Authenticated(Session),
}

impl SessionState {
    /// Record a successful login, replacing any previous session.
    pub fn login(&mut self, session: Session) {
        *self = Self::Authenticated(session);
    }

    /// Clear the session, returning it if one existed.
    pub fn logout(&mut self) -> Option<Session> {
        match std::mem::take(self) {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous => None,
        }
    }

    /// The current session, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous => None,
        }
    }

    /// The current session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoggedIn`] when nobody is logged in.
    pub fn require(&self) -> Result<&Session, SessionError> {
        self.session().ok_or(SessionError::NotLoggedIn)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn state_starts_anonymous() {
        let state = SessionState::default();

        assert_eq!(state.require(), Err(SessionError::NotLoggedIn));
    }

    #[test]
    fn login_then_logout_round_trips_session() -> TestResult {
        let mut state = SessionState::default();

        state.login(Session::new("ravi", Some("customer".to_string())));

        assert_eq!(state.require()?.username(), "ravi");
        assert_eq!(state.require()?.role(), Some("customer"));

        let ended = state.logout();

        assert_eq!(ended.as_ref().map(Session::username), Some("ravi"));
        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(state.logout(), None);

        Ok(())
    }

    #[test]
    fn grant_only_authorizes_its_user() {
        let grant = EditGrant::new("ravi");

        assert!(grant.authorizes(&Session::new("ravi", None)));
        assert!(!grant.authorizes(&Session::new("anu", None)));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("ravi", "hunter2"));

        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    }
}
