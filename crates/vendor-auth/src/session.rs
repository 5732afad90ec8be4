//! Session state.

use serde::Serialize;

/// Authentication state of the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No login attempted, or the attempt errored before checking credentials.
    #[default]
    Unknown,
    /// A user is logged in.
    Authenticated,
    /// The last login attempt used wrong credentials.
    Failed,
}

/// The session gate's view of the current user.
///
/// Stored in HTTP request extensions by the session middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Authentication state.
    pub status: SessionStatus,
    /// Login name, when known.
    pub username: Option<String>,
    /// Display name of an authenticated user.
    pub name: Option<String>,
}

impl Session {
    /// A session with nothing established.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// A session for a logged-in user.
    pub fn authenticated(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            username: Some(username.into()),
            name: Some(name.into()),
        }
    }

    /// A session whose login attempt was rejected.
    pub fn failed(username: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Failed,
            username: Some(username.into()),
            name: None,
        }
    }

    /// True when a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Username of an authenticated session.
    pub fn authenticated_username(&self) -> Option<&str> {
        if self.is_authenticated() {
            self.username.as_deref()
        } else {
            None
        }
    }
}
