//! Auth-specific error types.

use crate::session::SessionStatus;

/// Errors raised by the session gate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login attempt was malformed (e.g. an empty field).
    #[error("{0}")]
    Login(String),

    /// Username or password did not match.
    #[error("Username/password is incorrect")]
    InvalidCredentials,

    /// Current password supplied during a reset was wrong.
    #[error("{0}")]
    Credentials(String),

    /// The requested new password was rejected.
    #[error("{0}")]
    Reset(String),

    /// The registration form was rejected.
    #[error("{0}")]
    Register(String),

    /// Registration is switched off in configuration.
    #[error("registration is disabled")]
    RegistrationDisabled,

    /// The action needs a logged-in user.
    #[error("authentication required")]
    NotAuthenticated,

    /// Session cookie could not be verified.
    #[error("invalid session token: {0}")]
    InvalidToken(String),

    /// Session cookie has expired.
    #[error("session has expired")]
    Expired,

    /// Password hashing backend failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Session cookie could not be signed.
    #[error("failed to sign session token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Whether this error should result in a 4xx (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Hash(_) | AuthError::Signing(_))
    }

    /// Session status a failed login leaves behind.
    ///
    /// Wrong credentials mark the attempt as failed; every other login error
    /// leaves the session ungated.
    pub fn login_status(&self) -> SessionStatus {
        match self {
            AuthError::InvalidCredentials => SessionStatus::Failed,
            _ => SessionStatus::Unknown,
        }
    }

    /// Creates a login error.
    pub fn login<S: Into<String>>(message: S) -> Self {
        AuthError::Login(message.into())
    }

    /// Creates a reset error.
    pub fn reset<S: Into<String>>(message: S) -> Self {
        AuthError::Reset(message.into())
    }

    /// Creates a register error.
    pub fn register<S: Into<String>>(message: S) -> Self {
        AuthError::Register(message.into())
    }
}
