//! Session gate for the Vendor Portal.
//!
//! Provides:
//! - [`Authenticator`]: login, logout, password reset and (feature-flagged) registration
//! - [`Credentials`]: the user table kept in the YAML configuration
//! - [`CookieCodec`]: signed session cookies
//! - [`SessionLayer`] / [`SessionService`]: Tower middleware that restores the session
//! - [`Session`] / [`SessionStatus`]: the gate's view of the current user
//! - [`AuthError`]: auth-specific error types

mod authenticator;
mod cookie;
mod credentials;
mod error;
mod hasher;
mod middleware;
mod session;

use serde::{Deserialize, Serialize};

pub use authenticator::{
    Authenticator, LoginForm, PasswordCheck, RegisterForm, RegisteredUser, RegistrationPolicy,
    ResetPasswordForm,
};
pub use cookie::{CookieCodec, SessionClaims};
pub use credentials::{Credentials, UserRecord};
pub use error::AuthError;
pub use hasher::PasswordHasher;
pub use middleware::{SessionLayer, SessionRestorer, SessionService};
pub use session::{Session, SessionStatus};

/// The `cookie` section of the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie name.
    pub name: String,
    /// Secret used to sign session tokens.
    pub key: String,
    /// Cookie lifetime in days. `0` means a browser-session cookie.
    pub expiry_days: u32,
    /// Mark the cookie `Secure` so browsers send it over HTTPS only.
    #[serde(default, skip_serializing_if = "is_false")]
    pub secure: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}
