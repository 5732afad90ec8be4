//! Login, logout, password reset and registration.
//!
//! Every operation works on a borrowed [`Credentials`] so the caller decides
//! when the changed user table is persisted.

use serde::Deserialize;

use crate::{
    AuthError, CookieCodec, CookieConfig, Credentials, PasswordHasher, Session, UserRecord,
};

/// Longest accepted display name.
const MAX_NAME_LEN: usize = 100;

/// Longest accepted username.
const MAX_USERNAME_LEN: usize = 20;

/// Submitted login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

/// Submitted reset-password form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordForm {
    /// Current plaintext password.
    #[serde(default)]
    pub current_password: String,
    /// Requested new password.
    #[serde(default)]
    pub new_password: String,
    /// Requested new password, typed again.
    #[serde(default)]
    pub new_password_repeat: String,
}

/// Submitted registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Requested login name.
    #[serde(default)]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Plaintext password, typed again.
    #[serde(default)]
    pub password_repeat: String,
}

/// Identity of a newly registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Contact email.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Display name.
    pub name: String,
}

/// Whether self-registration is available and how it is restricted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Registration is offered at all. Off by default.
    pub enabled: bool,
    /// Only emails listed as pre-authorized may register.
    pub pre_authorization: bool,
}

/// Result of checking a password against a stored hash.
///
/// Produced outside the credential lock and handed back to the second half
/// of a two-step operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    /// Hash the password was checked against.
    pub stored_hash: String,
    /// Whether the password matched.
    pub matched: bool,
}

impl PasswordCheck {
    /// A check for a user that does not exist.
    pub fn unknown_user() -> Self {
        Self {
            stored_hash: String::new(),
            matched: false,
        }
    }
}

/// The session gate.
#[derive(Clone)]
pub struct Authenticator {
    codec: CookieCodec,
    hasher: PasswordHasher,
    registration: RegistrationPolicy,
}

impl Authenticator {
    /// Create an authenticator for the given cookie settings.
    pub fn new(cookie: &CookieConfig) -> Self {
        Self {
            codec: CookieCodec::new(cookie),
            hasher: PasswordHasher::default(),
            registration: RegistrationPolicy::default(),
        }
    }

    /// Use a specific password hasher.
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set the registration policy.
    pub fn with_registration(mut self, registration: RegistrationPolicy) -> Self {
        self.registration = registration;
        self
    }

    /// Session cookie codec.
    pub fn codec(&self) -> &CookieCodec {
        &self.codec
    }

    /// Password hasher.
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Registration policy.
    pub fn registration(&self) -> RegistrationPolicy {
        self.registration
    }

    /// Restore a session from a cookie token.
    ///
    /// A bad, expired, or orphaned token yields an unknown session.
    pub fn restore(&self, credentials: &Credentials, token: &str) -> Session {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                log::debug!("Session cookie rejected: {e}");
                return Session::unknown();
            }
        };

        match credentials.user(&claims.username) {
            Some(user) => Session::authenticated(claims.username, user.name.clone()),
            None => {
                log::info!("Session cookie names unknown user '{}'", claims.username);
                Session::unknown()
            }
        }
    }

    /// Check submitted credentials and open a session.
    ///
    /// Empty fields raise [`AuthError::Login`]; a wrong username or password
    /// raises [`AuthError::InvalidCredentials`] and counts a failed attempt.
    pub fn login(
        &self,
        credentials: &mut Credentials,
        form: &LoginForm,
    ) -> Result<Session, AuthError> {
        let check = match self.login_hash(credentials, form)? {
            Some(hash) => PasswordCheck {
                matched: self.hasher.verify(&form.password, &hash),
                stored_hash: hash,
            },
            None => PasswordCheck::unknown_user(),
        };
        self.finish_login(credentials, form, &check)
    }

    /// First half of [`login`](Self::login): validate the form and return
    /// the stored hash to check the password against.
    ///
    /// `None` means the user does not exist.
    pub fn login_hash(
        &self,
        credentials: &Credentials,
        form: &LoginForm,
    ) -> Result<Option<String>, AuthError> {
        if form.username.is_empty() {
            return Err(AuthError::login("Username is empty"));
        }
        if form.password.is_empty() {
            return Err(AuthError::login("Password is empty"));
        }
        Ok(credentials
            .user(&form.username)
            .map(|user| user.password.clone()))
    }

    /// Second half of [`login`](Self::login): record the outcome of `check`.
    ///
    /// A check made against a hash that has since been replaced counts as a
    /// mismatch.
    pub fn finish_login(
        &self,
        credentials: &mut Credentials,
        form: &LoginForm,
        check: &PasswordCheck,
    ) -> Result<Session, AuthError> {
        let Some(user) = credentials.user_mut(&form.username) else {
            log::info!("Login attempt for unknown user '{}'", form.username);
            return Err(AuthError::InvalidCredentials);
        };

        if !check.matched || user.password != check.stored_hash {
            user.failed_login_attempts += 1;
            log::info!(
                "Failed login for '{}' ({} consecutive)",
                form.username,
                user.failed_login_attempts
            );
            return Err(AuthError::InvalidCredentials);
        }

        user.failed_login_attempts = 0;
        user.logged_in = true;
        log::info!("User '{}' logged in", form.username);
        Ok(Session::authenticated(
            form.username.clone(),
            user.name.clone(),
        ))
    }

    /// Close a session.
    pub fn logout(&self, credentials: &mut Credentials, session: &Session) {
        if let Some(user) = session
            .username
            .as_deref()
            .and_then(|u| credentials.user_mut(u))
        {
            user.logged_in = false;
        }
        log::info!(
            "User '{}' logged out",
            session.username.as_deref().unwrap_or("anonymous")
        );
    }

    /// Change the password of the session's user.
    ///
    /// Requires an authenticated session.
    pub fn reset_password(
        &self,
        credentials: &mut Credentials,
        session: &Session,
        form: &ResetPasswordForm,
    ) -> Result<(), AuthError> {
        let stored_hash = self.reset_hash(credentials, session, form)?;
        let check = PasswordCheck {
            matched: self.hasher.verify(&form.current_password, &stored_hash),
            stored_hash,
        };
        if !check.matched {
            return Err(AuthError::Credentials("Password is incorrect".to_string()));
        }
        let new_hash = self.hasher.hash(&form.new_password)?;
        self.finish_reset(credentials, session, &check, new_hash)
    }

    /// First half of [`reset_password`](Self::reset_password): apply the
    /// form rules and return the user's stored hash.
    pub fn reset_hash(
        &self,
        credentials: &Credentials,
        session: &Session,
        form: &ResetPasswordForm,
    ) -> Result<String, AuthError> {
        let username = session
            .authenticated_username()
            .ok_or(AuthError::NotAuthenticated)?;

        if form.new_password.is_empty() {
            return Err(AuthError::reset("No new password provided"));
        }
        if form.new_password != form.new_password_repeat {
            return Err(AuthError::reset("Passwords do not match"));
        }
        if form.new_password == form.current_password {
            return Err(AuthError::reset("New and current passwords are the same"));
        }

        credentials
            .user(username)
            .map(|user| user.password.clone())
            .ok_or_else(|| AuthError::Credentials("User not found".to_string()))
    }

    /// Second half of [`reset_password`](Self::reset_password): store
    /// `new_hash` if `check` matched the hash still on record.
    pub fn finish_reset(
        &self,
        credentials: &mut Credentials,
        session: &Session,
        check: &PasswordCheck,
        new_hash: String,
    ) -> Result<(), AuthError> {
        let username = session
            .authenticated_username()
            .ok_or(AuthError::NotAuthenticated)?;
        let user = credentials
            .user_mut(username)
            .ok_or_else(|| AuthError::Credentials("User not found".to_string()))?;
        if !check.matched || user.password != check.stored_hash {
            return Err(AuthError::Credentials("Password is incorrect".to_string()));
        }

        user.password = new_hash;
        log::info!("Password reset for user '{username}'");
        Ok(())
    }

    /// Add a new user.
    ///
    /// Fails with [`AuthError::RegistrationDisabled`] unless the policy
    /// enables registration. With pre-authorization on, the email must be in
    /// `pre_authorized` and is removed from it on success.
    pub fn register_user(
        &self,
        credentials: &mut Credentials,
        pre_authorized: &mut Vec<String>,
        form: &RegisterForm,
    ) -> Result<RegisteredUser, AuthError> {
        self.check_registration(credentials, pre_authorized, form)?;
        let password_hash = self.hasher.hash(&form.password)?;
        self.finish_registration(credentials, pre_authorized, form, password_hash)
    }

    /// Apply every registration rule without changing anything.
    pub fn check_registration(
        &self,
        credentials: &Credentials,
        pre_authorized: &[String],
        form: &RegisterForm,
    ) -> Result<(), AuthError> {
        if !self.registration.enabled {
            return Err(AuthError::RegistrationDisabled);
        }

        if !is_valid_email(&form.email) {
            return Err(AuthError::register("Email is not valid"));
        }
        if !is_valid_username(&form.username) {
            return Err(AuthError::register("Username is not valid"));
        }
        if form.name.trim().is_empty() || form.name.chars().count() > MAX_NAME_LEN {
            return Err(AuthError::register("Name is not valid"));
        }
        if credentials.email_taken(&form.email) {
            return Err(AuthError::register("Email already taken"));
        }
        if credentials.user(&form.username).is_some() {
            return Err(AuthError::register("Username already taken"));
        }
        if form.password.is_empty() || form.password_repeat.is_empty() {
            return Err(AuthError::register(
                "Password/repeat password fields cannot be empty",
            ));
        }
        if form.password != form.password_repeat {
            return Err(AuthError::register("Passwords do not match"));
        }
        if self.registration.pre_authorization && !pre_authorized.contains(&form.email) {
            return Err(AuthError::register("User not pre-authorized to register"));
        }
        Ok(())
    }

    /// Insert a user whose password was hashed ahead of time.
    ///
    /// The rules are checked again against the current table.
    pub fn finish_registration(
        &self,
        credentials: &mut Credentials,
        pre_authorized: &mut Vec<String>,
        form: &RegisterForm,
        password_hash: String,
    ) -> Result<RegisteredUser, AuthError> {
        self.check_registration(credentials, pre_authorized, form)?;
        if self.registration.pre_authorization {
            pre_authorized.retain(|email| *email != form.email);
        }

        let record = UserRecord {
            email: form.email.clone(),
            name: form.name.clone(),
            password: password_hash,
            ..UserRecord::default()
        };
        credentials.usernames.insert(form.username.clone(), record);
        log::info!("Registered user '{}'", form.username);

        Ok(RegisteredUser {
            email: form.email.clone(),
            username: form.username.clone(),
            name: form.name.clone(),
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
        && email.len() <= 320
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
