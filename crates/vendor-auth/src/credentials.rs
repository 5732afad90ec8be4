//! Credential store as kept in the YAML configuration file.
//!
//! ```yaml
//! usernames:
//!   jsmith:
//!     email: jsmith@example.com
//!     name: John Smith
//!     password: $2b$12$...
//!     failed_login_attempts: 0
//!     logged_in: false
//! ```
//!
//! Keys this crate does not know about are kept so a load/save cycle
//! leaves the file intact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::AuthError;
use crate::hasher::PasswordHasher;

/// One registered user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// bcrypt hash (plaintext is hashed on load).
    pub password: String,
    /// Consecutive failed logins since the last success.
    #[serde(default)]
    pub failed_login_attempts: u32,
    /// Whether the user currently holds a session.
    #[serde(default)]
    pub logged_in: bool,
    /// Unrecognized keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// All registered users, keyed by username.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Users keyed by login name.
    #[serde(default)]
    pub usernames: BTreeMap<String, UserRecord>,
    /// Unrecognized keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Credentials {
    /// Look up a user by name.
    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.usernames.get(username)
    }

    /// Look up a user by name for mutation.
    pub fn user_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.usernames.get_mut(username)
    }

    /// True when any user has this email.
    pub fn email_taken(&self, email: &str) -> bool {
        self.usernames.values().any(|u| u.email == email)
    }

    /// Replace plaintext passwords with hashes.
    ///
    /// Returns the number of passwords that were hashed, so the caller knows
    /// whether the file needs saving.
    pub fn hash_plaintext_passwords(
        &mut self,
        hasher: &PasswordHasher,
    ) -> Result<usize, AuthError> {
        let mut hashed = 0;
        for (username, user) in &mut self.usernames {
            if !PasswordHasher::is_hash(&user.password) {
                log::info!("Hashing plaintext password for user '{username}'");
                user.password = hasher.hash(&user.password)?;
                hashed += 1;
            }
        }
        Ok(hashed)
    }
}
