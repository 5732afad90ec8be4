//! bcrypt password hashing.

use crate::AuthError;

/// Hashes and verifies passwords with bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(ok) => ok,
            Err(e) => {
                log::warn!("Stored password hash could not be checked: {e}");
                false
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_in_background(self, password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .map_err(|e| AuthError::Hash(format!("Task join error: {e}")))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_in_background(self, password: String, hash: String) -> bool {
        let task = tokio::task::spawn_blocking(move || self.verify(&password, &hash));
        match task.await {
            Ok(matched) => matched,
            Err(e) => {
                log::warn!("Password check did not finish: {e}");
                false
            }
        }
    }

    /// Whether `value` looks like a bcrypt hash rather than plaintext.
    pub fn is_hash(value: &str) -> bool {
        value.len() == 60
            && ["$2a$", "$2b$", "$2x$", "$2y$"]
                .iter()
                .any(|p| value.starts_with(p))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
