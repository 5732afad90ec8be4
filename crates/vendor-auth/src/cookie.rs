//! Signed session cookie.
//!
//! The cookie value is an HS256 JWT signed with the configured cookie key. It
//! carries the username, display name and an expiry; the expiry is enforced
//! by the JWT validation itself.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AuthError, CookieConfig};

/// Token lifetime used for browser-session cookies (`expiry_days: 0`).
const SESSION_COOKIE_TOKEN_DAYS: i64 = 1;

/// Claims carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Login name.
    pub username: String,
    /// Display name at the time of login.
    pub name: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies session cookies.
#[derive(Clone)]
pub struct CookieCodec {
    name: String,
    expiry_days: u32,
    secure: bool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl CookieCodec {
    /// Create a codec from the cookie section of the configuration.
    pub fn new(config: &CookieConfig) -> Self {
        Self {
            name: config.name.clone(),
            expiry_days: config.expiry_days,
            secure: config.secure,
            encoding_key: EncodingKey::from_secret(config.key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.key.as_bytes()),
        }
    }

    /// Cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sign a token for a user.
    pub fn issue(&self, username: &str, name: &str) -> Result<String, AuthError> {
        let days = if self.expiry_days == 0 {
            SESSION_COOKIE_TOKEN_DAYS
        } else {
            i64::from(self.expiry_days)
        };
        let claims = SessionClaims {
            username: username.to_string(),
            name: name.to_string(),
            exp: (Utc::now() + Duration::days(days)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token's signature and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    /// `Set-Cookie` value that stores `token`.
    pub fn set_cookie(&self, token: &str) -> String {
        let mut cookie = format!("{}={token}; {}", self.name, self.attributes());
        if self.expiry_days > 0 {
            let max_age = u64::from(self.expiry_days) * 24 * 60 * 60;
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        cookie
    }

    /// `Set-Cookie` value that removes the cookie.
    pub fn clear_cookie(&self) -> String {
        format!("{}=; {}; Max-Age=0", self.name, self.attributes())
    }

    fn attributes(&self) -> &'static str {
        if self.secure {
            "Path=/; HttpOnly; SameSite=Lax; Secure"
        } else {
            "Path=/; HttpOnly; SameSite=Lax"
        }
    }
}
