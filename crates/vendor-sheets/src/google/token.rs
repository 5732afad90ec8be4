//! Access tokens for the Sheets API.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{Result, StoreError};

/// OAuth scope for read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Something that can hand out a bearer token for the Sheets API.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a currently valid access token.
    async fn token(&self) -> Result<String>;
}

/// A fixed, externally managed access token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap an access token obtained elsewhere.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// The fields of a Google service-account key file this crate needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account identity, used as the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// OAuth token endpoint.
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Read a key file as downloaded from the Google Cloud console.
    pub fn from_file(path: &Path) -> Result<Self> {
        let shown = path.display();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::config(format!("cannot read {shown}: {e}")))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::config(format!("bad key file {shown}: {e}")))
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Exchanges a signed service-account assertion for access tokens,
/// caching each token until shortly before it expires.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Create a token source for the given key.
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| StoreError::config(format!("bad private key: {e}")))?;
        Ok(Self {
            key,
            encoding_key,
            client: reqwest::Client::new(),
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self) -> Result<String> {
        let iat = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| StoreError::Auth(format!("cannot sign assertion: {e}")))
    }

    async fn fetch(&self) -> Result<CachedToken> {
        log::debug!("Requesting access token for {}", self.key.client_email);
        let assertion = self.assertion()?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("token endpoint returned {status}: {body}");
            return Err(StoreError::Auth(message));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Auth(format!("invalid token response: {e}")))?;
        let lifetime = Duration::from_secs(body.expires_in);
        Ok(CachedToken {
            token: body.access_token,
            expires_at: Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN),
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref()
            && Instant::now() < entry.expires_at
        {
            return Ok(entry.token.clone());
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
