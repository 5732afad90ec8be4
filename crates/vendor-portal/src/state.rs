//! Shared application state and its construction from configuration.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use vendor_auth::{Authenticator, PasswordHasher, Session, SessionRestorer};
use vendor_sheets::{
    GoogleSheetsStore, MemoryStore, ServiceAccountKey, ServiceAccountTokenSource, StaticToken,
    TableStore, TokenSource,
};

use crate::config::{ConfigStore, SheetsConfig};
use crate::error::{ConfigError, Result};
use crate::intake::IntakeService;
use crate::pages::Pages;

/// Everything a handler needs.
#[derive(Clone)]
pub struct AppState {
    /// Configuration file, including the credential table
    pub config: Arc<ConfigStore>,
    /// Session gate
    pub authenticator: Arc<Authenticator>,
    /// Vendor table access
    pub intake: Arc<IntakeService>,
    /// Page templates
    pub pages: Arc<Pages>,
}

impl AppState {
    /// Build state for `config`, storing vendors in the store its `sheets`
    /// section describes.
    pub fn from_config(config: Arc<ConfigStore>) -> Result<Self> {
        let store = build_store(&config.read(|c| c.sheets.clone()))?;
        Self::new(config, store)
    }

    /// Build state around an explicit store.
    pub fn new(config: Arc<ConfigStore>, store: Arc<dyn TableStore>) -> Result<Self> {
        Self::with_hasher(config, store, PasswordHasher::default())
    }

    /// Build state with a specific password hasher.
    ///
    /// Plaintext passwords found in the credential table are hashed and the
    /// file is saved.
    pub fn with_hasher(
        config: Arc<ConfigStore>,
        store: Arc<dyn TableStore>,
        hasher: PasswordHasher,
    ) -> Result<Self> {
        let snapshot = config.snapshot();
        let authenticator = Authenticator::new(&snapshot.cookie)
            .with_hasher(hasher)
            .with_registration(snapshot.registration.into());

        let has_plaintext = snapshot
            .credentials
            .usernames
            .values()
            .any(|u| !PasswordHasher::is_hash(&u.password));
        if has_plaintext {
            let hasher = authenticator.hasher();
            let hashed = config
                .update(|cfg| cfg.credentials.hash_plaintext_passwords(hasher))??;
            log::info!("Hashed {hashed} plaintext password(s)");
        }

        let intake = IntakeService::new(
            store,
            snapshot.sheets.worksheet,
            Duration::from_secs(snapshot.sheets.ttl_secs),
        );
        let pages = Pages::new(snapshot.server.title)?;

        Ok(Self {
            config,
            authenticator: Arc::new(authenticator),
            intake: Arc::new(intake),
            pages: Arc::new(pages),
        })
    }

    /// Session restorer backed by this state's credential table.
    pub fn restorer(&self) -> Arc<CredentialRestorer> {
        Arc::new(CredentialRestorer {
            config: self.config.clone(),
            authenticator: self.authenticator.clone(),
        })
    }
}

/// Restores sessions against the live credential table.
pub struct CredentialRestorer {
    config: Arc<ConfigStore>,
    authenticator: Arc<Authenticator>,
}

impl SessionRestorer for CredentialRestorer {
    fn cookie_name(&self) -> &str {
        self.authenticator.codec().name()
    }

    fn restore(&self, token: &str) -> Pin<Box<dyn Future<Output = Session> + Send + '_>> {
        let session = self
            .config
            .read(|cfg| self.authenticator.restore(&cfg.credentials, token));
        Box::pin(std::future::ready(session))
    }
}

/// The worksheet store described by a `sheets` section.
///
/// Without a spreadsheet id the portal keeps vendors in memory.
pub fn build_store(sheets: &SheetsConfig) -> Result<Arc<dyn TableStore>> {
    let Some(spreadsheet_id) = sheets.spreadsheet_id.as_deref() else {
        log::warn!("no sheets.spreadsheet_id; vendors kept in memory only");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let tokens: Arc<dyn TokenSource> = match (&sheets.access_token, &sheets.service_account_file) {
        (Some(token), _) => Arc::new(StaticToken::new(token.clone())),
        (None, Some(path)) => {
            let key = ServiceAccountKey::from_file(path)?;
            log::info!("Using service account {}", key.client_email);
            Arc::new(ServiceAccountTokenSource::new(key)?)
        }
        (None, None) => {
            let message = "sheets.spreadsheet_id needs an access_token or service_account_file";
            return Err(ConfigError::invalid(message).into());
        }
    };

    let worksheet = &sheets.worksheet;
    log::info!("Using spreadsheet {spreadsheet_id}, worksheet {worksheet}");
    Ok(Arc::new(
        GoogleSheetsStore::new(spreadsheet_id, tokens)
            .with_api_base(sheets.api_base.clone())
            .with_columns(vendor_core::COLUMNS.len())
            .with_numeric_columns(
                vendor_core::COLUMNS
                    .iter()
                    .position(|c| *c == "YearsInBusiness"),
            ),
    ))
}
