//! Portal configuration file.
//!
//! The YAML file holds the credential table next to the cookie settings and
//! the optional `server`, `sheets` and `registration` sections. Keys the
//! portal does not know about are kept and written back unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use vendor_auth::{CookieConfig, Credentials, RegistrationPolicy};

use crate::error::ConfigError;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Default page title.
pub const DEFAULT_TITLE: &str = "Vendor Management Portal";

/// Default worksheet holding the vendor table.
pub const DEFAULT_WORKSHEET: &str = "Inventario";

/// Default read-cache freshness window in seconds.
pub const DEFAULT_TTL_SECS: u64 = 5;

/// Default Sheets API endpoint.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// The whole configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Users allowed to log in.
    pub credentials: Credentials,

    /// Session cookie settings.
    pub cookie: CookieConfig,

    /// Emails allowed to self-register when pre-authorization is on.
    #[serde(
        rename = "pre-authorized",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pre_authorized: Option<PreAuthorized>,

    /// HTTP server settings.
    #[serde(default, skip_serializing_if = "is_default")]
    pub server: ServerConfig,

    /// Worksheet store settings.
    #[serde(default, skip_serializing_if = "is_default")]
    pub sheets: SheetsConfig,

    /// Self-registration settings.
    #[serde(default, skip_serializing_if = "is_default")]
    pub registration: RegistrationConfig,

    /// Unrecognized top-level keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The `pre-authorized` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreAuthorized {
    /// Emails that may register.
    #[serde(default)]
    pub emails: Vec<String>,
}

/// The `server` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Page title.
    pub title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// The `sheets` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Spreadsheet holding the vendor worksheet. Absent means in-memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    /// Worksheet name.
    pub worksheet: String,
    /// Read-cache freshness window in seconds.
    pub ttl_secs: u64,
    /// Sheets API endpoint.
    pub api_base: String,
    /// Pre-issued OAuth access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Service-account key file used to mint access tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_file: Option<PathBuf>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet: DEFAULT_WORKSHEET.to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: None,
            service_account_file: None,
        }
    }
}

/// The `registration` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Offer self-registration.
    pub enabled: bool,
    /// Require the email to be listed under `pre-authorized`.
    pub pre_authorization: bool,
}

impl From<RegistrationConfig> for RegistrationPolicy {
    fn from(c: RegistrationConfig) -> Self {
        RegistrationPolicy {
            enabled: c.enabled,
            pre_authorization: c.pre_authorization,
        }
    }
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl PortalConfig {
    /// Parse a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: PortalConfig = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.cookie.name.trim().is_empty() {
            return Err(ConfigError::invalid("cookie.name is empty"));
        }
        if self.cookie.key.is_empty() {
            return Err(ConfigError::invalid("cookie.key is empty"));
        }
        if self.sheets.worksheet.trim().is_empty() {
            return Err(ConfigError::invalid("sheets.worksheet is empty"));
        }
        Ok(())
    }
}

/// Owns the parsed configuration and the file it came from.
///
/// Reads take a shared lock. Mutations go through [`ConfigStore::update`],
/// which writes the file before releasing the lock.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<PortalConfig>,
}

impl ConfigStore {
    /// Load and parse `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path, e))?;
        let config = PortalConfig::from_yaml(&raw)?;
        log::info!(
            "Loaded config from {} ({} users)",
            path.display(),
            config.credentials.usernames.len()
        );
        Ok(Self::new(path, config))
    }

    /// Wrap an already parsed configuration that persists to `path`.
    pub fn new(path: impl Into<PathBuf>, config: PortalConfig) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(config),
        }
    }

    /// File the configuration persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the current configuration.
    pub fn read<T>(&self, f: impl FnOnce(&PortalConfig) -> T) -> T {
        let guard = self.config.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// A copy of the current configuration.
    pub fn snapshot(&self) -> PortalConfig {
        self.read(Clone::clone)
    }

    /// Mutate the configuration and save it.
    pub fn update<T>(&self, f: impl FnOnce(&mut PortalConfig) -> T) -> Result<T, ConfigError> {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut guard);
        self.save(&guard)?;
        Ok(out)
    }

    /// Write the current configuration to disk.
    pub fn persist(&self) -> Result<(), ConfigError> {
        let guard = self.config.read().unwrap_or_else(PoisonError::into_inner);
        self.save(&guard)
    }

    fn save(&self, config: &PortalConfig) -> Result<(), ConfigError> {
        let yaml = config.to_yaml()?;
        let tmp = self.path.with_extension("yaml.tmp");
        std::fs::write(&tmp, yaml)
            .map_err(|e| ConfigError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ConfigError::io(&self.path, e))?;
        log::debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
