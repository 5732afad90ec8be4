//! Error types for the portal.

use std::path::PathBuf;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use vendor_auth::AuthError;
use vendor_core::ValidationError;
use vendor_sheets::StoreError;

/// Result type alias for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;

/// Errors reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Config I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid YAML for the expected layout.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The file parsed but a setting is unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid-setting error.
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        ConfigError::Invalid(message.into())
    }
}

/// Errors surfaced by portal handlers and services.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PortalError {
    /// The submission failed an intake rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The form could not be decoded.
    #[error(transparent)]
    Form(#[from] vendor_core::Error),

    /// Session gate failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The worksheet store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The configuration file could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A page failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl PortalError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::Form(e) if e.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::Auth(AuthError::NotAuthenticated) => StatusCode::UNAUTHORIZED,
            PortalError::Auth(AuthError::RegistrationDisabled) => StatusCode::NOT_FOUND,
            PortalError::Auth(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short category name used in JSON error bodies.
    pub fn category(&self) -> &'static str {
        match self {
            PortalError::Validation(_) | PortalError::Form(_) => "validation",
            PortalError::Auth(_) => "authentication",
            PortalError::Store(_) => "store",
            PortalError::Config(_) => "config",
            PortalError::Template(_) => "render",
        }
    }

    /// Whether the fault lies with the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Renders as a JSON error body. Page handlers render their own HTML.
impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = serde_json::json!({
            "error": {
                "category": self.category(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
