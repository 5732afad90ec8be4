//! Vendor Portal
//!
//! A session-gated web form that appends vendor records to a worksheet.
//!
//! - [`config`]: the YAML configuration file and [`ConfigStore`]
//! - [`intake`]: [`IntakeService`], reads and single-writer appends
//! - [`pages`]: HTML templates
//! - [`handlers`] / [`routes`]: the axum application
//! - [`state`]: wiring from configuration to services

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod pages;
pub mod routes;
pub mod state;

pub use config::{ConfigStore, PortalConfig};
pub use error::{ConfigError, PortalError, Result};
pub use intake::IntakeService;
pub use routes::build_router;
pub use state::{AppState, build_store};
