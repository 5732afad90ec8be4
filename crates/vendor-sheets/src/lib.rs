//! Worksheet storage for the Vendor Portal.
//!
//! A worksheet is exchanged as a [`Grid`]: rows of string cells, header
//! first. Reads return the whole sheet and writes replace it.
//!
//! - [`TableStore`]: the read/overwrite interface
//! - [`GoogleSheetsStore`]: Google Sheets v4 values API
//! - [`CachedStore`]: read cache with a freshness window
//! - [`MemoryStore`]: process-local store for development and tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod error;
mod google;
mod memory;

use async_trait::async_trait;

pub use cache::CachedStore;
pub use error::{Result, StoreError};
pub use google::{
    GoogleSheetsStore, ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource,
};
pub use memory::MemoryStore;

/// Rows of string cells; the first row is the header.
pub type Grid = Vec<Vec<String>>;

/// A remote tabular store addressed by worksheet name.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read the whole worksheet. A missing or empty sheet reads as an empty grid.
    async fn read(&self, worksheet: &str) -> Result<Grid>;

    /// Replace the whole worksheet with `grid`.
    async fn write(&self, worksheet: &str, grid: &Grid) -> Result<()>;
}
