//! Vendor intake against the worksheet store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use vendor_core::{FormSubmission, VendorTable, append_submission};
use vendor_sheets::{CachedStore, TableStore};

use crate::error::Result;

/// Success message shown after a vendor is stored.
pub const SUBMITTED: &str = "Vendor details successfully submitted!";

/// Reads the vendor table and appends submissions to it.
///
/// Submissions are applied one at a time: each one re-reads the worksheet
/// past the cache, validates against that copy, and writes the result.
pub struct IntakeService {
    store: CachedStore,
    worksheet: String,
    writer: Mutex<()>,
}

impl IntakeService {
    /// Serve `worksheet` from `store`, caching reads for `ttl`.
    pub fn new(store: Arc<dyn TableStore>, worksheet: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store: CachedStore::new(store, ttl),
            worksheet: worksheet.into(),
            writer: Mutex::new(()),
        }
    }

    /// The worksheet holding the vendor table.
    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    /// The current vendor table, possibly from cache.
    pub async fn load_existing(&self) -> Result<VendorTable> {
        let grid = self.store.read(&self.worksheet).await?;
        Ok(VendorTable::from_grid(&grid))
    }

    /// Validate `submission`, append it, and store the table.
    ///
    /// Returns the table as written. Nothing is written when validation
    /// fails.
    pub async fn submit(&self, submission: &FormSubmission) -> Result<VendorTable> {
        let _writer = self.writer.lock().await;

        let grid = self.store.read_fresh(&self.worksheet).await?;
        let existing = VendorTable::from_grid(&grid);
        let (updated, record) = append_submission(submission, &existing)?;

        self.store.write(&self.worksheet, &updated.to_grid()).await?;
        log::info!(
            "Stored vendor '{}' in {} ({} rows)",
            record.company_name,
            self.worksheet,
            updated.len()
        );
        Ok(updated)
    }
}
