//! Process-local worksheet store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::{Grid, TableStore};

/// Keeps worksheets in memory. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    sheets: RwLock<HashMap<String, Grid>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with one worksheet.
    pub fn with_sheet(worksheet: impl Into<String>, grid: Grid) -> Self {
        let mut sheets = HashMap::new();
        sheets.insert(worksheet.into(), grid);
        Self {
            sheets: RwLock::new(sheets),
            ..Self::default()
        }
    }

    /// How many times `read` has been served.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// How many times `write` has been served.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read(&self, worksheet: &str) -> Result<Grid> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sheets
            .read()
            .await
            .get(worksheet)
            .cloned()
            .unwrap_or_default())
    }

    async fn write(&self, worksheet: &str, grid: &Grid) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.sheets
            .write()
            .await
            .insert(worksheet.to_string(), grid.clone());
        Ok(())
    }
}
