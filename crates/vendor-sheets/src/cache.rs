//! Read cache with a freshness window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::Result;
use crate::{Grid, TableStore};

struct CachedGrid {
    grid: Grid,
    fetched_at: Instant,
}

/// Serves repeated reads of a worksheet from memory for `ttl`.
///
/// Writes go straight to the inner store and drop the cached copy, so the
/// next read observes the write.
pub struct CachedStore {
    inner: Arc<dyn TableStore>,
    ttl: Duration,
    cached: RwLock<HashMap<String, CachedGrid>>,
}

impl CachedStore {
    /// Wrap `inner`, keeping reads for `ttl`.
    pub fn new(inner: Arc<dyn TableStore>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(HashMap::new()),
        }
    }

    /// The freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read from the inner store regardless of the cache, refreshing it.
    pub async fn read_fresh(&self, worksheet: &str) -> Result<Grid> {
        let grid = self.inner.read(worksheet).await?;
        self.cached.write().await.insert(
            worksheet.to_string(),
            CachedGrid {
                grid: grid.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(grid)
    }

    /// Drop the cached copy of `worksheet`.
    pub async fn invalidate(&self, worksheet: &str) {
        self.cached.write().await.remove(worksheet);
    }
}

#[async_trait]
impl TableStore for CachedStore {
    async fn read(&self, worksheet: &str) -> Result<Grid> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.get(worksheet)
                && entry.fetched_at.elapsed() < self.ttl
            {
                log::trace!("Serving {worksheet} from cache");
                return Ok(entry.grid.clone());
            }
        }
        self.read_fresh(worksheet).await
    }

    async fn write(&self, worksheet: &str, grid: &Grid) -> Result<()> {
        let result = self.inner.write(worksheet, grid).await;
        self.invalidate(worksheet).await;
        result
    }
}
