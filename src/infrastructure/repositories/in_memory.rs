//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementation of `TickRepository` backing the
//! pipeline and API tests. Data is lost on restart.

use crate::domain::market::Tick;
use crate::domain::market::tick::sort_by_time;
use crate::domain::repositories::TickRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryTickRepository {
    ticks: Arc<RwLock<Vec<Tick>>>,
}

impl InMemoryTickRepository {
    pub fn new() -> Self {
        Self {
            ticks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_ticks(mut ticks: Vec<Tick>) -> Self {
        sort_by_time(&mut ticks);
        Self {
            ticks: Arc::new(RwLock::new(ticks)),
        }
    }
}

impl Default for InMemoryTickRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TickRepository for InMemoryTickRepository {
    async fn fetch_all(&self) -> Result<Vec<Tick>> {
        Ok(self.ticks.read().await.clone())
    }

    async fn save(&self, _symbol: &str, tick: &Tick) -> Result<()> {
        let mut ticks = self.ticks.write().await;
        ticks.push(*tick);
        sort_by_time(&mut ticks);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.ticks.read().await.len())
    }
}
