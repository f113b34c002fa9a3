use crate::domain::market::Tick;
use crate::domain::repositories::TickRepository;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::time::Duration;

/// A data source that is never reachable.
pub struct UnavailableTickRepository;

#[async_trait]
impl TickRepository for UnavailableTickRepository {
    async fn fetch_all(&self) -> Result<Vec<Tick>> {
        bail!("Error connecting to tick store: connection refused")
    }
    async fn save(&self, _symbol: &str, _tick: &Tick) -> Result<()> {
        bail!("Error connecting to tick store: connection refused")
    }
    async fn count(&self) -> Result<usize> {
        bail!("Error connecting to tick store: connection refused")
    }
}

/// Wraps another repository and delays every read.
pub struct DelayedTickRepository<R> {
    inner: R,
    delay: Duration,
}

impl<R: TickRepository> DelayedTickRepository<R> {
    pub fn new(inner: R, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<R: TickRepository> TickRepository for DelayedTickRepository<R> {
    async fn fetch_all(&self) -> Result<Vec<Tick>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_all().await
    }
    async fn save(&self, symbol: &str, tick: &Tick) -> Result<()> {
        self.inner.save(symbol, tick).await
    }
    async fn count(&self) -> Result<usize> {
        tokio::time::sleep(self.delay).await;
        self.inner.count().await
    }
}
