//! Repository Pattern Abstractions
//!
//! The training pipeline reads its history through [`TickRepository`] and
//! never touches storage directly. Implementations live in
//! `infrastructure` (SQLite via sqlx, and an in-memory store for tests).

use crate::domain::market::Tick;
use anyhow::Result;
use async_trait::async_trait;

/// Source of historical price ticks
#[async_trait]
pub trait TickRepository: Send + Sync {
    /// All stored ticks, ordered by timestamp ascending
    async fn fetch_all(&self) -> Result<Vec<Tick>>;

    /// Append a tick for `symbol`
    async fn save(&self, symbol: &str, tick: &Tick) -> Result<()>;

    /// Number of stored ticks
    async fn count(&self) -> Result<usize>;
}
