use crate::domain::market::Tick;
use crate::domain::repositories::TickRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

/// Tick history stored in the `price_ticks` table.
///
/// Timestamps are kept as epoch milliseconds so that `ORDER BY timestamp`
/// is chronological.
pub struct SqliteTickRepository {
    pool: SqlitePool,
    symbol: Option<String>,
}

impl SqliteTickRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, symbol: None }
    }

    /// Restrict reads to a single symbol
    pub fn with_symbol(mut self, symbol: Option<String>) -> Self {
        self.symbol = symbol;
        self
    }

    fn map_rows_to_ticks(&self, rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<Tick>> {
        let mut ticks = Vec::with_capacity(rows.len());
        for row in rows {
            let millis: i64 = row.try_get("timestamp")?;
            let price: f64 = row.try_get("price")?;
            match DateTime::from_timestamp_millis(millis) {
                Some(timestamp) => ticks.push(Tick::new(timestamp, price)),
                None => warn!("Skipping tick with out-of-range timestamp {}", millis),
            }
        }
        Ok(ticks)
    }
}

#[async_trait]
impl TickRepository for SqliteTickRepository {
    async fn fetch_all(&self) -> Result<Vec<Tick>> {
        let rows = match &self.symbol {
            Some(symbol) => {
                sqlx::query(
                    "SELECT price, timestamp FROM price_ticks WHERE symbol = ? ORDER BY timestamp ASC, id ASC",
                )
                .bind(symbol)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT price, timestamp FROM price_ticks ORDER BY timestamp ASC, id ASC")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to fetch price ticks")?;

        let ticks = self.map_rows_to_ticks(rows)?;
        debug!("Successfully fetched {} rows from the database.", ticks.len());
        Ok(ticks)
    }

    async fn save(&self, symbol: &str, tick: &Tick) -> Result<()> {
        sqlx::query("INSERT INTO price_ticks (symbol, price, timestamp) VALUES (?, ?, ?)")
            .bind(symbol)
            .bind(tick.price)
            .bind(tick.timestamp.timestamp_millis())
            .execute(&self.pool)
            .await
            .context("Failed to save tick")?;
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let row = match &self.symbol {
            Some(symbol) => {
                sqlx::query("SELECT COUNT(*) as count FROM price_ticks WHERE symbol = ?")
                    .bind(symbol)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) as count FROM price_ticks")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}
