use crate::domain::errors::ModelError;
use chrono::{DateTime, Utc};

/// Number of lag features (`lag_1` .. `lag_5`).
pub const LAG_COUNT: usize = 5;
/// Trailing window of `sma_5`.
pub const SHORT_SMA_WINDOW: usize = 5;
/// Trailing window of `sma_10`, the widest window a row depends on.
pub const LONG_SMA_WINDOW: usize = 10;
/// Fewest ticks a window must hold before any feature row is produced.
pub const MIN_TICKS: usize = LONG_SMA_WINDOW + 1;

/// Columns that identify or label a row and must never be fed to a model.
pub const IDENTITY_COLUMNS: &[&str] = &["id", "symbol", "timestamp", "price", "future_price", "target"];

/// Column layout of a derived feature row.
pub const FEATURE_ROW_COLUMNS: &[&str] = &[
    "timestamp",
    "price",
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_4",
    "lag_5",
    "sma_5",
    "sma_10",
];

/// Column layout of a labeled row: the feature row plus the look-ahead label.
pub const LABELED_ROW_COLUMNS: &[&str] = &[
    "timestamp",
    "price",
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_4",
    "lag_5",
    "sma_5",
    "sma_10",
    "future_price",
    "target",
];

/// Model input columns of a schema: everything except the identity columns.
///
/// Both the trainer and the prediction path select their inputs through this
/// function. Order follows the schema, so two schemas that share their
/// non-identity columns yield the same vector.
pub fn feature_columns(schema: &[&'static str]) -> Vec<&'static str> {
    schema
        .iter()
        .copied()
        .filter(|column| !IDENTITY_COLUMNS.contains(column))
        .collect()
}

/// Features derived from one tick and its trailing history.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub lag_1: f64,
    pub lag_2: f64,
    pub lag_3: f64,
    pub lag_4: f64,
    pub lag_5: f64,
    pub sma_5: f64,
    pub sma_10: f64,
}

impl FeatureRow {
    pub const COLUMNS: &'static [&'static str] = FEATURE_ROW_COLUMNS;

    /// Numeric value of a named column. `timestamp` is not numeric.
    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            "price" => Some(self.price),
            "lag_1" => Some(self.lag_1),
            "lag_2" => Some(self.lag_2),
            "lag_3" => Some(self.lag_3),
            "lag_4" => Some(self.lag_4),
            "lag_5" => Some(self.lag_5),
            "sma_5" => Some(self.sma_5),
            "sma_10" => Some(self.sma_10),
            _ => None,
        }
    }

    /// Values of `columns`, in that order.
    pub fn select(&self, columns: &[&str]) -> Result<Vec<f64>, ModelError> {
        columns
            .iter()
            .map(|column| {
                self.value(column).ok_or_else(|| ModelError::UnknownColumn {
                    column: column.to_string(),
                })
            })
            .collect()
    }
}

/// A feature row paired with the price observed `look_ahead` rows later.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub features: FeatureRow,
    pub future_price: f64,
    /// 1 when `future_price` is strictly above the row's price, else 0.
    pub target: u8,
}

impl LabeledRow {
    pub const COLUMNS: &'static [&'static str] = LABELED_ROW_COLUMNS;

    pub fn new(features: FeatureRow, future_price: f64) -> Self {
        let target = u8::from(future_price > features.price);
        Self {
            features,
            future_price,
            target,
        }
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            "future_price" => Some(self.future_price),
            "target" => Some(f64::from(self.target)),
            _ => self.features.value(column),
        }
    }

    pub fn select(&self, columns: &[&str]) -> Result<Vec<f64>, ModelError> {
        columns
            .iter()
            .map(|column| {
                self.value(column).ok_or_else(|| ModelError::UnknownColumn {
                    column: column.to_string(),
                })
            })
            .collect()
    }
}
