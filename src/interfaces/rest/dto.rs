use crate::application::ml::Prediction;
use crate::domain::market::Tick;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickDto {
    /// ISO-8601 instant; naive values are read as UTC
    pub timestamp: String,
    pub price: f64,
}

impl TickDto {
    pub fn to_tick(&self) -> Option<Tick> {
        let tick = Tick::new(parse_timestamp(&self.timestamp)?, self.price);
        tick.is_valid().then_some(tick)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub ticks: Vec<TickDto>,
}

impl PredictionRequest {
    /// Domain ticks, or `None` when any entry is malformed.
    pub fn to_ticks(&self) -> Option<Vec<Tick>> {
        self.ticks.iter().map(TickDto::to_tick).collect()
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TrainResponse {
    Trained { accuracy: f64 },
    Error { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub prediction: Prediction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelStatusResponse {
    pub ready: bool,
    pub accuracy: f64,
    pub trained_at: Option<DateTime<Utc>>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_columns: Vec<String>,
}
