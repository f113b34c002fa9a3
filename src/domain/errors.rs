use thiserror::Error;

/// Why a training run ended without publishing a model.
///
/// Every variant is an expected outcome: the previously published model
/// (if any) stays in place and the server keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("Could not fetch data to train model: {reason}")]
    DataUnavailable { reason: String },

    #[error("Not enough data to train the model: {ticks} ticks gave {labeled_rows} labeled rows")]
    InsufficientData { ticks: usize, labeled_rows: usize },

    #[error("Training run did not finish within {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },

    #[error("Training worker failed: {reason}")]
    WorkerFailed { reason: String },
}

impl TrainingError {
    /// Short machine-readable reason reported to callers.
    pub fn reason(&self) -> &'static str {
        match self {
            TrainingError::DataUnavailable { .. } => "fetch_failed",
            TrainingError::InsufficientData { .. } => "insufficient_data",
            TrainingError::TimedOut { .. } => "timed_out",
            TrainingError::WorkerFailed { .. } => "internal",
        }
    }
}

/// Errors raised while fitting or querying a classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Unknown feature column: {column}")]
    UnknownColumn { column: String },

    #[error("Feature columns differ from the fitted model: expected {expected:?}, got {actual:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Matrix creation failed: {reason}")]
    Matrix { reason: String },

    #[error("Training error: {reason}")]
    Fit { reason: String },

    #[error("Prediction failed: {reason}")]
    Predict { reason: String },
}
