use crate::domain::errors::ModelError;

/// Class label for "price ends higher"
pub const LABEL_UP: i32 = 1;
/// Class label for "price ends equal or lower"
pub const LABEL_DOWN: i32 = 0;

/// Interface for fitted direction classifiers
pub trait DirectionClassifier: Send + Sync {
    /// One class label (0 or 1) per input row.
    /// Rows must follow the column order the classifier was fitted on.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Answers a single class for every input.
///
/// Used when the training partition holds only one class, which a forest
/// cannot be fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantClassifier {
    label: i32,
}

impl ConstantClassifier {
    pub fn new(label: i32) -> Self {
        Self { label }
    }

    pub fn label(&self) -> i32 {
        self.label
    }
}

impl DirectionClassifier for ConstantClassifier {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>, ModelError> {
        Ok(vec![self.label; rows.len()])
    }

    fn name(&self) -> &str {
        "Constant"
    }
}
