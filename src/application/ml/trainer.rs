use super::predictor::{ConstantClassifier, DirectionClassifier, LABEL_UP};
use super::smartcore_classifier::{ForestParams, SmartCoreForest};
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::{FeatureRow, LabeledRow, feature_columns};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Training hyper-parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub forest: ForestParams,
    /// Share of rows (taken from the tail) held out for evaluation
    pub test_fraction: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_fraction: 0.2,
        }
    }
}

/// A fitted classifier with the columns it expects and its holdout accuracy.
pub struct TrainedModel {
    classifier: Box<dyn DirectionClassifier>,
    feature_columns: Vec<&'static str>,
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    pub fn feature_columns(&self) -> &[&'static str] {
        &self.feature_columns
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Class label for a single derived feature row.
    ///
    /// The row's inputs are selected with the serving schema's feature
    /// columns, which must equal the columns the model was fitted on.
    pub fn predict_row(&self, row: &FeatureRow) -> Result<i32, ModelError> {
        let columns = feature_columns(FeatureRow::COLUMNS);
        if columns != self.feature_columns {
            return Err(ModelError::ColumnMismatch {
                expected: self.feature_columns.iter().map(|c| c.to_string()).collect(),
                actual: columns.iter().map(|c| c.to_string()).collect(),
            });
        }

        let input = row.select(&columns)?;
        self.classifier
            .predict(&[input])?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Predict {
                reason: "No prediction returned".to_string(),
            })
    }
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("classifier", &self.classifier.name())
            .field("feature_columns", &self.feature_columns)
            .field("accuracy", &self.accuracy)
            .field("train_rows", &self.train_rows)
            .field("test_rows", &self.test_rows)
            .field("trained_at", &self.trained_at)
            .finish()
    }
}

#[derive(Debug)]
pub enum TrainOutcome {
    Trained(TrainedModel),
    /// Not enough labeled rows to fit and evaluate a model
    NoModel,
}

impl TrainOutcome {
    pub fn accuracy(&self) -> f64 {
        match self {
            TrainOutcome::Trained(model) => model.accuracy,
            TrainOutcome::NoModel => 0.0,
        }
    }

    pub fn into_model(self) -> Option<TrainedModel> {
        match self {
            TrainOutcome::Trained(model) => Some(model),
            TrainOutcome::NoModel => None,
        }
    }
}

/// Index splitting `n` time-ordered rows into train (`..split`) and test (`split..`).
///
/// The test partition takes `ceil(n * test_fraction)` rows from the tail.
pub fn split_index(n: usize, test_fraction: f64) -> usize {
    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    n - n_test.min(n)
}

/// Share of positions where `predicted` equals `actual`. Empty input scores 0.0.
pub fn accuracy_score(actual: &[i32], predicted: &[i32]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let hits = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a == p)
        .count();
    hits as f64 / actual.len() as f64
}

/// Fit a classifier on the head of `rows` and score it on the tail.
pub fn train(rows: &[LabeledRow], config: &TrainerConfig) -> TrainOutcome {
    if rows.is_empty() {
        info!("No labeled rows available, skipping training");
        return TrainOutcome::NoModel;
    }

    let split = split_index(rows.len(), config.test_fraction);
    let (train_rows, test_rows) = rows.split_at(split);
    if train_rows.is_empty() {
        info!(
            "Training partition empty ({} labeled rows), skipping training",
            rows.len()
        );
        return TrainOutcome::NoModel;
    }

    match fit_and_evaluate(train_rows, test_rows, config) {
        Ok(model) => {
            info!(
                "Model trained with accuracy: {:.4} ({} train / {} test rows, {})",
                model.accuracy,
                model.train_rows,
                model.test_rows,
                model.classifier_name()
            );
            TrainOutcome::Trained(model)
        }
        Err(e) => {
            warn!("Training failed: {}", e);
            TrainOutcome::NoModel
        }
    }
}

fn fit_and_evaluate(
    train_rows: &[LabeledRow],
    test_rows: &[LabeledRow],
    config: &TrainerConfig,
) -> Result<TrainedModel, ModelError> {
    let columns = feature_columns(LabeledRow::COLUMNS);

    let (x_train, y_train) = design_matrix(train_rows, &columns)?;
    let classifier: Box<dyn DirectionClassifier> = match single_class(&y_train) {
        Some(label) => {
            info!(
                "Training partition holds a single class ({}), using a constant classifier",
                if label == LABEL_UP { "UP" } else { "DOWN" }
            );
            Box::new(ConstantClassifier::new(label))
        }
        None => Box::new(SmartCoreForest::fit(&x_train, &y_train, &config.forest)?),
    };

    let (x_test, y_test) = design_matrix(test_rows, &columns)?;
    let predictions = classifier.predict(&x_test)?;

    Ok(TrainedModel {
        classifier,
        feature_columns: columns,
        accuracy: accuracy_score(&y_test, &predictions),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        trained_at: Utc::now(),
    })
}

fn design_matrix(
    rows: &[LabeledRow],
    columns: &[&str],
) -> Result<(Vec<Vec<f64>>, Vec<i32>), ModelError> {
    let mut x = Vec::with_capacity(rows.len());
    let mut y = Vec::with_capacity(rows.len());
    for row in rows {
        x.push(row.select(columns)?);
        y.push(i32::from(row.target));
    }
    Ok((x, y))
}

fn single_class(labels: &[i32]) -> Option<i32> {
    let first = *labels.first()?;
    labels.iter().all(|l| *l == first).then_some(first)
}
