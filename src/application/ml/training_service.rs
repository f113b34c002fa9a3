use super::feature_engineering::derive_features;
use super::labeling::{DEFAULT_LOOK_AHEAD, label};
use super::model_cache::ModelCache;
use super::trainer::{TrainOutcome, TrainerConfig, train};
use crate::domain::errors::TrainingError;
use crate::domain::market::Tick;
use crate::domain::repositories::TickRepository;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub look_ahead: usize,
    pub trainer: TrainerConfig,
    /// Upper bound for one run; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            look_ahead: DEFAULT_LOOK_AHEAD,
            trainer: TrainerConfig::default(),
            timeout: None,
        }
    }
}

/// Summary of a successful training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub ticks: usize,
    pub labeled_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Drives fetch -> derive -> label -> train -> publish.
pub struct TrainingService {
    repository: Arc<dyn TickRepository>,
    cache: Arc<ModelCache>,
    config: TrainingConfig,
}

impl TrainingService {
    pub fn new(
        repository: Arc<dyn TickRepository>,
        cache: Arc<ModelCache>,
        config: TrainingConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    /// Retrain from the full history and publish the result.
    ///
    /// On any error the cache keeps whatever model it held before.
    pub async fn run_training(&self) -> Result<TrainingReport, TrainingError> {
        let result = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.train_and_publish())
                .await
                .unwrap_or(Err(TrainingError::TimedOut {
                    timeout_secs: limit.as_secs(),
                })),
            None => self.train_and_publish().await,
        };

        match &result {
            Ok(report) => info!(
                "Training finished: accuracy={:.4}, ticks={}, labeled_rows={}",
                report.accuracy, report.ticks, report.labeled_rows
            ),
            Err(e) => warn!("Training run aborted ({}): {}", e.reason(), e),
        }
        result
    }

    /// Run one training pass in the background after `delay`.
    ///
    /// The outcome is only logged; nobody observes it. Dropping the handle
    /// does not cancel the task.
    pub fn spawn_startup_training(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            info!("Startup training scheduled in {:?}", delay);
            tokio::time::sleep(delay).await;
            if let Err(e) = service.run_training().await {
                warn!("Startup training produced no model: {}", e);
            }
        })
    }

    async fn train_and_publish(&self) -> Result<TrainingReport, TrainingError> {
        let ticks = self.fetch_ticks().await?;
        let tick_count = ticks.len();
        info!("Fetched {} ticks for training", tick_count);

        let look_ahead = self.config.look_ahead;
        let trainer = self.config.trainer.clone();
        let (outcome, labeled_rows) =
            tokio::task::spawn_blocking(move || build_model(&ticks, look_ahead, &trainer))
                .await
                .map_err(|e| {
                    error!("Training worker panicked: {}", e);
                    TrainingError::WorkerFailed {
                        reason: e.to_string(),
                    }
                })?;

        let model = outcome
            .into_model()
            .ok_or(TrainingError::InsufficientData {
                ticks: tick_count,
                labeled_rows,
            })?;

        let report = TrainingReport {
            accuracy: model.accuracy,
            ticks: tick_count,
            labeled_rows,
            train_rows: model.train_rows,
            test_rows: model.test_rows,
        };
        self.cache.publish(model).await;
        Ok(report)
    }

    async fn fetch_ticks(&self) -> Result<Vec<Tick>, TrainingError> {
        let mut ticks = self.repository.fetch_all().await.map_err(|e| {
            error!("Error fetching ticks: {:#}", e);
            TrainingError::DataUnavailable {
                reason: e.to_string(),
            }
        })?;

        // A single non-finite price would poison every later moving average.
        let fetched = ticks.len();
        ticks.retain(Tick::is_valid);
        if ticks.len() < fetched {
            warn!(
                "Dropped {} stored ticks with non-finite prices",
                fetched - ticks.len()
            );
        }

        if ticks.is_empty() {
            return Err(TrainingError::DataUnavailable {
                reason: "data source returned no ticks".to_string(),
            });
        }
        Ok(ticks)
    }
}

/// CPU-bound part of a run. Returns the outcome and the labeled row count.
pub fn build_model(
    ticks: &[Tick],
    look_ahead: usize,
    config: &TrainerConfig,
) -> (TrainOutcome, usize) {
    let features = derive_features(ticks);
    let labeled = label(&features, look_ahead);
    let outcome = train(&labeled, config);
    (outcome, labeled.len())
}
