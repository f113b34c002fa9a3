use super::feature_engineering::derive_features;
use super::model_cache::ModelCache;
use super::predictor::LABEL_UP;
use crate::domain::market::Tick;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Answer to a prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Prediction {
    Up,
    Down,
    /// No model has been published yet
    Training,
    /// Too few (or unusable) ticks to derive a feature row
    InsufficientData,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Up => write!(f, "UP"),
            Prediction::Down => write!(f, "DOWN"),
            Prediction::Training => write!(f, "TRAINING"),
            Prediction::InsufficientData => write!(f, "INSUFFICIENT_DATA"),
        }
    }
}

pub struct PredictionService {
    cache: Arc<ModelCache>,
}

impl PredictionService {
    pub fn new(cache: Arc<ModelCache>) -> Self {
        Self { cache }
    }

    /// Predict the direction following the most recent tick of `ticks`.
    ///
    /// Only the last complete feature row is scored. A window too short to
    /// derive any row reports `InsufficientData` whether or not a model exists.
    pub async fn predict(&self, ticks: &[Tick]) -> Prediction {
        if ticks.iter().any(|t| !t.is_valid()) {
            debug!("Rejecting window with non-finite prices");
            return Prediction::InsufficientData;
        }

        let rows = derive_features(ticks);
        let Some(latest) = rows.last() else {
            return Prediction::InsufficientData;
        };

        let snapshot = self.cache.read().await;
        let Some(model) = snapshot.model.as_ref() else {
            return Prediction::Training;
        };

        match model.predict_row(latest) {
            Ok(LABEL_UP) => Prediction::Up,
            Ok(_) => Prediction::Down,
            Err(e) => {
                warn!("Prediction failed: {}", e);
                Prediction::InsufficientData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::labeling::label;
    use crate::application::ml::trainer::{TrainerConfig, train};
    use chrono::{Duration, TimeZone, Utc};

    fn ticks(prices: impl IntoIterator<Item = f64>) -> Vec<Tick> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| Tick::new(start + Duration::minutes(i as i64), p))
            .collect()
    }

    async fn cache_with_constant_model(step: f64) -> Arc<ModelCache> {
        let history = ticks((0..40).map(|i| 10.0 + step * i as f64));
        let rows = label(&derive_features(&history), 10);
        let model = train(&rows, &TrainerConfig::default()).into_model().unwrap();
        let cache = Arc::new(ModelCache::new());
        cache.publish(model).await;
        cache
    }

    #[tokio::test]
    async fn test_ten_ticks_are_insufficient_regardless_of_cache() {
        let window = ticks((0..10).map(|i| 1.0 + i as f64));

        let empty = PredictionService::new(Arc::new(ModelCache::new()));
        assert_eq!(empty.predict(&window).await, Prediction::InsufficientData);

        let ready = PredictionService::new(cache_with_constant_model(0.5).await);
        assert_eq!(ready.predict(&window).await, Prediction::InsufficientData);
    }

    #[tokio::test]
    async fn test_empty_cache_reports_training() {
        let service = PredictionService::new(Arc::new(ModelCache::new()));
        let window = ticks((0..11).map(|i| 1.0 + i as f64));
        assert_eq!(service.predict(&window).await, Prediction::Training);
    }

    #[tokio::test]
    async fn test_maps_labels_to_directions() {
        let window = ticks((0..25).map(|i| 5.0 + i as f64 * 0.1));

        let up = PredictionService::new(cache_with_constant_model(0.5).await);
        assert_eq!(up.predict(&window).await, Prediction::Up);

        let down = PredictionService::new(cache_with_constant_model(-0.1).await);
        assert_eq!(down.predict(&window).await, Prediction::Down);
    }

    #[tokio::test]
    async fn test_non_finite_price_is_insufficient() {
        let service = PredictionService::new(cache_with_constant_model(0.5).await);
        let mut window = ticks((0..20).map(|i| 1.0 + i as f64));
        window[4].price = f64::NAN;
        assert_eq!(service.predict(&window).await, Prediction::InsufficientData);
    }

    #[test]
    fn test_prediction_wire_names() {
        assert_eq!(serde_json::to_string(&Prediction::Up).unwrap(), "\"UP\"");
        assert_eq!(
            serde_json::to_string(&Prediction::InsufficientData).unwrap(),
            "\"INSUFFICIENT_DATA\""
        );
        assert_eq!(Prediction::Training.to_string(), "TRAINING");
    }
}
