pub mod feature_engineering;
pub mod labeling;
pub mod model_cache;
pub mod prediction_service;
pub mod predictor;
pub mod smartcore_classifier;
pub mod trainer;
pub mod training_service;

pub use model_cache::{ModelCache, ModelSnapshot};
pub use prediction_service::{Prediction, PredictionService};
pub use training_service::{TrainingConfig, TrainingReport, TrainingService};
