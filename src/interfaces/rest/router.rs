use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::ml::{ModelCache, PredictionService, TrainingService};

/// Application state shared across handlers
pub struct AppState {
    pub cache: Arc<ModelCache>,
    pub training: Arc<TrainingService>,
    pub prediction: Arc<PredictionService>,
}

impl AppState {
    /// Wire the serving path to the cache the training service publishes into.
    pub fn new(training: Arc<TrainingService>) -> Self {
        let cache = Arc::clone(training.cache());
        AppState {
            prediction: Arc::new(PredictionService::new(Arc::clone(&cache))),
            cache,
            training,
        }
    }
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/train", get(handlers::train))
        .route("/predict", post(handlers::predict))
        .route("/model", get(handlers::model_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
