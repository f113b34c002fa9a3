use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::AppState;
use super::dto::*;
use crate::application::ml::Prediction;
use crate::domain::market::tick::sort_by_time;

/// GET /
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "ML Service is running".to_string(),
    })
}

/// GET /train
pub async fn train(State(state): State<Arc<AppState>>) -> Json<TrainResponse> {
    info!("Training requested");
    // Detached so the run still publishes if the client goes away.
    let training = Arc::clone(&state.training);
    let run = tokio::spawn(async move { training.run_training().await });

    let response = match run.await {
        Ok(Ok(report)) => TrainResponse::Trained {
            accuracy: report.accuracy,
        },
        Ok(Err(e)) => TrainResponse::Error {
            reason: e.reason().to_string(),
        },
        Err(e) => {
            error!("Training task failed: {}", e);
            TrainResponse::Error {
                reason: "internal".to_string(),
            }
        }
    };
    Json(response)
}

/// POST /predict
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictionRequest>,
) -> Json<PredictionResponse> {
    let prediction = match req.to_ticks() {
        Some(mut ticks) => {
            sort_by_time(&mut ticks);
            state.prediction.predict(&ticks).await
        }
        None => {
            warn!("Prediction request carried malformed ticks");
            Prediction::InsufficientData
        }
    };
    Json(PredictionResponse { prediction })
}

/// GET /model
pub async fn model_status(State(state): State<Arc<AppState>>) -> Json<ModelStatusResponse> {
    let snapshot = state.cache.read().await;
    let response = match snapshot.model.as_ref() {
        Some(model) => ModelStatusResponse {
            ready: true,
            accuracy: snapshot.accuracy,
            trained_at: Some(model.trained_at),
            train_rows: model.train_rows,
            test_rows: model.test_rows,
            feature_columns: model
                .feature_columns()
                .iter()
                .map(|c| c.to_string())
                .collect(),
        },
        None => ModelStatusResponse {
            ready: false,
            accuracy: snapshot.accuracy,
            trained_at: None,
            train_rows: 0,
            test_rows: 0,
            feature_columns: Vec::new(),
        },
    };
    Json(response)
}
