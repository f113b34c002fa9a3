//! Process-wide slot holding the model currently used for serving.
//!
//! A training run builds its [`TrainedModel`] entirely outside the cache and
//! then swaps a new immutable [`ModelSnapshot`] in. Readers clone the
//! snapshot handle, so the write lock is only held for a pointer swap and a
//! reader always sees the model and its accuracy from the same run.

use super::trainer::TrainedModel;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// The model and accuracy published together by one training run.
#[derive(Debug, Clone, Default)]
pub struct ModelSnapshot {
    pub model: Option<Arc<TrainedModel>>,
    pub accuracy: f64,
}

impl ModelSnapshot {
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ModelCache {
    current: RwLock<Arc<ModelSnapshot>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active model. Last write wins; no history is kept.
    pub async fn publish(&self, model: TrainedModel) -> Arc<ModelSnapshot> {
        let snapshot = Arc::new(ModelSnapshot {
            accuracy: model.accuracy,
            model: Some(Arc::new(model)),
        });

        *self.current.write().await = Arc::clone(&snapshot);
        info!("Published model with accuracy {:.4}", snapshot.accuracy);
        snapshot
    }

    /// Current snapshot; `(empty, 0.0)` until the first publish.
    pub async fn read(&self) -> Arc<ModelSnapshot> {
        Arc::clone(&*self.current.read().await)
    }
}
