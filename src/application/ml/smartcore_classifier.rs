use super::predictor::DirectionClassifier;
use crate::domain::errors::ModelError;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Hyper-parameters of the random forest
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: u16,
    pub max_depth: Option<u16>,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            seed: 42,
        }
    }
}

pub struct SmartCoreForest {
    model: Forest,
    n_trees: u16,
}

impl SmartCoreForest {
    /// Fit on `x` (one row per sample) against binary labels `y`.
    /// `y` must contain at least two distinct classes.
    pub fn fit(x: &Vec<Vec<f64>>, y: &Vec<i32>, params: &ForestParams) -> Result<Self, ModelError> {
        let matrix = DenseMatrix::from_2d_vec(x).map_err(|e| ModelError::Matrix {
            reason: e.to_string(),
        })?;

        let mut parameters = RandomForestClassifierParameters::default()
            .with_n_trees(params.n_trees.into())
            .with_seed(params.seed);
        if let Some(depth) = params.max_depth {
            parameters = parameters.with_max_depth(depth);
        }

        let model = Forest::fit(&matrix, y, parameters).map_err(|e| ModelError::Fit {
            reason: e.to_string(),
        })?;

        Ok(Self {
            model,
            n_trees: params.n_trees,
        })
    }

    pub fn n_trees(&self) -> u16 {
        self.n_trees
    }
}

impl DirectionClassifier for SmartCoreForest {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Matrix {
            reason: e.to_string(),
        })?;

        self.model.predict(&matrix).map_err(|e| ModelError::Predict {
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
