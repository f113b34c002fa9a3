//! Training pipeline configuration parsing from environment variables.
//!
//! Covers the label horizon, forest hyper-parameters, holdout size and the
//! startup / timeout policy of the training orchestrator.

use crate::application::ml::TrainingConfig;
use crate::application::ml::smartcore_classifier::ForestParams;
use crate::application::ml::trainer::TrainerConfig;
use anyhow::{Context, Result, bail};
use std::str::FromStr;
use std::time::Duration;

/// Training environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEnvConfig {
    pub look_ahead: usize,
    pub n_trees: u16,
    pub max_depth: Option<u16>,
    pub random_seed: u64,
    pub test_fraction: f64,
    pub startup_delay_secs: u64,
    pub timeout_secs: Option<u64>,
}

impl Default for TrainingEnvConfig {
    fn default() -> Self {
        Self {
            look_ahead: 10,
            n_trees: 100,
            max_depth: None,
            random_seed: 42,
            test_fraction: 0.2,
            startup_delay_secs: 15,
            timeout_secs: None,
        }
    }
}

impl TrainingEnvConfig {
    pub fn load(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            look_ahead: parse_or(&var, "LOOK_AHEAD", defaults.look_ahead)?,
            n_trees: parse_or(&var, "N_TREES", defaults.n_trees)?,
            max_depth: parse_opt(&var, "MAX_DEPTH")?,
            random_seed: parse_or(&var, "RANDOM_SEED", defaults.random_seed)?,
            test_fraction: parse_or(&var, "TEST_FRACTION", defaults.test_fraction)?,
            startup_delay_secs: parse_or(
                &var,
                "STARTUP_TRAINING_DELAY_SECS",
                defaults.startup_delay_secs,
            )?,
            timeout_secs: parse_opt(&var, "TRAINING_TIMEOUT_SECS")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.look_ahead == 0 {
            bail!("LOOK_AHEAD must be at least 1");
        }
        if self.n_trees == 0 {
            bail!("N_TREES must be at least 1");
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            bail!(
                "TEST_FRACTION must be between 0 and 1 (exclusive), got {}",
                self.test_fraction
            );
        }
        if self.timeout_secs == Some(0) {
            bail!("TRAINING_TIMEOUT_SECS must be positive when set");
        }
        Ok(())
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn to_training_config(&self) -> TrainingConfig {
        TrainingConfig {
            look_ahead: self.look_ahead,
            trainer: TrainerConfig {
                forest: ForestParams {
                    n_trees: self.n_trees,
                    max_depth: self.max_depth,
                    seed: self.random_seed,
                },
                test_fraction: self.test_fraction,
            },
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .context(format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

fn parse_opt<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|raw| raw.trim().parse::<T>().context(format!("Failed to parse {}", key)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_training_config_defaults() {
        let config = TrainingEnvConfig::load(vars(&[])).unwrap();
        assert_eq!(config, TrainingEnvConfig::default());

        let training = config.to_training_config();
        assert_eq!(training.look_ahead, 10);
        assert_eq!(training.trainer.forest.n_trees, 100);
        assert_eq!(training.trainer.forest.seed, 42);
        assert_eq!(training.trainer.test_fraction, 0.2);
        assert_eq!(training.timeout, None);
    }

    #[test]
    fn test_training_config_overrides() {
        let config = TrainingEnvConfig::load(vars(&[
            ("LOOK_AHEAD", "5"),
            ("N_TREES", "25"),
            ("MAX_DEPTH", "8"),
            ("TRAINING_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.look_ahead, 5);
        assert_eq!(config.max_depth, Some(8));
        assert_eq!(
            config.to_training_config().timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_training_config_validation() {
        assert!(TrainingEnvConfig::load(vars(&[("LOOK_AHEAD", "0")])).is_err());
        assert!(TrainingEnvConfig::load(vars(&[("N_TREES", "0")])).is_err());
        assert!(TrainingEnvConfig::load(vars(&[("TEST_FRACTION", "1.0")])).is_err());
        assert!(TrainingEnvConfig::load(vars(&[("TEST_FRACTION", "abc")])).is_err());
    }
}
