use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{DriverErr, Result};

/// The model to train and its hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelConfig {
    Rbm {
        hidden: usize,
        k: usize,
        beta: f64,
        learning_rate: f64,
        iterations: usize,
    },
    LinearRegression {
        learning_rate: f64,
        iterations: usize,
    },
    LogisticRegression {
        learning_rate: f64,
        iterations: usize,
        threshold: f64,
    },
    SoftmaxRegression {
        learning_rate: f64,
        iterations: usize,
    },
}

/// Where the training examples come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetConfig {
    /// A pair of MNIST files, optionally only the first `limit` pairs.
    Mnist {
        labels: PathBuf,
        images: PathBuf,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Noise-free data drawn from a random generating model of the same kind as
    /// the one being trained.
    Synthetic {
        features: usize,
        #[serde(default = "default_classes")]
        classes: usize,
        samples: usize,
        holdout: usize,
    },
    /// `examples` copies of a binary vector with its first `active` units on.
    Pattern {
        visible: usize,
        active: usize,
        examples: usize,
    },
}

fn default_classes() -> usize {
    2
}

/// A whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub model: ModelConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DriverConfig {
    /// Reads and validates a JSON configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(DriverErr::InvalidConfig(msg.to_string()));

        let learning_rate = match self.model {
            ModelConfig::Rbm {
                hidden,
                learning_rate,
                ..
            } => {
                if hidden == 0 {
                    return invalid("an rbm needs at least one hidden unit");
                }
                learning_rate
            }
            ModelConfig::LinearRegression { learning_rate, .. }
            | ModelConfig::LogisticRegression { learning_rate, .. }
            | ModelConfig::SoftmaxRegression { learning_rate, .. } => learning_rate,
        };

        if !learning_rate.is_finite() {
            return invalid("the learning rate must be finite");
        }

        match self.dataset {
            DatasetConfig::Mnist { limit: Some(0), .. } => {
                invalid("an mnist limit of zero leaves nothing to train on")
            }
            DatasetConfig::Mnist { .. } => Ok(()),
            DatasetConfig::Synthetic {
                features,
                classes,
                samples,
                holdout,
            } => {
                if features == 0 || samples == 0 || holdout == 0 {
                    return invalid("synthetic features, samples and holdout must be positive");
                }
                if classes < 2 {
                    return invalid("synthetic data needs at least two classes");
                }
                Ok(())
            }
            DatasetConfig::Pattern {
                visible,
                active,
                examples,
            } => {
                if visible == 0 || examples == 0 {
                    return invalid("a pattern needs visible units and examples");
                }
                if active > visible {
                    return invalid("a pattern can't have more active units than visible ones");
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_rbm_run() {
        let raw = r#"{
            "model": { "rbm": { "hidden": 20, "k": 2, "beta": 2.0, "learning_rate": 0.001, "iterations": 1000 } },
            "dataset": { "pattern": { "visible": 10, "active": 4, "examples": 5 } },
            "seed": 7
        }"#;

        let config = DriverConfig::from_json(raw).unwrap();

        assert_eq!(
            config.model,
            ModelConfig::Rbm {
                hidden: 20,
                k: 2,
                beta: 2.0,
                learning_rate: 0.001,
                iterations: 1000,
            }
        );
        assert_eq!(
            config.dataset,
            DatasetConfig::Pattern {
                visible: 10,
                active: 4,
                examples: 5,
            }
        );
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn optional_fields_have_defaults() {
        let raw = r#"{
            "model": { "softmax_regression": { "learning_rate": 0.1, "iterations": 10 } },
            "dataset": { "mnist": { "labels": "l", "images": "i" } }
        }"#;

        let config = DriverConfig::from_json(raw).unwrap();

        assert_eq!(config.seed, None);
        assert!(matches!(config.dataset, DatasetConfig::Mnist { limit: None, .. }));

        let raw = r#"{
            "model": { "linear_regression": { "learning_rate": 0.1, "iterations": 10 } },
            "dataset": { "synthetic": { "features": 3, "samples": 10, "holdout": 5 } }
        }"#;

        let config = DriverConfig::from_json(raw).unwrap();
        assert!(matches!(config.dataset, DatasetConfig::Synthetic { classes: 2, .. }));
    }

    #[test]
    fn unknown_models_are_malformed() {
        let raw = r#"{
            "model": { "perceptron": { "learning_rate": 0.1 } },
            "dataset": { "pattern": { "visible": 1, "active": 1, "examples": 1 } }
        }"#;

        assert!(matches!(DriverConfig::from_json(raw), Err(DriverErr::Json(_))));
    }

    #[test]
    fn impossible_values_are_rejected() {
        let raw = r#"{
            "model": { "rbm": { "hidden": 4, "k": 1, "beta": 1.0, "learning_rate": 0.1, "iterations": 1 } },
            "dataset": { "pattern": { "visible": 3, "active": 4, "examples": 2 } }
        }"#;
        assert!(matches!(
            DriverConfig::from_json(raw),
            Err(DriverErr::InvalidConfig(_))
        ));

        let raw = r#"{
            "model": { "rbm": { "hidden": 0, "k": 1, "beta": 1.0, "learning_rate": 0.1, "iterations": 1 } },
            "dataset": { "pattern": { "visible": 3, "active": 1, "examples": 2 } }
        }"#;
        assert!(matches!(
            DriverConfig::from_json(raw),
            Err(DriverErr::InvalidConfig(_))
        ));

        let raw = r#"{
            "model": { "softmax_regression": { "learning_rate": 0.1, "iterations": 1 } },
            "dataset": { "synthetic": { "features": 3, "classes": 1, "samples": 4, "holdout": 2 } }
        }"#;
        assert!(matches!(
            DriverConfig::from_json(raw),
            Err(DriverErr::InvalidConfig(_))
        ));
    }
}
