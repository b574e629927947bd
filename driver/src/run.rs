use std::{fmt, path::Path};

use log::info;
use machine_learning::{
    arch::{
        Rbm,
        activations::softmax,
        regression::{LinearRegression, LogisticRegression, SoftmaxRegression},
    },
    dataset::synthetic,
    random::generate_rng,
};
use mnist::{MnistPair, MnistReader, render};
use ndarray::{Array1, Array2, Axis, s};
use rand::{Rng, rngs::StdRng};

use crate::{
    DriverErr, Result,
    config::{DatasetConfig, DriverConfig, ModelConfig},
};

/// Inverse temperatures of the hidden and visible passes of a reconstruction.
const RECONSTRUCT_HIDDEN_BETA: f64 = 3.0;
const RECONSTRUCT_VISIBLE_BETA: f64 = 5.0;

const DIGITS: usize = 10;

/// What a finished run reports.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// An observation next to what a trained RBM makes of it.
    Reconstruction {
        rows: usize,
        cols: usize,
        input: Array1<f64>,
        output: Array1<f64>,
    },
    /// The mean absolute error over held-out examples.
    HeldOutError {
        model: &'static str,
        average: f64,
        total: usize,
    },
    /// How many held-out examples were classified right.
    HeldOutAccuracy {
        model: &'static str,
        correct: usize,
        total: usize,
        average_error: Option<f64>,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Reconstruction {
                rows,
                cols,
                input,
                output,
            } => {
                writeln!(f, "input:")?;
                write!(f, "{}", render(input.view(), *rows, *cols))?;
                writeln!(f, "reconstruction:")?;
                write!(f, "{}", render(output.view(), *rows, *cols))
            }
            Outcome::HeldOutError {
                model,
                average,
                total,
            } => write!(f, "{model}: avg_error = {average:.6} over {total} examples"),
            Outcome::HeldOutAccuracy {
                model,
                correct,
                total,
                average_error,
            } => {
                write!(f, "{model}: {correct} / {total} correct")?;
                if let Some(error) = average_error {
                    write!(f, ", avg_error = {error:.6}")?;
                }
                Ok(())
            }
        }
    }
}

/// Trains the configured model on the configured dataset and evaluates it.
///
/// # Returns
/// The outcome of the run, or an error if the model can't be trained on that kind
/// of dataset or if training fails.
pub fn run(config: &DriverConfig) -> Result<Outcome> {
    let mut rng = generate_rng(config.seed);

    match (config.model, &config.dataset) {
        (
            ModelConfig::Rbm {
                hidden,
                k,
                beta,
                learning_rate,
                iterations,
            },
            DatasetConfig::Pattern {
                visible,
                active,
                examples,
            },
        ) => {
            let mut x = Array2::zeros((*visible, *examples));
            x.slice_mut(s![..*active, ..]).fill(1.0);

            let mut rbm = Rbm::new(*visible, hidden, rng);
            info!(visible = *visible, hidden = hidden; "training rbm on a pattern");
            rbm.cd(k, x.view(), iterations, beta, learning_rate)?;

            let input = Array1::ones(*visible);
            let output = rbm
                .reconstruct(
                    input.view(),
                    RECONSTRUCT_HIDDEN_BETA,
                    RECONSTRUCT_VISIBLE_BETA,
                )?
                .to_owned();

            Ok(Outcome::Reconstruction {
                rows: 1,
                cols: *visible,
                input,
                output,
            })
        }
        (
            ModelConfig::Rbm {
                hidden,
                k,
                beta,
                learning_rate,
                iterations,
            },
            DatasetConfig::Mnist {
                labels,
                images,
                limit,
            },
        ) => {
            let (pairs, rows, cols) = read_mnist(labels, images, *limit)?;
            let x = images_matrix(&pairs, rows * cols);

            let mut rbm = Rbm::new(rows * cols, hidden, rng);
            info!(images = pairs.len(), hidden = hidden; "training rbm on mnist");
            rbm.cd(k, x.view(), iterations, beta, learning_rate)?;

            let input = x.column(0).to_owned();
            let output = rbm
                .reconstruct(
                    input.view(),
                    RECONSTRUCT_HIDDEN_BETA,
                    RECONSTRUCT_VISIBLE_BETA,
                )?
                .to_owned();

            Ok(Outcome::Reconstruction {
                rows,
                cols,
                input,
                output,
            })
        }
        (
            ModelConfig::LinearRegression {
                learning_rate,
                iterations,
            },
            DatasetConfig::Synthetic {
                features,
                samples,
                holdout,
                ..
            },
        ) => {
            let (weights, bias) = random_plane(*features, &mut rng);
            let (x, y) = synthetic::linear(weights.view(), bias, *samples, &mut rng);

            info!(features = *features, samples = *samples; "training linear regression");
            let model =
                LinearRegression::fit(x.view(), y.view(), learning_rate, iterations, &mut rng)?;

            let (x, y) = synthetic::linear(weights.view(), bias, *holdout, &mut rng);
            let mut error = 0.0;
            for (x, &y) in x.outer_iter().zip(&y) {
                error += (model.predict(x)? - y).abs();
            }

            Ok(Outcome::HeldOutError {
                model: "linear_regression",
                average: error / *holdout as f64,
                total: *holdout,
            })
        }
        (
            ModelConfig::LogisticRegression {
                learning_rate,
                iterations,
                threshold,
            },
            DatasetConfig::Synthetic {
                features,
                samples,
                holdout,
                ..
            },
        ) => {
            let (weights, bias) = random_plane(*features, &mut rng);
            let (x, y) = synthetic::logistic(weights.view(), bias, *samples, &mut rng);

            info!(features = *features, samples = *samples; "training logistic regression");
            let model =
                LogisticRegression::fit(x.view(), y.view(), learning_rate, iterations, &mut rng)?;

            let (x, y) = synthetic::logistic(weights.view(), bias, *holdout, &mut rng);
            let mut error = 0.0;
            let mut correct = 0;
            for (x, &y) in x.outer_iter().zip(&y) {
                error += (model.predict(x)? - y).abs();
                if model.classify(x, threshold)? == (y > threshold) {
                    correct += 1;
                }
            }

            Ok(Outcome::HeldOutAccuracy {
                model: "logistic_regression",
                correct,
                total: *holdout,
                average_error: Some(error / *holdout as f64),
            })
        }
        (
            ModelConfig::SoftmaxRegression {
                learning_rate,
                iterations,
            },
            DatasetConfig::Synthetic {
                features,
                classes,
                samples,
                holdout,
            },
        ) => {
            let theta = synthetic::uniform_features(*features, *classes, &mut rng);
            let (x, y) = synthetic::softmax_classes(theta.view(), *samples, &mut rng);

            info!(features = *features, classes = *classes, samples = *samples; "training softmax regression");
            let model =
                SoftmaxRegression::fit(x.view(), y.view(), learning_rate, iterations, &mut rng)?;

            let (x, y) = synthetic::softmax_classes(theta.view(), *holdout, &mut rng);
            let mut error = 0.0;
            let mut correct = 0;
            for (x, y) in x.axis_iter(Axis(1)).zip(y.axis_iter(Axis(1))) {
                let expected = softmax(theta.t().dot(&x).view());
                let p = model.probabilities(x)?;
                error += (&expected - &p).mapv(f64::abs).sum();
                if y[model.classify(x)?] == 1.0 {
                    correct += 1;
                }
            }

            Ok(Outcome::HeldOutAccuracy {
                model: "softmax_regression",
                correct,
                total: *holdout,
                average_error: Some(error / *holdout as f64),
            })
        }
        (
            ModelConfig::SoftmaxRegression {
                learning_rate,
                iterations,
            },
            DatasetConfig::Mnist {
                labels,
                images,
                limit,
            },
        ) => {
            let (pairs, rows, cols) = read_mnist(labels, images, *limit)?;
            let held_out = pairs.len() / 10;
            if held_out == 0 {
                return Err(DriverErr::InvalidConfig(
                    "at least ten mnist pairs are needed to hold some out".to_string(),
                ));
            }

            let (train, test) = pairs.split_at(pairs.len() - held_out);
            let x = images_matrix(train, rows * cols);
            let digits: Vec<usize> = train.iter().map(|pair| pair.label as usize).collect();
            let y = synthetic::one_hot(&digits, DIGITS)?;

            info!(train = train.len(), held_out = held_out; "training softmax regression on mnist");
            let model =
                SoftmaxRegression::fit(x.view(), y.view(), learning_rate, iterations, &mut rng)?;

            let mut correct = 0;
            for pair in test {
                if model.classify(pair.image.view())? == pair.label as usize {
                    correct += 1;
                }
            }

            Ok(Outcome::HeldOutAccuracy {
                model: "softmax_regression",
                correct,
                total: held_out,
                average_error: None,
            })
        }
        (model, dataset) => Err(DriverErr::InvalidConfig(format!(
            "{} can't be trained on a {} dataset",
            model_name(&model),
            dataset_name(dataset)
        ))),
    }
}

/// Draws the weights and intercept of a generating model, all uniform in `[0, 1)`.
fn random_plane(features: usize, rng: &mut StdRng) -> (Array1<f64>, f64) {
    let weights = Array1::from_shape_simple_fn(features, || rng.random());
    let bias = rng.random();
    (weights, bias)
}

fn read_mnist(
    labels: &Path,
    images: &Path,
    limit: Option<usize>,
) -> Result<(Vec<MnistPair>, usize, usize)> {
    let reader = MnistReader::open(labels, images)?;
    let (rows, cols) = (reader.rows(), reader.cols());
    let limit = limit.unwrap_or(reader.len());

    let pairs = reader.take(limit).collect::<mnist::Result<Vec<_>>>()?;
    if pairs.is_empty() {
        return Err(DriverErr::InvalidConfig(
            "the mnist files hold no pairs".to_string(),
        ));
    }

    info!(pairs = pairs.len(), rows = rows, cols = cols; "read mnist");
    Ok((pairs, rows, cols))
}

/// Lays the images out as the columns of a `pixels x N` matrix.
fn images_matrix(pairs: &[MnistPair], pixels: usize) -> Array2<f64> {
    let mut x = Array2::zeros((pixels, pairs.len()));
    for (mut column, pair) in x.axis_iter_mut(Axis(1)).zip(pairs) {
        column.assign(&pair.image);
    }
    x
}

fn model_name(model: &ModelConfig) -> &'static str {
    match model {
        ModelConfig::Rbm { .. } => "rbm",
        ModelConfig::LinearRegression { .. } => "linear_regression",
        ModelConfig::LogisticRegression { .. } => "logistic_regression",
        ModelConfig::SoftmaxRegression { .. } => "softmax_regression",
    }
}

fn dataset_name(dataset: &DatasetConfig) -> &'static str {
    match dataset {
        DatasetConfig::Mnist { .. } => "mnist",
        DatasetConfig::Synthetic { .. } => "synthetic",
        DatasetConfig::Pattern { .. } => "pattern",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(raw: &str) -> DriverConfig {
        DriverConfig::from_json(raw).unwrap()
    }

    #[test]
    fn rbm_reconstructs_a_pattern() {
        let config = config(
            r#"{
                "model": { "rbm": { "hidden": 6, "k": 1, "beta": 1.0, "learning_rate": 0.01, "iterations": 200 } },
                "dataset": { "pattern": { "visible": 8, "active": 3, "examples": 4 } },
                "seed": 3
            }"#,
        );

        let Outcome::Reconstruction {
            rows,
            cols,
            input,
            output,
        } = run(&config).unwrap()
        else {
            panic!("expected a reconstruction");
        };

        assert_eq!((rows, cols), (1, 8));
        assert_eq!(input, Array1::<f64>::ones(8));
        assert_eq!(output.len(), 8);
        assert!(output.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn linear_regression_reports_a_small_error() {
        let config = config(
            r#"{
                "model": { "linear_regression": { "learning_rate": 0.01, "iterations": 100000 } },
                "dataset": { "synthetic": { "features": 2, "samples": 200, "holdout": 20 } },
                "seed": 11
            }"#,
        );

        let Outcome::HeldOutError { average, total, .. } = run(&config).unwrap() else {
            panic!("expected a held-out error");
        };

        assert_eq!(total, 20);
        assert!(average < 0.05, "average error {average}");
    }

    #[test]
    fn softmax_on_synthetic_counts_every_held_out_example() {
        let config = config(
            r#"{
                "model": { "softmax_regression": { "learning_rate": 0.1, "iterations": 2000 } },
                "dataset": { "synthetic": { "features": 3, "classes": 4, "samples": 50, "holdout": 25 } },
                "seed": 5
            }"#,
        );

        let Outcome::HeldOutAccuracy {
            correct,
            total,
            average_error,
            ..
        } = run(&config).unwrap()
        else {
            panic!("expected a held-out accuracy");
        };

        assert_eq!(total, 25);
        assert!(correct <= total);
        assert!(average_error.is_some());
    }

    #[test]
    fn unsupported_pairings_are_invalid() {
        let config = config(
            r#"{
                "model": { "rbm": { "hidden": 2, "k": 1, "beta": 1.0, "learning_rate": 0.1, "iterations": 1 } },
                "dataset": { "synthetic": { "features": 2, "samples": 4, "holdout": 2 } }
            }"#,
        );

        assert!(matches!(run(&config), Err(DriverErr::InvalidConfig(_))));
    }

    #[test]
    fn outcomes_print_like_a_report() {
        let outcome = Outcome::HeldOutAccuracy {
            model: "softmax_regression",
            correct: 9,
            total: 10,
            average_error: None,
        };
        assert_eq!(outcome.to_string(), "softmax_regression: 9 / 10 correct");

        let outcome = Outcome::Reconstruction {
            rows: 1,
            cols: 2,
            input: ndarray::array![1.0, 0.0],
            output: ndarray::array![0.0, 1.0],
        };
        assert_eq!(outcome.to_string(), "input:\n# \nreconstruction:\n #\n");
    }
}
