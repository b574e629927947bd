use log::{debug, trace, warn};
use ndarray::ArrayView1;

use crate::{Result, dataset::Dataset, random::RandomSource};

/// A model trained one example at a time.
pub trait OnlineModel {
    /// Takes a single update step on one example.
    ///
    /// # Arguments
    /// * `x` - The input.
    /// * `y` - The expected output.
    ///
    /// # Returns
    /// The loss on this example *before* the update, or an error if the example
    /// doesn't fit the model's dimensions.
    fn step(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64>;
}

/// Trains `model` with `iterations` examples drawn uniformly from `dataset`.
///
/// # Arguments
/// * `model` - The model that will be trained.
/// * `dataset` - The examples to draw from.
/// * `iterations` - The amount of update steps.
/// * `rng` - The random source picking the examples.
///
/// # Returns
/// The mean loss over all steps.
pub fn train<M, R>(
    model: &mut M,
    dataset: &Dataset<'_>,
    iterations: usize,
    rng: &mut R,
) -> Result<f64>
where
    M: OnlineModel,
    R: RandomSource,
{
    if iterations == 0 {
        warn!("training requested with zero iterations");
        return Ok(0.0);
    }

    debug!(iterations = iterations, examples = dataset.len(); "online training started");

    let report_every = (iterations / 10).max(1);
    let mut total_loss = 0.0;

    for (i, (x, y)) in dataset.draws(rng, iterations).enumerate() {
        let loss = model.step(x, y)?;
        total_loss += loss;

        if (i + 1) % report_every == 0 {
            trace!(iteration = i + 1, loss = loss; "online training progress");
        }
    }

    let mean_loss = total_loss / iterations as f64;
    debug!(mean_loss = mean_loss; "online training finished");

    Ok(mean_loss)
}
