use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::RandomExt;
use rand::{Rng, rngs::StdRng};
use rand_distr::StandardNormal;

use super::activations::Sigmoid;
use crate::{
    MlErr, Result,
    optimization::{DecayedMomentum, Optimizer},
    random::RandomSource,
};

/// Fraction of the accumulated momentum kept after each contrastive divergence step.
pub const MOMENTUM_DECAY: f64 = 0.4;

/// A Restricted Boltzmann Machine trained with contrastive divergence, CD(k).
///
/// `theta` couples the `V` visible units with the `H` hidden ones and is laid out as a
/// `V x H` matrix. The machine owns its random source, every sampling call draws from it.
pub struct Rbm<R: Rng = StdRng> {
    theta: Array2<f64>,
    momentum: DecayedMomentum,

    visible_bias: Array1<f64>,
    hidden_bias: Array1<f64>,

    // Sampled state of each layer
    visible: Array1<f64>,
    hidden: Array1<f64>,

    rng: R,
}

impl<R: Rng> Rbm<R> {
    /// Creates a new `Rbm`.
    ///
    /// Weights, biases and both states are drawn from a standard normal distribution,
    /// and the momentum starts as a copy of the weights. The states are not binary
    /// until they are first set or sampled.
    ///
    /// # Arguments
    /// * `visible` - The amount of visible units.
    /// * `hidden` - The amount of hidden units.
    /// * `rng` - The random number generator this machine will sample from.
    pub fn new(visible: usize, hidden: usize, mut rng: R) -> Self {
        let theta = Array2::random_using((visible, hidden), StandardNormal, &mut rng);
        let momentum = DecayedMomentum::new(theta.clone(), MOMENTUM_DECAY);

        Self {
            theta,
            momentum,
            visible_bias: Array1::random_using(visible, StandardNormal, &mut rng),
            visible: Array1::random_using(visible, StandardNormal, &mut rng),
            hidden_bias: Array1::random_using(hidden, StandardNormal, &mut rng),
            hidden: Array1::random_using(hidden, StandardNormal, &mut rng),
            rng,
        }
    }

    pub fn visible_size(&self) -> usize {
        self.theta.nrows()
    }

    pub fn hidden_size(&self) -> usize {
        self.theta.ncols()
    }

    pub fn theta(&self) -> ArrayView2<'_, f64> {
        self.theta.view()
    }

    pub fn momentum(&self) -> ArrayView2<'_, f64> {
        self.momentum.velocity()
    }

    pub fn visible_bias(&self) -> ArrayView1<'_, f64> {
        self.visible_bias.view()
    }

    pub fn hidden_bias(&self) -> ArrayView1<'_, f64> {
        self.hidden_bias.view()
    }

    pub fn visible(&self) -> ArrayView1<'_, f64> {
        self.visible.view()
    }

    pub fn hidden(&self) -> ArrayView1<'_, f64> {
        self.hidden.view()
    }

    /// Overwrites the visible state.
    ///
    /// # Returns
    /// An error if `v` doesn't have one value per visible unit.
    pub fn set_visible(&mut self, v: ArrayView1<f64>) -> Result<()> {
        check_layer(v, self.visible_size(), "visible")?;
        self.visible.assign(&v);
        Ok(())
    }

    /// Overwrites the hidden state.
    ///
    /// # Returns
    /// An error if `h` doesn't have one value per hidden unit.
    pub fn set_hidden(&mut self, h: ArrayView1<f64>) -> Result<()> {
        check_layer(h, self.hidden_size(), "hidden")?;
        self.hidden.assign(&h);
        Ok(())
    }

    /// Computes the probability of each hidden unit being on given the current
    /// visible state.
    ///
    /// # Arguments
    /// * `beta` - The inverse temperature of the sigmoid.
    pub fn hidden_given_visible(&self, beta: f64) -> Array1<f64> {
        let z = &self.hidden_bias + &self.theta.t().dot(&self.visible);
        Sigmoid::new(beta).apply(z.view())
    }

    /// Computes the probability of each visible unit being on given the current
    /// hidden state.
    ///
    /// # Arguments
    /// * `beta` - The inverse temperature of the sigmoid.
    pub fn visible_given_hidden(&self, beta: f64) -> Array1<f64> {
        let z = &self.visible_bias + &self.theta.dot(&self.hidden);
        Sigmoid::new(beta).apply(z.view())
    }

    /// Samples every hidden unit independently given the visible state.
    pub fn update_hidden(&mut self, beta: f64) {
        let p = self.hidden_given_visible(beta);
        sample_into(&mut self.hidden, p.view(), &mut self.rng);
    }

    /// Samples every visible unit independently given the hidden state.
    pub fn update_visible(&mut self, beta: f64) {
        let p = self.visible_given_hidden(beta);
        sample_into(&mut self.visible, p.view(), &mut self.rng);
    }

    /// Clamps the visible layer to `v` and runs one hidden and one visible sampling pass.
    ///
    /// # Arguments
    /// * `v` - The observation to reconstruct.
    /// * `hidden_beta` - The inverse temperature when sampling the hidden layer.
    /// * `visible_beta` - The inverse temperature when sampling the visible layer.
    ///
    /// # Returns
    /// The reconstructed visible state, or an error if `v` has the wrong length.
    pub fn reconstruct(
        &mut self,
        v: ArrayView1<f64>,
        hidden_beta: f64,
        visible_beta: f64,
    ) -> Result<ArrayView1<'_, f64>> {
        self.set_visible(v)?;
        self.update_hidden(hidden_beta);
        self.update_visible(visible_beta);
        Ok(self.visible.view())
    }

    /// Trains the machine with CD(k).
    ///
    /// Each iteration clamps the visible layer to a random column of `x`, samples the
    /// hidden layer (positive phase), runs `k` Gibbs steps (negative phase) and moves the
    /// parameters towards the positive phase correlations and away from the negative
    /// ones.
    ///
    /// # Arguments
    /// * `k` - The amount of Gibbs steps per iteration.
    /// * `x` - The observations, `V x N`, one per column.
    /// * `iterations` - The amount of observations drawn.
    /// * `beta` - The inverse temperature used in every sampling pass.
    /// * `learning_rate` - The scaling of each parameter change.
    ///
    /// # Returns
    /// An error if the rows of `x` don't match the visible units, or if `x` has no
    /// columns to draw from. Nothing is modified in either case.
    pub fn cd(
        &mut self,
        k: usize,
        x: ArrayView2<f64>,
        iterations: usize,
        beta: f64,
        learning_rate: f64,
    ) -> Result<()> {
        if x.nrows() != self.visible_size() {
            return Err(MlErr::SizeMismatch {
                a: "observation",
                b: "visible",
                got: x.nrows(),
                expected: self.visible_size(),
            });
        }

        let observations = x.ncols();
        if observations == 0 && iterations > 0 {
            return Err(MlErr::EmptyDataset);
        }

        debug!(k = k, iterations = iterations, observations = observations, beta = beta; "contrastive divergence started");

        let report_every = (iterations / 10).max(1);

        for i in 0..iterations {
            let j = self.rng.uniform_int(observations);
            self.visible.assign(&x.column(j));
            self.update_hidden(beta);

            let positive_visible = self.visible.clone();
            let positive_hidden = self.hidden.clone();
            let positive = outer(positive_visible.view(), positive_hidden.view());

            for _ in 0..k {
                self.update_visible(beta);
                self.update_hidden(beta);
            }

            let negative = outer(self.visible.view(), self.hidden.view());

            self.hidden_bias
                .scaled_add(learning_rate, &(&positive_hidden - &self.hidden));
            self.visible_bias
                .scaled_add(learning_rate, &(&positive_visible - &self.visible));

            let delta = (positive - negative) * learning_rate;
            self.momentum
                .update_params(self.theta.view_mut(), delta.view())?;

            if (i + 1) % report_every == 0 {
                trace!(iteration = i + 1, observation = j; "contrastive divergence progress");
            }
        }

        debug!(iterations = iterations; "contrastive divergence finished");

        Ok(())
    }
}

/// Sets each unit to 1 if its probability beats an independent uniform draw, 0 otherwise.
fn sample_into<R: RandomSource>(state: &mut Array1<f64>, p: ArrayView1<f64>, rng: &mut R) {
    for (s, &p) in state.iter_mut().zip(&p) {
        *s = if p > rng.uniform_real() { 1. } else { 0. };
    }
}

/// Computes `a ⊗ b`, the `a.len() x b.len()` outer product.
fn outer(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    a.insert_axis(Axis(1)).dot(&b.insert_axis(Axis(0)))
}

fn check_layer(v: ArrayView1<f64>, units: usize, layer: &'static str) -> Result<()> {
    if v.len() != units {
        return Err(MlErr::SizeMismatch {
            a: layer,
            b: "units",
            got: v.len(),
            expected: units,
        });
    }

    Ok(())
}
