use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

use super::check_features;
use crate::{
    MlErr, Result,
    arch::activations::{argmax, softmax},
    dataset::Dataset,
    optimization::{GradientDescent, Optimizer},
    training::{self, OnlineModel},
};

/// Keeps the reported cross-entropy finite when a probability underflows.
const LOSS_EPS: f64 = 1e-12;

/// Softmax (multinomial) regression over `K` classes.
///
/// `theta` is a `features x classes` matrix, there's no intercept.
#[derive(Debug, Clone)]
pub struct SoftmaxRegression {
    theta: Array2<f64>,
    grad: Array2<f64>,
    optimizer: GradientDescent,
}

impl SoftmaxRegression {
    /// Creates an untrained model with standard normal parameters.
    ///
    /// # Arguments
    /// * `features` - The length of every input vector.
    /// * `classes` - The amount of classes.
    /// * `learning_rate` - The step length of each update.
    /// * `rng` - A random number generator.
    pub fn new<R: Rng + ?Sized>(
        features: usize,
        classes: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            theta: Array2::random_using((features, classes), StandardNormal, rng),
            grad: Array2::zeros((features, classes)),
            optimizer: GradientDescent::new(learning_rate),
        }
    }

    /// Fits a model by online gradient descent on the cross-entropy.
    ///
    /// # Arguments
    /// * `x` - The `features x N` inputs, one example per column.
    /// * `y` - The `classes x N` one-hot targets.
    /// * `learning_rate` - The step length of each update.
    /// * `iterations` - The amount of examples drawn.
    /// * `rng` - A random number generator, for initialization and for picking examples.
    ///
    /// # Returns
    /// The trained model, or an error if `x` and `y` disagree in the amount of examples.
    pub fn fit<R: Rng>(
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        learning_rate: f64,
        iterations: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let dataset = Dataset::from_columns(x, y)?;
        let mut model = Self::new(x.nrows(), y.nrows(), learning_rate, rng);
        training::train(&mut model, &dataset, iterations, rng)?;
        Ok(model)
    }

    pub fn features(&self) -> usize {
        self.theta.nrows()
    }

    pub fn classes(&self) -> usize {
        self.theta.ncols()
    }

    pub fn theta(&self) -> ArrayView2<'_, f64> {
        self.theta.view()
    }

    /// Returns the probability of `x` belonging to each class.
    pub fn probabilities(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        check_features(x, self.features())?;
        Ok(softmax(self.theta.t().dot(&x).view()))
    }

    /// Returns the most likely class for `x`.
    pub fn classify(&self, x: ArrayView1<f64>) -> Result<usize> {
        let p = self.probabilities(x)?;
        Ok(argmax(p.view()))
    }
}

impl OnlineModel for SoftmaxRegression {
    fn step(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        if y.len() != self.classes() {
            return Err(MlErr::SizeMismatch {
                a: "target",
                b: "classes",
                got: y.len(),
                expected: self.classes(),
            });
        }

        let p = self.probabilities(x)?;
        let error = &p - &y;

        let x_col = x.insert_axis(Axis(1));
        let error_row = error.view().insert_axis(Axis(0));
        self.grad.assign(&x_col.dot(&error_row));

        self.optimizer
            .update_params(self.theta.view_mut(), self.grad.view())?;

        let loss: f64 = y
            .iter()
            .zip(&p)
            .map(|(&y, &p)| -y * p.max(LOSS_EPS).ln())
            .sum();

        Ok(loss)
    }
}
