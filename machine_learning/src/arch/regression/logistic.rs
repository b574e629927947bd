use ndarray::{Array1, ArrayView1, ArrayView2, Axis, s};

use super::{check_features, scalar_target};
use crate::{
    Result,
    arch::activations::Sigmoid,
    dataset::Dataset,
    optimization::{GradientDescent, Optimizer},
    random::RandomSource,
    training::{self, OnlineModel},
};

/// Keeps the reported cross-entropy finite when the sigmoid saturates.
const LOSS_EPS: f64 = 1e-12;

/// Single class logistic regression.
///
/// Given feature vectors and targets in `[0, 1]` it learns the probability of a
/// feature vector being a positive instance.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: Array1<f64>,
    grad: Array1<f64>,
    sigmoid: Sigmoid,
    optimizer: GradientDescent,
}

impl LogisticRegression {
    /// Creates an untrained model with zero weights and intercept.
    ///
    /// # Arguments
    /// * `features` - The length of every input vector.
    /// * `learning_rate` - The step length of each update.
    pub fn new(features: usize, learning_rate: f64) -> Self {
        Self {
            params: Array1::zeros(features + 1),
            grad: Array1::zeros(features + 1),
            sigmoid: Sigmoid::default(),
            optimizer: GradientDescent::new(learning_rate),
        }
    }

    /// Fits a model by online gradient descent on the cross-entropy.
    ///
    /// # Arguments
    /// * `x` - The inputs, one example per row.
    /// * `y` - The targets in `[0, 1]`, one per row of `x`.
    /// * `learning_rate` - The step length of each update.
    /// * `iterations` - The amount of examples drawn.
    /// * `rng` - The random source picking the examples.
    ///
    /// # Returns
    /// The trained model, or an error if `x` and `y` disagree in length.
    pub fn fit<R: RandomSource>(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        learning_rate: f64,
        iterations: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let dataset = Dataset::new(x, y.insert_axis(Axis(1)))?;
        let mut model = Self::new(x.ncols(), learning_rate);
        training::train(&mut model, &dataset, iterations, rng)?;
        Ok(model)
    }

    pub fn features(&self) -> usize {
        self.params.len() - 1
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.params.slice(s![..-1])
    }

    pub fn bias(&self) -> f64 {
        self.params[self.features()]
    }

    /// Returns the probability of `x` being a positive instance.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<f64> {
        check_features(x, self.features())?;
        Ok(self.sigmoid.f(self.weights().dot(&x) + self.bias()))
    }

    /// Tells whether `x` is a positive instance.
    ///
    /// # Returns
    /// True if the predicted probability is greater than `threshold`.
    pub fn classify(&self, x: ArrayView1<f64>, threshold: f64) -> Result<bool> {
        Ok(self.predict(x)? > threshold)
    }
}

impl OnlineModel for LogisticRegression {
    fn step(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        let target = scalar_target(y)?;
        let p = self.predict(x)?;
        let error = p - target;

        let features = self.features();
        self.grad.slice_mut(s![..features]).assign(&(&x * error));
        self.grad[features] = error;

        self.optimizer
            .update_params(self.params.view_mut(), self.grad.view())?;

        let p = p.clamp(LOSS_EPS, 1. - LOSS_EPS);
        Ok(-(target * p.ln() + (1. - target) * (1. - p).ln()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn untrained_model_is_undecided() {
        let model = LogisticRegression::new(2, 0.1);

        assert_eq!(model.predict(array![3., -7.].view()).unwrap(), 0.5);
        assert!(!model.classify(array![3., -7.].view(), 0.5).unwrap());
        assert!(model.classify(array![3., -7.].view(), 0.4).unwrap());
    }

    #[test]
    fn step_moves_towards_the_target() {
        let mut model = LogisticRegression::new(2, 1.);
        let x = array![1., 0.];

        let before = model.predict(x.view()).unwrap();
        let loss = model.step(x.view(), array![1.].view()).unwrap();
        let after = model.predict(x.view()).unwrap();

        assert!((loss - 2f64.ln()).abs() < 1e-12);
        assert!(after > before);
        assert_eq!(model.weights(), array![0.5, 0.]);
        assert_eq!(model.bias(), 0.5);
    }

    #[test]
    fn wrong_input_length_fails() {
        let model = LogisticRegression::new(3, 0.1);

        assert!(model.predict(array![1., 2.].view()).is_err());
        assert!(model.classify(array![1., 2., 3., 4.].view(), 0.5).is_err());
    }
}
