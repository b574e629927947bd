use ndarray::{Array1, ArrayView1, ArrayView2, Axis, s};

use super::{check_features, scalar_target};
use crate::{
    Result,
    dataset::Dataset,
    optimization::{GradientDescent, Optimizer},
    random::RandomSource,
    training::{self, OnlineModel},
};

/// Multivariate linear regression fitting feature vectors to a real value.
///
/// Parameters are stored as one flat vector: the weights followed by the intercept.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    params: Array1<f64>,
    grad: Array1<f64>,
    optimizer: GradientDescent,
}

impl LinearRegression {
    /// Creates an untrained model with unit weights and zero intercept.
    ///
    /// # Arguments
    /// * `features` - The length of every input vector.
    /// * `learning_rate` - The step length of each update.
    pub fn new(features: usize, learning_rate: f64) -> Self {
        let mut params = Array1::ones(features + 1);
        params[features] = 0.;

        Self {
            params,
            grad: Array1::zeros(features + 1),
            optimizer: GradientDescent::new(learning_rate),
        }
    }

    /// Fits a model by online gradient descent on the squared error.
    ///
    /// # Arguments
    /// * `x` - The inputs, one example per row.
    /// * `y` - The targets, one per row of `x`.
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

    /// Returns the length of the input vectors.
    pub fn features(&self) -> usize {
        self.params.len() - 1
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.params.slice(s![..-1])
    }

    pub fn bias(&self) -> f64 {
        self.params[self.features()]
    }

    /// Predicts the real value for `x`.
    ///
    /// # Returns
    /// `weights · x + bias`, or an error if `x` has the wrong length.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<f64> {
        check_features(x, self.features())?;
        Ok(self.weights().dot(&x) + self.bias())
    }
}

impl OnlineModel for LinearRegression {
    fn step(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        let target = scalar_target(y)?;
        let error = self.predict(x)? - target;

        let features = self.features();
        self.grad.slice_mut(s![..features]).assign(&(&x * error));
        self.grad[features] = error;

        self.optimizer
            .update_params(self.params.view_mut(), self.grad.view())?;

        Ok(error * error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn starts_from_unit_weights() {
        let model = LinearRegression::new(3, 0.1);

        assert_eq!(model.weights(), array![1., 1., 1.]);
        assert_eq!(model.bias(), 0.);
        assert_eq!(model.predict(array![1., 2., 3.].view()).unwrap(), 6.);
    }

    #[test]
    fn step_moves_against_the_residual() {
        let mut model = LinearRegression::new(2, 0.5);

        // prediction 3, target 1 => error 2
        let loss = model
            .step(array![1., 2.].view(), array![1.].view())
            .unwrap();

        assert_eq!(loss, 4.);
        assert_eq!(model.weights(), array![0., -1.]);
        assert_eq!(model.bias(), -1.);
    }

    #[test]
    fn wrong_input_length_fails() {
        let mut model = LinearRegression::new(2, 0.5);

        assert!(model.predict(array![1.].view()).is_err());
        assert!(model.step(array![1., 2., 3.].view(), array![0.].view()).is_err());
        assert!(model.step(array![1., 2.].view(), array![0., 1.].view()).is_err());
        assert_eq!(model.weights(), array![1., 1.]);
    }

    #[test]
    fn fit_rejects_mismatched_targets() {
        let x = array![[1., 2.], [3., 4.]];
        let y = array![1., 2., 3.];
        let mut rng = crate::random::generate_rng(Some(0));

        assert!(LinearRegression::fit(x.view(), y.view(), 0.1, 10, &mut rng).is_err());
    }
}
