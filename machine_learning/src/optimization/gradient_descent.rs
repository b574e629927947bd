use ndarray::{ArrayView, ArrayViewMut, Dimension};

use super::Optimizer;
use crate::{MlErr, Result};

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl<D: Dimension> Optimizer<D> for GradientDescent {
    /// Updates the parameters according to the algorithm's learning rule, that is, making a step in
    /// the opposite direction of the gradient, with a length of `learning_rate`.
    fn update_params(
        &mut self,
        mut params: ArrayViewMut<f64, D>,
        grad: ArrayView<f64, D>,
    ) -> Result<()> {
        if params.shape() != grad.shape() {
            return Err(MlErr::SizeMismatch {
                a: "params",
                b: "grad",
                got: grad.len(),
                expected: params.len(),
            });
        }

        params.scaled_add(-self.learning_rate, &grad);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn steps_against_the_gradient() {
        let mut params = array![1.0, 2.0, 3.0];
        let grad = array![1.0, -2.0, 0.0];

        let mut optimizer = GradientDescent::new(0.5);
        assert_eq!(optimizer.learning_rate(), 0.5);
        optimizer
            .update_params(params.view_mut(), grad.view())
            .unwrap();

        assert_eq!(params, array![0.5, 3.0, 3.0]);
    }

    #[test]
    fn mismatched_shapes_leave_params_untouched() {
        let mut params = array![[1.0, 2.0], [3.0, 4.0]];
        let grad = array![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];

        let mut optimizer = GradientDescent::new(0.1);
        let res = optimizer.update_params(params.view_mut(), grad.view());

        assert!(res.is_err());
        assert_eq!(params, array![[1.0, 2.0], [3.0, 4.0]]);
    }
}
