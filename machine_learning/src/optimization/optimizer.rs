use ndarray::{ArrayView, ArrayViewMut, Dimension};

use crate::Result;

pub trait Optimizer<D: Dimension> {
    /// Updates `params` in place given this step's `grad`.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grad` - The signal used for taking the step, same shape as `params`.
    ///
    /// # Returns
    /// An error if the shapes disagree, in which case `params` is left untouched.
    fn update_params(&mut self, params: ArrayViewMut<f64, D>, grad: ArrayView<f64, D>)
    -> Result<()>;
}
