use ndarray::{Array2, ArrayView2, ArrayViewMut2, Zip};

use super::Optimizer;
use crate::{MlErr, Result};

/// The momentum rule used by contrastive divergence.
///
/// Unlike `GradientDescent` it *adds* the given signal, which is expected to be an
/// ascent step already scaled by the learning rate:
///
/// ```text
/// params   += delta + velocity
/// velocity  = (velocity + delta) * decay
/// ```
#[derive(Debug, Clone)]
pub struct DecayedMomentum {
    decay: f64,
    velocity: Array2<f64>,
}

impl DecayedMomentum {
    /// Creates a new `DecayedMomentum` optimizer.
    ///
    /// # Arguments
    /// * `velocity` - The initial velocity, its shape is fixed from now on.
    /// * `decay` - The fraction of the accumulated signal kept after each update.
    ///
    /// # Returns
    /// A new `DecayedMomentum` instance.
    pub fn new(velocity: Array2<f64>, decay: f64) -> Self {
        Self { decay, velocity }
    }

    pub fn velocity(&self) -> ArrayView2<'_, f64> {
        self.velocity.view()
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }
}

impl Optimizer<ndarray::Ix2> for DecayedMomentum {
    fn update_params(&mut self, params: ArrayViewMut2<f64>, delta: ArrayView2<f64>) -> Result<()> {
        for (shape, what) in [(params.dim(), "params"), (delta.dim(), "delta")] {
            if shape != self.velocity.dim() {
                return Err(MlErr::SizeMismatch {
                    a: what,
                    b: "velocity",
                    got: shape.0 * shape.1,
                    expected: self.velocity.len(),
                });
            }
        }

        let decay = self.decay;

        Zip::from(params)
            .and(&mut self.velocity)
            .and(&delta)
            .for_each(|p, v, &d| {
                *p += d + *v;
                *v = (*v + d) * decay;
            });

        Ok(())
    }
}
