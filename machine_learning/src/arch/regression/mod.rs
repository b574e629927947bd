mod linear;
mod logistic;
mod softmax;

pub use linear::LinearRegression;
pub use logistic::LogisticRegression;
pub use softmax::SoftmaxRegression;

use ndarray::ArrayView1;

use crate::{MlErr, Result};

/// Fails if `x` doesn't have the amount of features the model was built for.
fn check_features(x: ArrayView1<f64>, features: usize) -> Result<()> {
    if x.len() != features {
        return Err(MlErr::SizeMismatch {
            a: "input",
            b: "features",
            got: x.len(),
            expected: features,
        });
    }

    Ok(())
}

/// Fails if `y` isn't a single scalar target.
fn scalar_target(y: ArrayView1<f64>) -> Result<f64> {
    match y.len() {
        1 => Ok(y[0]),
        got => Err(MlErr::SizeMismatch {
            a: "target",
            b: "outputs",
            got,
            expected: 1,
        }),
    }
}
