//! Synthetic, noise-free datasets with a known generating model.
//!
//! Used to check that the estimators recover the parameters that produced the data.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::RandomExt;
use rand::{Rng, distr::StandardUniform};

use crate::{
    MlErr, Result,
    arch::activations::{Sigmoid, argmax, softmax},
};

/// Samples a `rows x cols` matrix with entries uniformly distributed in `[0, 1)`.
pub fn uniform_features<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
    Array2::random_using((rows, cols), StandardUniform, rng)
}

/// Generates a linear regression problem.
///
/// # Arguments
/// * `weights` - The true weights, one per feature.
/// * `bias` - The true intercept.
/// * `samples` - The amount of examples.
/// * `rng` - A random number generator.
///
/// # Returns
/// The `samples x features` inputs and the `x · weights + bias` targets.
pub fn linear<R: Rng + ?Sized>(
    weights: ArrayView1<f64>,
    bias: f64,
    samples: usize,
    rng: &mut R,
) -> (Array2<f64>, Array1<f64>) {
    let x = uniform_features(samples, weights.len(), rng);
    let y = x.dot(&weights) + bias;
    (x, y)
}

/// Generates a logistic regression problem with soft targets.
///
/// # Arguments
/// * `weights` - The true weights, one per feature.
/// * `bias` - The true intercept.
/// * `samples` - The amount of examples.
/// * `rng` - A random number generator.
///
/// # Returns
/// The `samples x features` inputs and the `sigmoid(x · weights + bias)` targets.
pub fn logistic<R: Rng + ?Sized>(
    weights: ArrayView1<f64>,
    bias: f64,
    samples: usize,
    rng: &mut R,
) -> (Array2<f64>, Array1<f64>) {
    let sigmoid = Sigmoid::default();
    let (x, z) = linear(weights, bias, samples, rng);
    (x, z.mapv_into(|z| sigmoid.f(z)))
}

/// Generates a multinomial classification problem.
///
/// # Arguments
/// * `theta` - The true `features x classes` parameters.
/// * `samples` - The amount of examples.
/// * `rng` - A random number generator.
///
/// # Returns
/// The `features x samples` inputs and the `classes x samples` one-hot labels, each
/// the most likely class under `softmax(thetaᵀ x)`.
pub fn softmax_classes<R: Rng + ?Sized>(
    theta: ArrayView2<f64>,
    samples: usize,
    rng: &mut R,
) -> (Array2<f64>, Array2<f64>) {
    let x = uniform_features(theta.nrows(), samples, rng);
    let labels = one_hot_labels(theta, x.view());
    (x, labels)
}

/// Labels every column of `x` with the argmax of `softmax(thetaᵀ x)`.
///
/// # Returns
/// The `classes x samples` one-hot matrix.
pub fn one_hot_labels(theta: ArrayView2<f64>, x: ArrayView2<f64>) -> Array2<f64> {
    let mut y = Array2::zeros((theta.ncols(), x.ncols()));

    for (x, mut y) in x.axis_iter(Axis(1)).zip(y.axis_iter_mut(Axis(1))) {
        let p = softmax(theta.t().dot(&x).view());
        y[argmax(p.view())] = 1.0;
    }

    y
}

/// Builds the `classes x samples` one-hot matrix of integer labels.
///
/// # Returns
/// The matrix or an error if a label is not lower than `classes`.
pub fn one_hot(labels: &[usize], classes: usize) -> Result<Array2<f64>> {
    let mut y = Array2::zeros((classes, labels.len()));

    for (i, &label) in labels.iter().enumerate() {
        if label >= classes {
            return Err(MlErr::SizeMismatch {
                a: "label",
                b: "classes",
                got: label + 1,
                expected: classes,
            });
        }

        y[(label, i)] = 1.0;
    }

    Ok(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::generate_rng;
    use ndarray::array;

    #[test]
    fn linear_targets_follow_the_model() {
        let mut rng = generate_rng(Some(1));
        let w = array![2.0, -1.0];
        let (x, y) = linear(w.view(), 0.5, 20, &mut rng);

        assert_eq!(x.dim(), (20, 2));
        for (x, y) in x.outer_iter().zip(&y) {
            assert!((2.0 * x[0] - x[1] + 0.5 - y).abs() < 1e-12);
        }
    }

    #[test]
    fn logistic_targets_are_probabilities() {
        let mut rng = generate_rng(Some(1));
        let w = array![2.0, -1.0];
        let (_, y) = logistic(w.view(), 0.5, 50, &mut rng);

        assert!(y.iter().all(|&p| p > 0.0 && p < 1.0));
    }

    #[test]
    fn softmax_labels_are_one_hot() {
        let mut rng = generate_rng(Some(1));
        let theta = array![[1.0, 0.0, 0.5], [0.0, 1.0, 0.5]];
        let (x, y) = softmax_classes(theta.view(), 30, &mut rng);

        assert_eq!(x.dim(), (2, 30));
        assert_eq!(y.dim(), (3, 30));
        for column in y.axis_iter(Axis(1)) {
            assert_eq!(column.sum(), 1.0);
        }
    }

    #[test]
    fn one_hot_rejects_out_of_range_labels() {
        let y = one_hot(&[0, 2, 1], 3).unwrap();
        assert_eq!(y, array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]);

        assert!(one_hot(&[3], 3).is_err());
    }
}
