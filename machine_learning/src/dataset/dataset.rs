use ndarray::{ArrayView1, ArrayView2, Axis};

use super::Draws;
use crate::{MlErr, Result, random::RandomSource};

/// A borrowed set of supervised examples, one example per row of `x` and `y`.
///
/// The dataset never owns the training matrices, it only gives access to them for
/// the duration of a training call.
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    x: ArrayView2<'a, f64>,
    y: ArrayView2<'a, f64>,
}

impl<'a> Dataset<'a> {
    /// Creates a new `Dataset` where each row is an example.
    ///
    /// # Arguments
    /// * `x` - The inputs, `N x x_size`.
    /// * `y` - The targets, `N x y_size`.
    ///
    /// # Returns
    /// A new `Dataset`, or an error if the row counts differ or there are no rows.
    pub fn new(x: ArrayView2<'a, f64>, y: ArrayView2<'a, f64>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(MlErr::SizeMismatch {
                a: "inputs",
                b: "targets",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        if x.nrows() == 0 {
            return Err(MlErr::EmptyDataset);
        }

        Ok(Self { x, y })
    }

    /// Creates a new `Dataset` where each column is an example.
    ///
    /// # Arguments
    /// * `x` - The inputs, `x_size x N`.
    /// * `y` - The targets, `y_size x N`.
    ///
    /// # Returns
    /// A new `Dataset`, or an error if the column counts differ or there are no columns.
    pub fn from_columns(x: ArrayView2<'a, f64>, y: ArrayView2<'a, f64>) -> Result<Self> {
        Self::new(x.reversed_axes(), y.reversed_axes())
    }

    /// Returns the amount of examples.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    /// Always false, empty datasets can't be built.
    pub fn is_empty(&self) -> bool {
        self.x.nrows() == 0
    }

    /// Returns the length of every input vector.
    pub fn x_size(&self) -> usize {
        self.x.ncols()
    }

    /// Returns the length of every target vector.
    pub fn y_size(&self) -> usize {
        self.y.ncols()
    }

    /// Fetches the `i`-th example.
    ///
    /// # Returns
    /// The `(input, target)` pair or `None` if `i` is out of bounds.
    pub fn get(&self, i: usize) -> Option<(ArrayView1<'a, f64>, ArrayView1<'a, f64>)> {
        if i >= self.len() {
            return None;
        }

        Some((
            self.x.index_axis_move(Axis(0), i),
            self.y.index_axis_move(Axis(0), i),
        ))
    }

    /// Draws `n` examples uniformly at random, with replacement.
    ///
    /// # Arguments
    /// * `rng` - The random source picking the examples.
    /// * `n` - The amount of examples to draw.
    ///
    /// # Returns
    /// A finite iterator over the drawn `(input, target)` pairs.
    pub fn draws<'r, R: RandomSource>(&self, rng: &'r mut R, n: usize) -> Draws<'a, 'r, R> {
        Draws::new(*self, rng, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rows_must_match() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![[1.0]];

        let err = Dataset::new(x.view(), y.view()).unwrap_err();
        assert_eq!(
            err,
            MlErr::SizeMismatch {
                a: "inputs",
                b: "targets",
                got: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let x = ndarray::Array2::<f64>::zeros((0, 3));
        let y = ndarray::Array2::<f64>::zeros((0, 1));

        assert_eq!(
            Dataset::new(x.view(), y.view()).unwrap_err(),
            MlErr::EmptyDataset
        );
    }

    #[test]
    fn columns_are_examples() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let y = array![[0.0, 1.0, 0.0]];

        let dataset = Dataset::from_columns(x.view(), y.view()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.x_size(), 2);
        assert_eq!(dataset.y_size(), 1);

        let (x1, y1) = dataset.get(1).unwrap();
        assert_eq!(x1, array![2.0, 5.0]);
        assert_eq!(y1, array![1.0]);
        assert!(dataset.get(3).is_none());
    }
}
