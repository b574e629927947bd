use ndarray::ArrayView1;

use super::Dataset;
use crate::random::RandomSource;

/// A finite sequence of uniformly drawn training pairs.
///
/// It can't be rewound, a new one has to be requested from the `Dataset`. The
/// yielded views borrow the dataset's matrices, not the random source.
pub struct Draws<'a, 'r, R> {
    dataset: Dataset<'a>,
    rng: &'r mut R,
    remaining: usize,
}

impl<'a, 'r, R: RandomSource> Draws<'a, 'r, R> {
    pub(super) fn new(dataset: Dataset<'a>, rng: &'r mut R, n: usize) -> Self {
        Self {
            dataset,
            rng,
            remaining: n,
        }
    }
}

impl<'a, R: RandomSource> Iterator for Draws<'a, '_, R> {
    type Item = (ArrayView1<'a, f64>, ArrayView1<'a, f64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;

        // `Dataset` can't be empty, so the range is never empty either.
        let choice = self.rng.uniform_int(self.dataset.len());
        self.dataset.get(choice)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: RandomSource> ExactSizeIterator for Draws<'_, '_, R> {}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use crate::{dataset::Dataset, random::generate_rng};

    #[test]
    fn yields_exactly_n_pairs_from_the_dataset() {
        let x = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let y = array![[0.0], [10.0], [20.0]];
        let dataset = Dataset::new(x.view(), y.view()).unwrap();
        let mut rng = generate_rng(Some(3));

        let draws = dataset.draws(&mut rng, 50);
        assert_eq!(draws.len(), 50);

        let mut count = 0;
        for (x, y) in draws {
            assert_eq!(x[0], x[1]);
            assert_eq!(y[0], x[0] * 10.0);
            count += 1;
        }

        assert_eq!(count, 50);
    }

    #[test]
    fn drawn_pairs_outlive_the_random_source() {
        let x = array![[1.0], [2.0]];
        let y = array![[3.0], [4.0]];
        let dataset = Dataset::new(x.view(), y.view()).unwrap();

        let pairs: Vec<_> = {
            let mut rng = generate_rng(Some(9));
            dataset.draws(&mut rng, 4).collect()
        };

        assert_eq!(pairs.len(), 4);
        for (x, y) in pairs {
            assert_eq!(y[0], x[0] + 2.0);
        }
    }

    #[test]
    fn zero_draws_is_empty() {
        let x = array![[1.0]];
        let y = array![[1.0]];
        let dataset = Dataset::new(x.view(), y.view()).unwrap();
        let mut rng = generate_rng(Some(3));

        assert!(dataset.draws(&mut rng, 0).next().is_none());
    }
}
