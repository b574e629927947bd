use rand::{Rng, SeedableRng, rngs::StdRng};

/// The source of randomness every stochastic operation draws from.
///
/// Implemented for every `rand::Rng`, so a seeded `StdRng` makes any training run
/// reproducible.
pub trait RandomSource {
    /// Returns a uniformly distributed real number in `[0, 1)`.
    fn uniform_real(&mut self) -> f64;

    /// Returns a uniformly distributed integer in `[0, n)`.
    ///
    /// # Panics
    /// If `n` is zero.
    fn uniform_int(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform_real(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn uniform_int(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// Creates the random number generator for a training run.
///
/// # Arguments
/// * `seed` - An optional seed, a fresh OS-seeded generator is returned if absent.
///
/// # Returns
/// A new `StdRng`.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_draws_stay_in_range() {
        let mut rng = generate_rng(Some(7));

        for _ in 0..1000 {
            let u = rng.uniform_real();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.uniform_int(5) < 5);
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = generate_rng(Some(42));
        let mut b = generate_rng(Some(42));

        let xs: Vec<_> = (0..16).map(|_| a.uniform_int(100)).collect();
        let ys: Vec<_> = (0..16).map(|_| b.uniform_int(100)).collect();
        assert_eq!(xs, ys);
    }
}
