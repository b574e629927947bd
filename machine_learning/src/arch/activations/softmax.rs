use ndarray::{Array1, ArrayView1};

/// Normalises `z` into a probability distribution.
///
/// The maximum is subtracted before exponentiating, which leaves the result unchanged
/// but keeps `exp` from overflowing.
pub fn softmax(z: ArrayView1<f64>) -> Array1<f64> {
    let max = z.fold(f64::NEG_INFINITY, |m, &z| m.max(z));
    let mut p = z.mapv(|z| (z - max).exp());
    let sum = p.sum();
    p /= sum;
    p
}

/// Returns the index of the largest element, the first one on ties.
pub fn argmax(v: ArrayView1<f64>) -> usize {
    let mut best = 0;

    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn sums_to_one() {
        let p = softmax(array![1., 2., 3.].view());

        assert!((p.sum() - 1.).abs() < 1e-12);
        assert!(p[0] < p[1] && p[1] < p[2]);
    }

    #[test]
    fn large_inputs_do_not_overflow() {
        let p = softmax(array![1000., 1000.].view());
        assert_eq!(p, array![0.5, 0.5]);
    }

    #[test]
    fn argmax_picks_first_largest() {
        assert_eq!(argmax(array![0.1, 0.7, 0.7, 0.2].view()), 1);
        assert_eq!(argmax(array![3.].view()), 0);
    }
}
