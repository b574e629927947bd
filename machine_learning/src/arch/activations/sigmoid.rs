use ndarray::{Array1, ArrayView1};

/// The logistic sigmoid scaled by an inverse temperature `beta`.
///
/// `beta > 1` sharpens the curve towards a step function, `beta < 1` flattens it
/// towards 0.5. No clamping is done, extreme `beta * z` products saturate to 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sigmoid {
    beta: f64,
}

impl Sigmoid {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn f(&self, z: f64) -> f64 {
        1. / (1. + (-self.beta * z).exp())
    }

    /// Applies the sigmoid to every element of `z`.
    pub fn apply(&self, z: ArrayView1<f64>) -> Array1<f64> {
        z.mapv(|z| self.f(z))
    }
}

impl Default for Sigmoid {
    fn default() -> Self {
        Self::new(1.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn unit_beta_is_the_logistic_function() {
        let sigmoid = Sigmoid::default();

        assert_eq!(sigmoid.f(0.), 0.5);
        assert!((sigmoid.f(2.) - 0.8807970779778823).abs() < 1e-12);
        assert!((sigmoid.f(-2.) + sigmoid.f(2.) - 1.).abs() < 1e-12);
    }

    #[test]
    fn beta_reshapes_the_curve() {
        let flat = Sigmoid::new(0.);
        let sharp = Sigmoid::new(10.);
        let z = array![-1., -0.2, 0.3, 4.];
        assert_eq!(flat.beta(), 0.);
        assert_eq!(sharp.beta(), 10.);
        assert_eq!(Sigmoid::default().beta(), 1.);

        assert!(flat.apply(z.view()).iter().all(|&p| p == 0.5));

        let p = sharp.apply(z.view());
        assert!(p[0] < Sigmoid::default().f(-1.));
        assert!(p[3] > Sigmoid::default().f(4.));
    }
}
