mod decayed_momentum;
mod gradient_descent;
mod optimizer;

pub use decayed_momentum::DecayedMomentum;
pub use gradient_descent::GradientDescent;
pub use optimizer::Optimizer;
