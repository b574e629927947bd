pub mod activations;
mod rbm;
pub mod regression;

pub use rbm::{MOMENTUM_DECAY, Rbm};
