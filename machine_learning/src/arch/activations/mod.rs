mod sigmoid;
mod softmax;

pub use sigmoid::Sigmoid;
pub use softmax::{argmax, softmax};
