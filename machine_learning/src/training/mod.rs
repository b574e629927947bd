mod trainer;

pub use trainer::{OnlineModel, train};
