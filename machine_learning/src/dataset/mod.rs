mod dataset;
mod draws;
pub mod synthetic;

pub use dataset::Dataset;
pub use draws::Draws;
