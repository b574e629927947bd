//! Runs one of the estimators end to end from a JSON description.

pub mod config;
mod error;
pub mod run;

pub use error::{DriverErr, Result};
pub use run::{Outcome, run};
