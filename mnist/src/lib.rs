//! A lazy reader for the MNIST handwritten digit database.
//!
//! Pairs a label file with an image file in the IDX format and yields one
//! `(label, binary image)` pair at a time.

mod error;
mod reader;

pub use error::{MnistErr, Result};
pub use reader::{
    IMAGE_MAGIC, INK_THRESHOLD, LABEL_MAGIC, MAX_IMAGE_PIXELS, MnistPair, MnistReader, render,
};
