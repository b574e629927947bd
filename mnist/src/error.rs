use std::{error::Error, fmt, io};

/// The mnist module's result type.
pub type Result<T> = std::result::Result<T, MnistErr>;

/// Failures while decoding a pair of MNIST files.
#[derive(Debug)]
pub enum MnistErr {
    Io(io::Error),
    WrongMagic {
        file: &'static str,
        got: u32,
        expected: u32,
    },
    CountMismatch {
        labels: u32,
        images: u32,
    },
    ImageTooLarge {
        rows: u32,
        cols: u32,
    },
}

impl fmt::Display for MnistErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MnistErr::Io(e) => write!(f, "io error: {e}"),
            MnistErr::WrongMagic {
                file,
                got,
                expected,
            } => write!(
                f,
                "wrong magic number in {file} file: got {got}, expected {expected}"
            ),
            MnistErr::CountMismatch { labels, images } => write!(
                f,
                "label and image counts differ: {labels} labels, {images} images"
            ),
            MnistErr::ImageTooLarge { rows, cols } => {
                write!(f, "images of {rows}x{cols} pixels are too large")
            }
        }
    }
}

impl Error for MnistErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MnistErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MnistErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
