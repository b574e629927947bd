use std::{error::Error, fmt, io};

use machine_learning::MlErr;
use mnist::MnistErr;

/// The driver's result type.
pub type Result<T> = std::result::Result<T, DriverErr>;

/// Everything that can stop a run.
#[derive(Debug)]
pub enum DriverErr {
    /// The configuration parsed but describes an impossible run.
    InvalidConfig(String),
    Io(io::Error),
    Json(serde_json::Error),
    Ml(MlErr),
    Mnist(MnistErr),
}

impl fmt::Display for DriverErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "malformed config: {e}"),
            Self::Ml(e) => write!(f, "training error: {e}"),
            Self::Mnist(e) => write!(f, "mnist error: {e}"),
        }
    }
}

impl Error for DriverErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Ml(e) => Some(e),
            Self::Mnist(e) => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<io::Error> for DriverErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DriverErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<MlErr> for DriverErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}

impl From<MnistErr> for DriverErr {
    fn from(value: MnistErr) -> Self {
        Self::Mnist(value)
    }
}

/// Boundary conversion for the binary.
impl From<DriverErr> for io::Error {
    fn from(value: DriverErr) -> Self {
        match value {
            DriverErr::Io(e) => e,
            DriverErr::Mnist(MnistErr::Io(e)) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
