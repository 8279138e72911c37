use std::{error::Error, fmt, io};

/// Errors produced by the engine when inputs are invalid.
#[derive(Debug)]
pub enum NetError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "inputs").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            NetError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
        }
    }
}

impl Error for NetError {}

/// Failures while encoding or decoding a persisted network.
#[derive(Debug)]
pub enum FormatError {
    Io(io::Error),
    /// The stream ended before a header line was read.
    MissingHeader,
    /// A header field is absent or does not parse as an integer.
    BadHeader {
        field: &'static str,
    },
    /// The decoded configuration is not a valid network.
    Config(NetError),
    /// A weight line does not parse as a floating-point number.
    BadWeight {
        line: usize,
    },
    /// The stream ended before all weights were read.
    Truncated {
        got: usize,
        expected: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Io(e) => write!(f, "io error: {e}"),
            FormatError::MissingHeader => write!(f, "missing header line"),
            FormatError::BadHeader { field } => {
                write!(f, "header field {field} is missing or not an integer")
            }
            FormatError::Config(e) => write!(f, "invalid configuration: {e}"),
            FormatError::BadWeight { line } => {
                write!(f, "line {line} does not parse as a weight")
            }
            FormatError::Truncated { got, expected } => {
                write!(f, "truncated weight list: got {got}, expected {expected}")
            }
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FormatError::Io(e) => Some(e),
            FormatError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<NetError> for FormatError {
    fn from(value: NetError) -> Self {
        Self::Config(value)
    }
}
