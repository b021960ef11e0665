use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad failure class, used by callers that only care which stage failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input is absent, truncated or holds an out-of-range value.
    Config,
    /// A non-numeric token where a number was expected.
    Parse,
    /// A step table does not have the dimensions the metadata promises.
    Shape,
    /// Rendering, encoding or writing an animation failed.
    Output,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: need at least {needed} rows in the first column, found {found}")]
    Truncated {
        path: PathBuf,
        needed: usize,
        found: usize,
    },
    #[error("{path}: row {row} ({name}) is not a number: {token:?}")]
    NotNumeric {
        path: PathBuf,
        row: usize,
        name: &'static str,
        token: String,
    },
    #[error("{path}: {name} = {value} is out of range ({reason})")]
    InvalidValue {
        path: PathBuf,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("{path}:{line}: expected a number, found {token:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("{path}: shape mismatch: {detail}")]
    ShapeMismatch { path: PathBuf, detail: String },
    #[error("invalid grid spacing {spacing} (must be positive)")]
    InvalidSpacing { spacing: f64 },
    #[error("animation {name:?} has no frames")]
    EmptyAnimation { name: String },
    #[error("failed to encode animation: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Missing { .. }
            | Error::Truncated { .. }
            | Error::NotNumeric { .. }
            | Error::InvalidValue { .. }
            | Error::InvalidSpacing { .. } => ErrorKind::Config,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::ShapeMismatch { .. } => ErrorKind::Shape,
            Error::EmptyAnimation { .. } | Error::Encode(_) | Error::Write { .. } => {
                ErrorKind::Output
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
