//! Error types for idmlpack operations.

use thiserror::Error;

/// Errors that can occur while formatting an article into an IDML package.
#[derive(Error, Debug)]
pub enum Error {
    /// Layout data required by a geometry query is missing.
    #[error("Layout precondition failed: {0}")]
    StructuralPrecondition(String),

    /// The operation is declared but intentionally not implemented.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The article body (or a configuration value) cannot be turned into blocks.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Coarse classification of [`Error`], for callers that only care about
/// whether the article, the layout or the environment is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StructuralPrecondition,
    UnsupportedOperation,
    MalformedInput,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::StructuralPrecondition(_) => ErrorKind::StructuralPrecondition,
            Error::UnsupportedOperation(_) | Error::UnsupportedFormat(_) => {
                ErrorKind::UnsupportedOperation
            }
            Error::MalformedInput(_) => ErrorKind::MalformedInput,
            Error::Io(_) | Error::Zip(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
