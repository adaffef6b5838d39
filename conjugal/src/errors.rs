//! Definition of errors.

use thiserror::Error;

pub type Result<T, E = ConjugalError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ConjugalError {
    #[error(transparent)]
    InvalidModel(InvalidModelError),

    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    #[error(transparent)]
    InvalidData(InvalidDataError),

    #[error(transparent)]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    DecodeError(#[from] bincode::error::DecodeError),

    #[error(transparent)]
    EncodeError(#[from] bincode::error::EncodeError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl ConjugalError {
    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_data<S>(record: usize, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidData(InvalidDataError {
            record,
            msg: msg.into(),
        })
    }
}

/// Error used when the model is invalid or training diverged.
#[derive(Debug, Error)]
#[error("InvalidModelError: {msg}")]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

/// Error used when the argument is invalid.
#[derive(Debug, Error)]
#[error("InvalidArgumentError: {arg}: {msg}")]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

/// Error used when a dataset record is malformed.
#[derive(Debug, Error)]
#[error("InvalidDataError: record {record}: {msg}")]
pub struct InvalidDataError {
    /// Zero-based index of the offending record.
    pub(crate) record: usize,

    /// Error message.
    pub(crate) msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_argument() {
        let e = ConjugalError::invalid_argument("cardinality", "must be at least 2");
        assert_eq!(
            "InvalidArgumentError: cardinality: must be at least 2",
            e.to_string()
        );
    }

    #[test]
    fn test_display_invalid_data() {
        let e = ConjugalError::invalid_data(3, "person1 span is out of range");
        assert_eq!(
            "InvalidDataError: record 3: person1 span is out of range",
            e.to_string()
        );
    }
}
