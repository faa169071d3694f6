//! Parse failures.

use crate::spec::ValueType;
use thiserror::Error;

/// Why a parse stopped.
///
/// Errors never unwind: the engine records the first one in the outcome and
/// stops walking tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized command-line option: {0}")]
    UnrecognizedOption(String),

    #[error("invalid boolean: {0}")]
    InvalidBoolean(String),

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid float: {0}")]
    InvalidFloat(String),

    #[error("invalid double: {0}")]
    InvalidDouble(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A multi-value argument ran out of input before its group was complete.
    #[error("missing values for {flag}: expected {expected}, found {found}")]
    MissingValues {
        flag: String,
        expected: usize,
        found: usize,
    },

    /// Multi-value groups are only defined for boolean and numeric types.
    #[error("{flag} cannot take multiple {value_type} values")]
    UnsupportedMultiValue { flag: String, value_type: ValueType },
}

/// Payload-free discriminant of [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedOption,
    InvalidBoolean,
    InvalidInteger,
    InvalidFloat,
    InvalidDouble,
    FileNotFound,
    MissingValues,
    UnsupportedMultiValue,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedOption(_) => ErrorKind::UnrecognizedOption,
            Self::InvalidBoolean(_) => ErrorKind::InvalidBoolean,
            Self::InvalidInteger(_) => ErrorKind::InvalidInteger,
            Self::InvalidFloat(_) => ErrorKind::InvalidFloat,
            Self::InvalidDouble(_) => ErrorKind::InvalidDouble,
            Self::FileNotFound(_) => ErrorKind::FileNotFound,
            Self::MissingValues { .. } => ErrorKind::MissingValues,
            Self::UnsupportedMultiValue { .. } => ErrorKind::UnsupportedMultiValue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_token() {
        let err = ParseError::InvalidInteger("3.14".to_string());
        assert_eq!(err.to_string(), "invalid integer: 3.14");
        assert_eq!(err.kind(), ErrorKind::InvalidInteger);

        let err = ParseError::MissingValues {
            flag: "-2".to_string(),
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "missing values for -2: expected 2, found 1");
    }
}
