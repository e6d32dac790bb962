extern crate csv;

use std::error::Error;
use std::fmt;
use std::io;

/// Everything that can go wrong during a batch run. Any of these aborts the
/// whole run, there is no partial-result recovery.
#[derive(Debug)]
pub enum PipelineError {
    /// A malformed input line, e.g. a wrong number of columns or an
    /// unparseable id or weight.
    InputFormat { line: u64, message: String },
    /// An item or user id exceeds the matrix dimensions it is used against.
    IndexOutOfRange { what: &'static str, index: u32, bound: usize },
    /// A selected user has an empty profile, so there is nothing to hold
    /// out and nothing to seed candidates from.
    DegenerateRow { user: u32 },
    /// A held-out test item leaked back into the candidate set. This
    /// indicates a bug in the holdout procedure and is treated as fatal.
    ConsistencyViolation { user: u32, test_item: u32 },
    Io(io::Error),
    Csv(csv::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PipelineError::InputFormat { line, ref message } =>
                write!(f, "Malformed input at line {}: {}", line, message),
            PipelineError::IndexOutOfRange { what, index, bound } =>
                write!(f, "{} id {} is out of range for dimension {}", what, index, bound),
            PipelineError::DegenerateRow { user } =>
                write!(f, "User {} has an empty profile", user),
            PipelineError::ConsistencyViolation { user, test_item } =>
                write!(f, "Held-out item {} of user {} reappeared in the candidate set",
                    test_item, user),
            PipelineError::Io(ref error) => error.fmt(f),
            PipelineError::Csv(ref error) => error.fmt(f),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(Error + 'static)> {
        match *self {
            PipelineError::Io(ref error) => Some(error),
            PipelineError::Csv(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for PipelineError {
    fn from(error: io::Error) -> Self {
        PipelineError::Io(error)
    }
}

impl From<csv::Error> for PipelineError {
    fn from(error: csv::Error) -> Self {
        PipelineError::Csv(error)
    }
}
