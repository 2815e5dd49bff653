//! Error types for store operations

use thiserror::Error;

/// Error type for store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("index out of range: {0} (len {1})")]
    IndexOutOfRange(usize, usize), // index, len
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
