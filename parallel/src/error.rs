//! Error types for pipeline evaluation

use thiserror::Error;

/// Error type for pipeline evaluation
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("execution failed: {0}")]
    ExecutionFailure(String),
    #[error("thread pool build failed: {0}")]
    PoolBuildFailed(#[from] rayon::ThreadPoolBuildError),
}
