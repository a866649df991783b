//! error type shared by all DP operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DpError {
    /// mode, filter code or tuning outside what DP supports
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// delay FIR replacement that is not a non-empty list of equal-length lists
    #[error("malformed delay FIR coefficients: {0}")]
    MalformedCoefficients(String),

    /// one task of a batch failed, the whole batch is discarded
    #[error("processing of input {task} failed: {source}")]
    ProcessingFailure {
        task: usize,
        #[source]
        source: Box<DpError>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cannot build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, DpError>;
