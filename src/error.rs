use thiserror::Error;

/// Error type for bed2gff operations.
#[derive(Debug, Error)]
pub enum Bed2GffError {
    /// Failed to build a Rayon thread pool.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Wraps standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for bed2gff operations.
pub type Result<T> = std::result::Result<T, Bed2GffError>;
