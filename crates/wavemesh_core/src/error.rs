//! # Mesh Error Types
//!
//! All errors that can occur between resampling and writing the STL file.

use thiserror::Error;

/// Errors that can occur in the geometry pipeline.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A count, length or shape argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a mesh file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Convenience constructor for [`MeshError::InvalidArgument`].
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for geometry operations.
pub type MeshResult<T> = Result<T, MeshError>;
