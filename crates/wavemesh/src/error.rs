//! # Pipeline Error Types

use thiserror::Error;
use wavemesh_audio::DecodeError;
use wavemesh_core::MeshError;

/// Any failure during a conversion run. Every variant is fatal.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input could not be turned into a signal.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Resampling, partitioning or writing the mesh failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
