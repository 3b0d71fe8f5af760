//! # WAVEMESH Core
//!
//! Turns an amplitude signal into a printable field of boxes.
//!
//! ## Pipeline
//!
//! 1. **Resample**: linear interpolation onto `target_point_count` points
//! 2. **Partition**: `floor(sqrt(points))` rows of equal length
//! 3. **Generate**: one box per cell, height `base + amplitude * gain`
//! 4. **Assemble**: concatenate 12 triangles per box, write STL
//!
//! Every stage takes its input by reference or value and returns a new
//! value. Nothing is shared and nothing is cached.
//!
//! ## Example
//!
//! ```rust,ignore
//! use wavemesh_core::{grid, primitive, MeshConfig, Mesh, Signal};
//!
//! let config = MeshConfig::default();
//! let signal = Signal::new(samples);
//! let resampled = signal.resample(config.target_point_count)?;
//! let rows = grid::grid_dimensions(resampled.len());
//! let grid = grid::partition(resampled.samples(), rows)?;
//! let mesh = Mesh::from_boxes(&primitive::boxes_from_grid(&grid, &config));
//! mesh.save("waveform.stl", config.output_format)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod primitive;
pub mod signal;
pub mod stl;

pub use config::MeshConfig;
pub use error::{MeshError, MeshResult};
pub use grid::{grid_dimensions, partition, Grid, GridCell};
pub use mesh::{add_boxes_to_stl, write_boxes, Bounds, Mesh, Triangle};
pub use primitive::{
    boxes_from_grid, BoxPrimitive, BOX_FACES, TRIANGLES_PER_BOX, UNIT_CUBE_VERTICES,
};
pub use signal::{resample, Signal};
pub use stl::StlFormat;
