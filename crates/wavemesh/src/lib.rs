//! # WAVEMESH
//!
//! Turns an audio waveform into a field of boxes you can 3D print.
//!
//! ```text
//! track.wav ─▶ decode ─▶ resample (8000 pts) ─▶ 89 x 89 grid ─▶ boxes ─▶ waveform.stl
//! ```
//!
//! ## Crates
//!
//! - `wavemesh_core`: resampling, grid, boxes, mesh, STL
//! - `wavemesh_audio`: decoding and preview
//! - `wavemesh` (this crate): the pipeline entry point and CLI
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wavemesh::{convert_file, MeshConfig};
//!
//! let report = convert_file(
//!     Path::new("track.wav"),
//!     Path::new("waveform.stl"),
//!     &MeshConfig::default(),
//! )?;
//! println!("{report}");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{
    convert_file, convert_signal, load_signal, plan_mesh, ConversionReport, MeshPlan,
    DEFAULT_OUTPUT,
};

pub use wavemesh_audio as audio;
pub use wavemesh_core as core;
pub use wavemesh_core::{MeshConfig, StlFormat};
