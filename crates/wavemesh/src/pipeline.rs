//! # Conversion Pipeline
//!
//! ```text
//! audio file ──decode──▶ Signal ──resample──▶ Signal(P)
//!            ──partition──▶ Grid ──boxes──▶ Vec<BoxPrimitive> ──assemble──▶ STL
//! ```
//!
//! Each stage owns what it produced and hands it to the next. Any error
//! aborts the run; a file is only created once every box has been built.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wavemesh_audio::DecoderRegistry;
use wavemesh_core::{
    boxes_from_grid, grid_dimensions, partition, write_boxes, BoxPrimitive, Bounds, Grid,
    MeshConfig, MeshError, Signal,
};

use crate::error::PipelineResult;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "waveform.stl";

/// Grid and boxes for a signal, before anything touches the disk.
#[derive(Clone, Debug)]
pub struct MeshPlan {
    /// Resampled amplitudes arranged in rows.
    pub grid: Grid,
    /// One box per grid cell, row by row.
    pub boxes: Vec<BoxPrimitive>,
    /// Resampled points that did not fit a full row.
    pub dropped_samples: usize,
}

/// Summary of a finished conversion.
#[derive(Clone, Debug)]
pub struct ConversionReport {
    /// Where the STL was written.
    pub output: PathBuf,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub columns: usize,
    /// Resampled points dropped by the partitioner.
    pub dropped_samples: usize,
    /// Boxes written.
    pub boxes: usize,
    /// Triangles written.
    pub triangles: usize,
    /// Extent of the written mesh.
    pub bounds: Option<Bounds>,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows:      {}", self.rows)?;
        writeln!(f, "Columns:   {}", self.columns)?;
        if self.dropped_samples > 0 {
            writeln!(f, "Dropped:   {} samples", self.dropped_samples)?;
        }
        writeln!(f, "Boxes:     {}", self.boxes)?;
        writeln!(f, "Triangles: {}", self.triangles)?;
        if let Some(bounds) = self.bounds {
            let [x, y, z] = bounds.size();
            writeln!(f, "Size:      {x:.1} x {y:.1} x {z:.1}")?;
        }
        write!(f, "Output:    {}", self.output.display())
    }
}

/// Resamples, partitions and builds boxes for `signal`.
///
/// # Errors
///
/// Returns [`MeshError::InvalidConfig`] for an invalid config, or
/// [`MeshError::InvalidArgument`] if `target_point_count` is zero or the
/// signal is empty.
pub fn plan_mesh(signal: &Signal, config: &MeshConfig) -> PipelineResult<MeshPlan> {
    config.validate()?;
    if config.target_point_count == 0 {
        let err = MeshError::InvalidArgument("target_point_count must be positive".into());
        return Err(err.into());
    }

    let resampled = signal.resample(config.target_point_count)?;
    let rows = grid_dimensions(resampled.len());
    let grid = partition(resampled.samples(), rows)?;
    let dropped_samples = resampled.len() - grid.cell_count();
    debug!(
        input = signal.len(),
        resampled = resampled.len(),
        rows = grid.rows(),
        columns = grid.columns(),
        "partitioned signal"
    );

    let boxes = boxes_from_grid(&grid, config);
    Ok(MeshPlan {
        grid,
        boxes,
        dropped_samples,
    })
}

/// Builds the mesh for `signal` and writes it to `output`.
///
/// # Errors
///
/// Any error from [`plan_mesh`], or [`MeshError::Io`] if the file can't be
/// written.
pub fn convert_signal(
    signal: &Signal,
    output: &Path,
    config: &MeshConfig,
) -> PipelineResult<ConversionReport> {
    let plan = plan_mesh(signal, config)?;
    let mesh = write_boxes(&plan.boxes, output, config.output_format)?;

    let report = ConversionReport {
        output: output.to_path_buf(),
        rows: plan.grid.rows(),
        columns: plan.grid.columns(),
        dropped_samples: plan.dropped_samples,
        boxes: plan.boxes.len(),
        triangles: mesh.triangle_count(),
        bounds: mesh.bounds(),
    };
    info!(
        output = %report.output.display(),
        boxes = report.boxes,
        triangles = report.triangles,
        "mesh written"
    );
    Ok(report)
}

/// Decodes `input` and converts it to an STL at `output`.
///
/// # Errors
///
/// [`DecodeError`](wavemesh_audio::DecodeError) if the audio can't be read,
/// otherwise as [`convert_signal`].
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &MeshConfig,
) -> PipelineResult<ConversionReport> {
    let signal = load_signal(input)?;
    convert_signal(&signal, output, config)
}

/// Decodes `input` with the default registry.
///
/// # Errors
///
/// [`DecodeError`](wavemesh_audio::DecodeError) if the audio can't be read.
pub fn load_signal(input: &Path) -> PipelineResult<Signal> {
    Ok(DecoderRegistry::new().load(input)?)
}
