//! # Grid Partitioner
//!
//! Reshapes a resampled signal into rows of equal length.
//!
//! ## Layout
//!
//! Values are stored flat in row-major order:
//!
//! ```text
//! index = row * columns + column
//! ```
//!
//! The trailing `len % rows` samples never make it into the grid. A warning
//! is logged with the count when that happens.

use tracing::warn;

use crate::error::{MeshError, MeshResult};

/// 2D arrangement of amplitudes, one per box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    values: Vec<f32>,
    rows: usize,
    columns: usize,
}

/// A single grid cell: row index, column index and amplitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    /// Row index (X in mesh space).
    pub row: usize,
    /// Column index (Y in mesh space).
    pub column: usize,
    /// Amplitude at this cell.
    pub amplitude: f32,
}

impl Grid {
    /// Creates a grid from row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidArgument`] if `values.len()` is not
    /// `rows * columns`.
    pub fn new(values: Vec<f32>, rows: usize, columns: usize) -> MeshResult<Self> {
        let expected = rows.checked_mul(columns).ok_or_else(|| {
            MeshError::invalid_argument(format!("grid {rows}x{columns} overflows"))
        })?;
        if values.len() != expected {
            return Err(MeshError::invalid_argument(format!(
                "grid {rows}x{columns} needs {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self {
            values,
            rows,
            columns,
        })
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of values per row.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the grid has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if row and column counts match.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Returns one row, or `None` if out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        self.values.get(start..start + self.columns)
    }

    /// Iterates rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).filter_map(move |r| self.row(r))
    }

    /// Amplitude at `(row, column)`.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<f32> {
        if column >= self.columns {
            return None;
        }
        self.row(row).map(|r| r[column])
    }

    /// Iterates all cells row by row, column by column.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let columns = self.columns.max(1);
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &amplitude)| GridCell {
                row: i / columns,
                column: i % columns,
                amplitude,
            })
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Row count for a target point count: `floor(sqrt(points))`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn grid_dimensions(points: usize) -> usize {
    let mut root = (points as f64).sqrt() as usize;
    // Correct float rounding at perfect squares.
    while root.checked_mul(root).map_or(true, |square| square > points) {
        root -= 1;
    }
    while (root + 1)
        .checked_mul(root + 1)
        .is_some_and(|square| square <= points)
    {
        root += 1;
    }
    root
}

/// Splits `samples` into `rows` contiguous segments of `len / rows` values.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] if `rows` is zero.
pub fn partition(samples: &[f32], rows: usize) -> MeshResult<Grid> {
    if rows == 0 {
        return Err(MeshError::invalid_argument("row count must be positive"));
    }

    let columns = samples.len() / rows;
    let used = rows * columns;
    let dropped = samples.len() - used;
    if dropped > 0 {
        warn!(
            dropped,
            rows,
            columns,
            "grid partition dropped trailing samples"
        );
    }

    Grid::new(samples[..used].to_vec(), rows, columns)
}
