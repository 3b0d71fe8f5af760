//! # Mesh Assembler
//!
//! Concatenates box triangles into one triangle soup.
//!
//! ## Layout
//!
//! Boxes keep their input order and each box contributes exactly
//! [`TRIANGLES_PER_BOX`] contiguous triangles in [`BOX_FACES`] order:
//!
//! ```text
//! [box 0: t0..t11][box 1: t0..t11] ... [box n-1: t0..t11]
//! ```
//!
//! Vertices are never shared between boxes. Neighbouring boxes touch along
//! faces but stay separate closed solids, which slicers accept.
//!
//! [`BOX_FACES`]: crate::primitive::BOX_FACES

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use tracing::{debug, warn};

use crate::error::{MeshError, MeshResult};
use crate::primitive::{BoxPrimitive, TRIANGLES_PER_BOX};
use crate::stl::{self, StlFormat};

/// A triangle: three corners in winding order.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    /// Corners `[v0, v1, v2]`.
    pub vertices: [[f32; 3]; 3],
}

impl Triangle {
    /// Creates a triangle from three corners.
    #[inline]
    #[must_use]
    pub const fn new(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unit normal from the winding, `(v1 - v0) x (v2 - v0)`.
    /// Degenerate triangles get a zero normal.
    #[must_use]
    pub fn normal(&self) -> [f32; 3] {
        let [a, b, c] = self.vertices;
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if length <= f32::EPSILON {
            [0.0; 3]
        } else {
            [n[0] / length, n[1] / length, n[2] / length]
        }
    }

    /// Mean of the three corners.
    #[must_use]
    pub fn centroid(&self) -> [f32; 3] {
        let [a, b, c] = self.vertices;
        [
            (a[0] + b[0] + c[0]) / 3.0,
            (a[1] + b[1] + c[1]) / 3.0,
            (a[2] + b[2] + c[2]) / 3.0,
        ]
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Bounds {
    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Triangle soup built from boxes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `boxes` boxes.
    #[must_use]
    pub fn with_box_capacity(boxes: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(boxes * TRIANGLES_PER_BOX),
        }
    }

    /// Wraps an existing triangle list.
    #[must_use]
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Concatenates the triangles of `boxes` in order.
    #[must_use]
    pub fn from_boxes(boxes: &[BoxPrimitive]) -> Self {
        let mut mesh = Self::with_box_capacity(boxes.len());
        for b in boxes {
            mesh.push_box(b);
        }
        debug!(
            boxes = boxes.len(),
            triangles = mesh.triangle_count(),
            "assembled mesh"
        );
        mesh
    }

    /// Builds boxes from parallel position and scale arrays.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidArgument`] if the arrays differ in length.
    pub fn from_positions_and_scales(
        positions: &[[f32; 3]],
        scales: &[[f32; 3]],
    ) -> MeshResult<Self> {
        Ok(Self::from_boxes(&zip_boxes(positions, scales)?))
    }

    /// Appends one box's 12 triangles.
    pub fn push_box(&mut self, b: &BoxPrimitive) {
        self.triangles.extend_from_slice(&b.triangles());
    }

    /// All triangles in order.
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles belonging to box `index`.
    #[must_use]
    pub fn box_triangles(&self, index: usize) -> Option<&[Triangle]> {
        let start = index.checked_mul(TRIANGLES_PER_BOX)?;
        self.triangles.get(start..start + TRIANGLES_PER_BOX)
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices);
        let first = vertices.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for v in vertices {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(v[axis]);
                bounds.max[axis] = bounds.max[axis].max(v[axis]);
            }
        }
        Some(bounds)
    }

    /// Writes the mesh as STL, overwriting `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Io`] if the file can't be created or written.
    pub fn save(&self, path: impl AsRef<Path>, format: StlFormat) -> MeshResult<()> {
        stl::write_file(self, path.as_ref(), format)
    }
}

/// Builds one box per `(position, scale)` pair and writes them as a single
/// STL file. Nothing is written if the arrays differ in length.
///
/// Returns the assembled mesh.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] on a length mismatch, or
/// [`MeshError::Io`] if the file can't be written.
pub fn add_boxes_to_stl(
    positions: &[[f32; 3]],
    scales: &[[f32; 3]],
    path: impl AsRef<Path>,
    format: StlFormat,
) -> MeshResult<Mesh> {
    let boxes = zip_boxes(positions, scales)?;
    write_boxes(&boxes, path, format)
}

/// Pairs positions with scales.
fn zip_boxes(positions: &[[f32; 3]], scales: &[[f32; 3]]) -> MeshResult<Vec<BoxPrimitive>> {
    if positions.len() != scales.len() {
        return Err(MeshError::invalid_argument(format!(
            "positions and scales must be of equal length: {} != {}",
            positions.len(),
            scales.len()
        )));
    }
    Ok(positions
        .iter()
        .zip(scales)
        .map(|(&p, &s)| BoxPrimitive::new(p, s))
        .collect())
}

/// Assembles `boxes` into one mesh and writes it as STL.
///
/// Boxes with zero or negative height are still written; they come out
/// flat or inside-out and a warning reports how many there were.
///
/// # Errors
///
/// Returns [`MeshError::Io`] if the file can't be written.
pub fn write_boxes(
    boxes: &[BoxPrimitive],
    path: impl AsRef<Path>,
    format: StlFormat,
) -> MeshResult<Mesh> {
    let flat = count_non_positive(boxes);
    if flat > 0 {
        warn!(
            boxes = flat,
            "boxes with non-positive height will be flat or inside-out"
        );
    }

    let mesh = Mesh::from_boxes(boxes);
    mesh.save(path, format)?;
    Ok(mesh)
}

/// Boxes whose height is zero or negative.
fn count_non_positive(boxes: &[BoxPrimitive]) -> usize {
    boxes.iter().filter(|b| b.height() <= 0.0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_count_is_12_per_box() {
        let boxes: Vec<_> = (0..7)
            .map(|i| BoxPrimitive::new([i as f32, 0.0, 0.0], [1.0; 3]))
            .collect();
        let mesh = Mesh::from_boxes(&boxes);
        assert_eq!(mesh.triangle_count(), 7 * 12);
    }

    #[test]
    fn test_box_order_preserved() {
        let boxes = [
            BoxPrimitive::new([0.0, 0.0, 0.0], [1.0; 3]),
            BoxPrimitive::new([50.0, 0.0, 0.0], [1.0; 3]),
            BoxPrimitive::new([-50.0, 0.0, 0.0], [1.0; 3]),
        ];
        let mesh = Mesh::from_boxes(&boxes);
        for (i, b) in boxes.iter().enumerate() {
            assert_eq!(mesh.box_triangles(i).unwrap(), &b.triangles()[..]);
        }
        assert!(mesh.box_triangles(3).is_none());
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let err = Mesh::from_positions_and_scales(&[[0.0; 3]; 2], &[[1.0; 3]; 3]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_input_gives_empty_mesh() {
        let mesh = Mesh::from_positions_and_scales(&[], &[]).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::from_boxes(&[
            BoxPrimitive::new([0.0, 0.0, 0.0], [10.0, 10.0, 1.0]),
            BoxPrimitive::new([10.0, 0.0, 0.0], [10.0, 10.0, 51.0]),
        ]);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [20.0, 10.0, 51.0]);
        assert_eq!(bounds.size(), [20.0, 10.0, 51.0]);
    }

    #[test]
    fn test_write_boxes_keeps_non_positive_heights() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("test_flat_boxes_{id}.stl"));
        let boxes = [
            BoxPrimitive::new([0.0, 0.0, 0.0], [10.0, 10.0, 1.0]),
            BoxPrimitive::new([10.0, 0.0, 0.0], [10.0, 10.0, -4.0]),
            BoxPrimitive::new([20.0, 0.0, 0.0], [10.0, 10.0, 0.0]),
        ];
        assert_eq!(count_non_positive(&boxes), 2);

        let mesh = write_boxes(&boxes, &path, StlFormat::Binary).unwrap();
        assert_eq!(mesh.triangle_count(), 36);
        assert_eq!(mesh.box_triangles(1).unwrap(), &boxes[1].triangles()[..]);
        assert_eq!(stl::read_binary_triangle_count(&path).unwrap(), 36);

        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min[2], -4.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let t = Triangle::new([0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(t.normal(), [0.0; 3]);
    }

    #[test]
    fn test_triangle_is_pod() {
        let t = Triangle::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&t));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }
}
