//! # STL Writer
//!
//! Serializes a [`Mesh`] as binary or ASCII STL.
//!
//! ## Binary Layout
//!
//! ```text
//! [80 bytes ] header (never starts with "solid")
//! [u32 LE   ] triangle count
//! per triangle, 50 bytes:
//!   [3 x f32 LE] facet normal
//!   [9 x f32 LE] three vertices
//!   [u16 LE    ] attribute byte count (always 0)
//! ```
//!
//! Facet normals are recomputed from winding on write.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{Mesh, Triangle};

/// Binary header length.
pub const HEADER_LEN: usize = 80;

/// Bytes per binary facet record.
pub const FACET_LEN: usize = 50;

/// Header banner, zero padded to [`HEADER_LEN`].
const HEADER_BANNER: &[u8] = b"wavemesh binary STL";

/// Solid name used in ASCII output.
const SOLID_NAME: &str = "wavemesh";

/// Upper bound on triangles reserved up front when reading. The header
/// count is untrusted until the records are actually there.
const READ_RESERVE_LIMIT: usize = 1 << 16;

/// STL encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    /// Compact little-endian records.
    #[default]
    Binary,
    /// Human-readable text.
    Ascii,
}

/// Size of a binary STL file holding `triangles` triangles.
#[must_use]
pub const fn binary_size(triangles: usize) -> usize {
    HEADER_LEN + 4 + triangles * FACET_LEN
}

/// Normal + vertices of one binary record, without the attribute word.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct StlFacet {
    normal: [f32; 3],
    vertices: [[f32; 3]; 3],
}

impl StlFacet {
    fn from_triangle(triangle: &Triangle) -> Self {
        Self {
            normal: triangle.normal(),
            vertices: triangle.vertices,
        }
    }

    /// Byte-swaps every float to little-endian order on big-endian hosts.
    fn to_le(self) -> Self {
        let le = |v: [f32; 3]| v.map(|x| f32::from_bits(x.to_bits().to_le()));
        Self {
            normal: le(self.normal),
            vertices: self.vertices.map(le),
        }
    }
}

/// Writes `mesh` to `path` in the given format, replacing any existing file.
///
/// # Errors
///
/// Returns [`MeshError::Io`] if the file can't be created or written, or
/// [`MeshError::InvalidArgument`] if the mesh has more than `u32::MAX`
/// triangles in binary mode.
pub fn write_file(mesh: &Mesh, path: &Path, format: StlFormat) -> MeshResult<()> {
    // Check before touching the filesystem.
    if format == StlFormat::Binary {
        triangle_count_u32(mesh)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    match format {
        StlFormat::Binary => write_binary(mesh, &mut writer)?,
        StlFormat::Ascii => write_ascii(mesh, &mut writer)?,
    }
    writer.flush()?;

    debug!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        ?format,
        "wrote STL"
    );
    Ok(())
}

/// Writes binary STL.
///
/// # Errors
///
/// Returns [`MeshError::Io`] on write failure, or
/// [`MeshError::InvalidArgument`] if the triangle count exceeds `u32::MAX`.
pub fn write_binary<W: Write>(mesh: &Mesh, writer: &mut W) -> MeshResult<()> {
    let count = triangle_count_u32(mesh)?;

    let mut header = [0u8; HEADER_LEN];
    header[..HEADER_BANNER.len()].copy_from_slice(HEADER_BANNER);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    for triangle in mesh.triangles() {
        let facet = StlFacet::from_triangle(triangle).to_le();
        writer.write_all(bytemuck::bytes_of(&facet))?;
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Writes ASCII STL.
///
/// # Errors
///
/// Returns [`MeshError::Io`] on write failure.
pub fn write_ascii<W: Write>(mesh: &Mesh, writer: &mut W) -> MeshResult<()> {
    writeln!(writer, "solid {SOLID_NAME}")?;
    for triangle in mesh.triangles() {
        let [nx, ny, nz] = triangle.normal();
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in triangle.vertices {
            writeln!(writer, "      vertex {x:.6e} {y:.6e} {z:.6e}")?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {SOLID_NAME}")?;
    Ok(())
}

/// Reads the triangle count from a binary STL header.
///
/// # Errors
///
/// Returns [`MeshError::Io`] if the file is shorter than 84 bytes or can't
/// be read.
pub fn read_binary_triangle_count(path: impl AsRef<Path>) -> MeshResult<u32> {
    let mut file = File::open(path)?;
    let mut prefix = [0u8; HEADER_LEN + 4];
    file.read_exact(&mut prefix)?;
    let mut count = [0u8; 4];
    count.copy_from_slice(&prefix[HEADER_LEN..]);
    Ok(u32::from_le_bytes(count))
}

/// Parses a binary STL stream back into a mesh. Stored normals are ignored.
///
/// # Errors
///
/// Returns [`MeshError::Io`] if the stream is truncated, including when the
/// header claims more triangles than follow.
pub fn read_binary<R: Read>(reader: &mut R) -> MeshResult<Mesh> {
    let mut prefix = [0u8; HEADER_LEN + 4];
    reader.read_exact(&mut prefix)?;
    let mut count = [0u8; 4];
    count.copy_from_slice(&prefix[HEADER_LEN..]);
    let count = u32::from_le_bytes(count) as usize;

    let mut triangles = Vec::with_capacity(count.min(READ_RESERVE_LIMIT));
    let mut record = [0u8; FACET_LEN];
    for _ in 0..count {
        reader.read_exact(&mut record)?;
        let mut floats = [0f32; 12];
        for (value, bytes) in floats.iter_mut().zip(record.chunks_exact(4)) {
            *value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        triangles.push(Triangle::new(
            [floats[3], floats[4], floats[5]],
            [floats[6], floats[7], floats[8]],
            [floats[9], floats[10], floats[11]],
        ));
    }
    Ok(Mesh::from_triangles(triangles))
}

fn triangle_count_u32(mesh: &Mesh) -> MeshResult<u32> {
    u32::try_from(mesh.triangle_count()).map_err(|_| {
        MeshError::InvalidArgument(format!(
            "{} triangles exceed the binary STL limit",
            mesh.triangle_count()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::BoxPrimitive;

    fn two_boxes() -> Mesh {
        Mesh::from_boxes(&[
            BoxPrimitive::new([0.0, 0.0, 0.0], [10.0, 10.0, 1.0]),
            BoxPrimitive::new([10.0, 0.0, 0.0], [10.0, 10.0, 26.0]),
        ])
    }

    #[test]
    fn test_binary_size() {
        let mesh = two_boxes();
        let mut bytes = Vec::new();
        write_binary(&mesh, &mut bytes).unwrap();
        assert_eq!(bytes.len(), binary_size(24));
        assert_eq!(&bytes[80..84], &24u32.to_le_bytes());
        assert!(!bytes.starts_with(b"solid"));
    }

    #[test]
    fn test_binary_record_layout() {
        let mesh = Mesh::from_boxes(&[BoxPrimitive::new([0.0; 3], [1.0; 3])]);
        let mut bytes = Vec::new();
        write_binary(&mesh, &mut bytes).unwrap();

        // First triangle is [0, 3, 1] on the bottom face: normal -Z.
        let record = &bytes[84..84 + FACET_LEN];
        let f = |i: usize| f32::from_le_bytes(record[i * 4..i * 4 + 4].try_into().unwrap());
        assert_eq!([f(0), f(1), f(2)], [0.0, 0.0, -1.0]);
        assert_eq!([f(3), f(4), f(5)], [0.0, 0.0, 0.0]);
        assert_eq!([f(6), f(7), f(8)], [0.0, 1.0, 0.0]);
        assert_eq!([f(9), f(10), f(11)], [1.0, 0.0, 0.0]);
        assert_eq!(&record[48..50], &[0, 0]);
    }

    #[test]
    fn test_binary_read_back() {
        let mesh = two_boxes();
        let mut bytes = Vec::new();
        write_binary(&mesh, &mut bytes).unwrap();
        let parsed = read_binary(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, mesh);
    }

    #[test]
    fn test_truncated_binary_fails() {
        let mut bytes = Vec::new();
        write_binary(&two_boxes(), &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(
            read_binary(&mut bytes.as_slice()),
            Err(MeshError::Io(_))
        ));
    }

    #[test]
    fn test_forged_count_is_truncated_not_allocated() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = read_binary(&mut bytes.as_slice()).unwrap_err();
        match err {
            MeshError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ascii_structure() {
        let mesh = two_boxes();
        let mut bytes = Vec::new();
        write_ascii(&mesh, &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("solid wavemesh\n"));
        assert!(text.trim_end().ends_with("endsolid wavemesh"));
        assert_eq!(text.matches("facet normal").count(), 24);
        assert_eq!(text.matches("endfacet").count(), 24);
        assert_eq!(text.matches("vertex").count(), 72);
    }

    #[test]
    fn test_empty_mesh_binary() {
        let mut bytes = Vec::new();
        write_binary(&Mesh::new(), &mut bytes).unwrap();
        assert_eq!(bytes.len(), 84);
    }

    #[test]
    fn test_format_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: StlFormat,
        }
        let w: Wrapper = toml::from_str("format = \"binary\"").unwrap();
        assert_eq!(w.format, StlFormat::Binary);
        let w: Wrapper = toml::from_str("format = \"ascii\"").unwrap();
        assert_eq!(w.format, StlFormat::Ascii);
    }
}
