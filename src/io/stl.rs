//! STL (stereolithography) format support.
//!
//! STL stores three positions per triangle. `stl_io` merges bit-identical
//! positions into shared vertices, which recovers the edge adjacency the strip
//! builder needs. Triangles that collapse onto a repeated vertex are dropped.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use log::warn;
use nalgebra::Point3;

use crate::error::{Result, StripError};
use crate::mesh::TriangleMesh;

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format.
///
/// # Example
///
/// ```no_run
/// use optistrip::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    read(&mut file, path)
}

/// Read STL data from `reader`; `path` is only used in error messages.
pub fn read<R: Read + Seek>(reader: &mut R, path: &Path) -> Result<TriangleMesh> {
    let stl = stl_io::read_stl(reader).map_err(|e| StripError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let faces: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|tri| tri.vertices)
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    let dropped = stl.faces.len() - faces.len();
    if dropped > 0 {
        warn!("{}: skipped {} degenerate triangles", path.display(), dropped);
    }

    TriangleMesh::from_triangles(positions, &faces)
}
