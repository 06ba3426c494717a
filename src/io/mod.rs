//! Mesh file I/O.
//!
//! Meshes are loaded into a flat [`TriangleMesh`]; polygons are
//! fan-triangulated on the way in.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | strips | Strip visualization output |
//! | STL | `.stl` | ✓ | ✗ | Binary and ASCII |
//! | PLY | `.ply` | ✓ | ✗ | Stanford polygon format |
//!
//! # Usage
//!
//! ```no_run
//! use optistrip::io::{load, obj};
//!
//! // Load with automatic format detection
//! let mesh = load("model.ply").unwrap();
//!
//! let strips = optistrip::create_triangle_strips(&mesh.indices).unwrap();
//! obj::save_strips(&mesh, &strips, "strips.obj").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use log::debug;

use crate::error::{Result, StripError};
use crate::mesh::TriangleMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use optistrip::io::load;
///
/// let mesh = load("model.obj").unwrap();
/// println!("{} triangles", mesh.num_triangles());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| StripError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    let mesh = match format {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
    }?;

    debug!(
        "loaded {} ({:?}): {} vertices, {} triangles",
        path.display(),
        format,
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Fan-triangulate a polygon given as vertex indices, appending to `faces`.
///
/// Polygons with fewer than three vertices are ignored.
pub(crate) fn triangulate_fan(polygon: &[usize], faces: &mut Vec<[usize; 3]>) {
    if polygon.len() < 3 {
        return;
    }
    for i in 1..polygon.len() - 1 {
        faces.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
}
