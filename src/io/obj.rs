//! Wavefront OBJ format support.
//!
//! Loading reads `v` and `f` records; everything else (normals, texture
//! coordinates, groups, materials) is skipped. Face corners may use any of the
//! `v`, `v/vt`, `v//vn` or `v/vt/vn` forms, and negative indices count back
//! from the most recent vertex.
//!
//! Saving writes a strip visualization: the input mesh plus one polyline per
//! strip running through the triangle centroids.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::triangulate_fan;
use crate::algo::strips::TriangleStrip;
use crate::error::{Result, StripError};
use crate::mesh::{TriangleId, TriangleMesh};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use optistrip::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file), path)
}

/// Read OBJ data from `reader`; `path` is only used in error messages.
pub fn read<R: BufRead>(reader: R, path: &Path) -> Result<TriangleMesh> {
    let load_error = |line: usize, message: String| StripError::LoadError {
        path: path.to_path_buf(),
        message: format!("line {}: {}", line, message),
    };

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();
    let mut polygon: Vec<usize> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let number = number + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0; 3];
                for c in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| load_error(number, "vertex needs three coordinates".into()))?;
                    *c = token
                        .parse()
                        .map_err(|_| load_error(number, format!("invalid coordinate '{}'", token)))?;
                }
                positions.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                polygon.clear();
                for token in tokens {
                    let index = resolve_index(token, positions.len())
                        .ok_or_else(|| load_error(number, format!("invalid face corner '{}'", token)))?;
                    polygon.push(index);
                }
                if polygon.len() < 3 {
                    return Err(load_error(number, "face needs at least three corners".into()));
                }
                triangulate_fan(&polygon, &mut faces);
            }
            _ => {}
        }
    }

    TriangleMesh::from_triangles(positions, &faces)
}

/// Resolve the vertex part of a face corner to a zero-based index.
fn resolve_index(corner: &str, num_vertices: usize) -> Option<usize> {
    let vertex = corner.split('/').next()?;
    let index: i64 = vertex.parse().ok()?;
    match index {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => num_vertices.checked_sub(i.unsigned_abs() as usize),
    }
}

/// Save a strip visualization of `mesh` as an OBJ file.
///
/// The file contains the mesh as object `mesh`, and object `strips` with one
/// `l` polyline per strip of two or more triangles, drawn through the
/// triangle centroids.
///
/// # Example
///
/// ```no_run
/// use optistrip::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// let strips = optistrip::create_triangle_strips(&mesh.indices).unwrap();
/// obj::save_strips(&mesh, &strips, "strips.obj").unwrap();
/// ```
pub fn save_strips<P: AsRef<Path>>(
    mesh: &TriangleMesh,
    strips: &[TriangleStrip],
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_strips(&mut writer, mesh, strips)?;
    writer.flush()?;
    Ok(())
}

/// Write a strip visualization of `mesh` to `writer`.
pub fn write_strips<W: Write>(
    writer: &mut W,
    mesh: &TriangleMesh,
    strips: &[TriangleStrip],
) -> Result<()> {
    writeln!(
        writer,
        "# {} triangles in {} strips",
        mesh.num_triangles(),
        strips.len()
    )?;

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    writeln!(writer, "o mesh")?;
    for tri in mesh.indices.chunks_exact(3) {
        writeln!(writer, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
    }

    // Centroid of triangle t is vertex num_vertices + t (zero-based).
    for t in (0..mesh.num_triangles()).map(TriangleId::new) {
        let c = mesh.centroid(t);
        writeln!(writer, "v {} {} {}", c.x, c.y, c.z)?;
    }

    writeln!(writer, "o strips")?;
    let base = mesh.num_vertices() + 1;
    for strip in strips.iter().filter(|s| s.len() >= 2) {
        write!(writer, "l")?;
        for t in strip {
            write!(writer, " {}", base + t.index())?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<TriangleMesh> {
        read(Cursor::new(text), Path::new("test.obj"))
    }

    #[test]
    fn test_read_triangles() {
        let mesh = parse(
            "# quad\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             vn 0 0 1\n\
             f 1//1 2//1 3//1\n\
             f 1/1/1 3/1/1 4/1/1\n",
        )
        .unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_polygons_are_fanned() {
        let mesh = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_negative_indices() {
        let mesh = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            parse("v 0 0\n"),
            Err(StripError::LoadError { .. })
        ));
        assert!(matches!(
            parse("v 0 0 0\nf 0 1 1\n"),
            Err(StripError::LoadError { .. })
        ));
        assert!(matches!(
            parse("v 0 0 0\nv 1 0 0\nf 1 2\n"),
            Err(StripError::LoadError { .. })
        ));
        assert!(matches!(
            parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 7\n"),
            Err(StripError::InvalidVertexIndex { face: 0, vertex: 6 })
        ));
    }

    #[test]
    fn test_write_strips() {
        let mesh = parse("v 0 0 0\nv 3 0 0\nv 3 3 0\nv 0 3 0\nv 6 0 0\nf 1 2 3\nf 1 3 4\nf 2 5 3\n")
            .unwrap();
        let strips = vec![
            vec![TriangleId::new(1), TriangleId::new(0)],
            vec![TriangleId::new(2)],
        ];

        let mut out = Vec::new();
        write_strips(&mut out, &mesh, &strips).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# 3 triangles in 2 strips");
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 5 + 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("f ")).count(), 3);
        assert!(lines.contains(&"v 2 1 0"));

        // Only the two-triangle strip becomes a polyline, through centroids 7 and 6.
        let polylines: Vec<&&str> = lines.iter().filter(|l| l.starts_with("l ")).collect();
        assert_eq!(polylines, vec![&"l 7 6"]);
        assert_eq!(lines.last(), Some(&"l 7 6"));
    }
}
