//! STL (Stereolithography) file loading.
//!
//! Supports both ASCII and binary STL formats.
//!
//! # Format Detection
//!
//! The loader automatically detects whether a file is ASCII or binary:
//! - ASCII files start with "solid" (after optional whitespace)
//! - Binary files have an 80-byte header followed by a facet count
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored, often contains file info)
//! UINT32       – Number of facets
//! foreach facet
//!     REAL32[3] – Normal vector (often not accurate)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;
use vox_types::{Facet, Point3, TriMesh, Vector3};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one facet record in binary STL (normal + 3 vertices + attribute).
const FACET_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// Automatically detects ASCII vs binary format. The per-facet normal from
/// the file is kept on each [`Facet`]; a missing or zero normal is replaced
/// by the winding normal.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file content is not valid STL
///
/// # Example
///
/// ```no_run
/// use vox_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} facets", mesh.facet_count());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<TriMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    let mut reader = BufReader::new(file);

    // Read enough to determine format
    let mut header = [0u8; HEADER_SIZE + 4];
    let bytes_read = reader.read(&mut header)?;

    if bytes_read < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    // Check if ASCII (starts with "solid")
    let header_str = String::from_utf8_lossy(&header[..bytes_read.min(HEADER_SIZE)]);
    let trimmed = header_str.trim_start();

    let mesh = if trimmed.starts_with("solid") && !is_binary_stl_header(&header[..bytes_read]) {
        // ASCII format - need to re-read from start
        drop(reader);
        let file = File::open(path)?;
        load_stl_ascii(BufReader::new(file))
    } else {
        // Binary format - continue reading
        load_stl_binary_from_header(&header[..bytes_read], reader)
    }?;

    debug!(facets = mesh.facet_count(), path = %path.display(), "loaded STL");
    Ok(mesh)
}

/// Check if the header suggests binary STL despite starting with "solid".
///
/// Some binary STLs happen to have "solid" in the header. Binary headers
/// often contain NUL bytes; ASCII ones never do.
fn is_binary_stl_header(header: &[u8]) -> bool {
    if header.len() < HEADER_SIZE + 4 {
        return false;
    }

    header[..HEADER_SIZE].contains(&0)
}

/// Load a binary STL given the already-read header.
fn load_stl_binary_from_header<R: Read>(header: &[u8], mut reader: R) -> IoResult<TriMesh> {
    if header.len() < HEADER_SIZE + 4 {
        return Err(IoError::invalid_content(
            "binary STL shorter than its fixed header",
        ));
    }

    // Facet count is stored after the 80-byte header
    let facet_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let mut mesh = TriMesh::with_capacity(facet_count as usize);

    let mut record = [0u8; FACET_SIZE];
    for i in 0..facet_count {
        let bytes_read = reader.read(&mut record)?;
        if bytes_read < FACET_SIZE {
            return Err(IoError::TruncatedFacets {
                expected: facet_count,
                got: i,
            });
        }

        let normal = read_vector(&record[0..12]);
        let v0 = read_point(&record[12..24]);
        let v1 = read_point(&record[24..36]);
        let v2 = read_point(&record[36..48]);
        // Attribute byte count (record[48..50]) is ignored

        mesh.push(make_facet(normal, v0, v1, v2));
    }

    Ok(mesh)
}

/// Build a facet, substituting the winding normal when the stored one is
/// zero (common in binary files).
fn make_facet(normal: Vector3<f64>, v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Facet {
    if normal.norm_squared() > f64::EPSILON {
        Facet::new(normal, v0, v1, v2)
    } else {
        Facet::from_vertices(v0, v1, v2)
    }
}

/// Read a point from 12 bytes (3 f32s, little-endian).
fn read_point(buf: &[u8]) -> Point3<f64> {
    let v = read_vector(buf);
    Point3::from(v)
}

/// Read a vector from 12 bytes (3 f32s, little-endian).
fn read_vector(buf: &[u8]) -> Vector3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vector3::new(f64::from(x), f64::from(y), f64::from(z))
}

/// Load an ASCII STL file.
fn load_stl_ascii<R: BufRead>(reader: R) -> IoResult<TriMesh> {
    let mut mesh = TriMesh::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut normal = Vector3::zeros();
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();

        match parts[0].to_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                // "facet normal ni nj nk"
                normal = if parts.len() >= 5 && parts[1].eq_ignore_ascii_case("normal") {
                    Vector3::new(parts[2].parse()?, parts[3].parse()?, parts[4].parse()?)
                } else {
                    Vector3::zeros()
                };
            }
            "outer" => {
                if parts.len() >= 2 && parts[1].eq_ignore_ascii_case("loop") {
                    in_loop = true;
                    vertices.clear();
                }
            }
            "vertex" => {
                if !in_loop || parts.len() < 4 {
                    return Err(IoError::invalid_content(format!(
                        "malformed vertex line: {trimmed:?}"
                    )));
                }
                vertices.push(Point3::new(
                    parts[1].parse()?,
                    parts[2].parse()?,
                    parts[3].parse()?,
                ));
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if !in_facet || vertices.len() != 3 {
                    return Err(IoError::invalid_content(format!(
                        "facet closed with {} vertices (expected 3)",
                        vertices.len()
                    )));
                }
                mesh.push(make_facet(normal, vertices[0], vertices[1], vertices[2]));
                in_facet = false;
            }
            "endsolid" => {
                break;
            }
            _ => {
                // Ignore unknown lines (solid name, comments)
            }
        }
    }

    if in_facet || in_loop {
        return Err(IoError::invalid_content("unterminated facet block"));
    }

    Ok(mesh)
}
