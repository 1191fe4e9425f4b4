//! Core geometry types for VoxForge.
//!
//! This crate provides the foundational types for the voxelization pipeline:
//!
//! - [`Facet`] - A triangle with concrete vertex positions and a stored face normal
//! - [`TriMesh`] - An ordered triangle soup, as parsed from an STL file
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Downstream crates (vox-slice, vox-io) assume millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down, the slicing axis)
//!
//! Facet winding is **counter-clockwise (CCW) when viewed from outside**.
//! Geometric normals point outward by the right-hand rule. The normal stored
//! alongside a facet is the one carried by the source file and may disagree
//! with the winding; orientation-sensitive algorithms derive their own.
//!
//! # Example
//!
//! ```
//! use vox_types::{Facet, TriMesh, Point3, Vector3};
//!
//! let mut mesh = TriMesh::new();
//! mesh.push(Facet::from_vertices(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ));
//!
//! assert_eq!(mesh.facet_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod facet;
mod mesh;

pub use bounds::Aabb;
pub use facet::Facet;
pub use mesh::{cube, TriMesh};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
