//! Triangle-soup mesh.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, Facet, Point3};

/// An ordered triangle soup.
///
/// This is the mesh shape STL files actually carry: a flat sequence of
/// independent facets with no shared vertices and no adjacency. The
/// voxelization pipeline never needs topology, so none is reconstructed.
///
/// Facet order is meaningful: downstream queries break exact depth ties by
/// the lower facet index, so two runs over the same file are bit-identical.
///
/// # Example
///
/// ```
/// use vox_types::{Facet, TriMesh, Point3};
///
/// let mut mesh = TriMesh::new();
/// mesh.push(Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ));
/// assert_eq!(mesh.facet_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriMesh {
    /// The facets, in file order.
    pub facets: Vec<Facet>,
}

impl TriMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { facets: Vec::new() }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(facet_count: usize) -> Self {
        Self {
            facets: Vec::with_capacity(facet_count),
        }
    }

    /// Create a mesh from a facet list.
    #[inline]
    #[must_use]
    pub const fn from_facets(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    /// Append a facet.
    #[inline]
    pub fn push(&mut self, facet: Facet) {
        self.facets.push(facet);
    }

    /// Get the number of facets.
    #[inline]
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Check if the mesh has no facets.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Iterate over the facets in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }

    /// Compute the axis-aligned bounding box over all vertices.
    ///
    /// Returns an empty AABB for a mesh with no facets.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for facet in &self.facets {
            aabb.expand_to_include(&facet.v0);
            aabb.expand_to_include(&facet.v1);
            aabb.expand_to_include(&facet.v2);
        }
        aabb
    }

    /// Translate all facets by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for facet in &mut self.facets {
            facet.translate(offset);
        }
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.facets.iter().map(Facet::area).sum()
    }
}

/// Build an axis-aligned cube of the given side length with one corner at
/// the origin.
///
/// 12 facets (2 per face), CCW winding viewed from outside, stored normals
/// matching the winding. Useful as a well-understood closed solid in tests.
///
/// # Example
///
/// ```
/// use vox_types::cube;
///
/// let mesh = cube(10.0);
/// assert_eq!(mesh.facet_count(), 12);
/// assert!((mesh.surface_area() - 600.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn cube(side: f64) -> TriMesh {
    let s = side;
    let corners = [
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(s, 0.0, 0.0),   // 1
        Point3::new(s, s, 0.0),     // 2
        Point3::new(0.0, s, 0.0),   // 3
        Point3::new(0.0, 0.0, s),   // 4
        Point3::new(s, 0.0, s),     // 5
        Point3::new(s, s, s),       // 6
        Point3::new(0.0, s, s),     // 7
    ];

    // 2 triangles per face, CCW viewed from outside
    let faces: [[usize; 3]; 12] = [
        // Bottom (z=0), normal -Z
        [0, 2, 1],
        [0, 3, 2],
        // Top (z=s), normal +Z
        [4, 5, 6],
        [4, 6, 7],
        // Front (y=0), normal -Y
        [0, 1, 5],
        [0, 5, 4],
        // Back (y=s), normal +Y
        [3, 7, 6],
        [3, 6, 2],
        // Left (x=0), normal -X
        [0, 4, 7],
        [0, 7, 3],
        // Right (x=s), normal +X
        [1, 2, 6],
        [1, 6, 5],
    ];

    let mut mesh = TriMesh::with_capacity(12);
    for [a, b, c] in faces {
        mesh.push(Facet::from_vertices(corners[a], corners[b], corners[c]));
    }
    mesh
}
