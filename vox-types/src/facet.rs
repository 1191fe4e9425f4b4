//! Facet type: a triangle with a stored face normal.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Aabb;

/// A triangle with concrete vertex positions and a stored face normal.
///
/// This is the primitive of the voxelization pipeline: STL files are a flat
/// sequence of facets with no shared topology, and that is how they are kept.
///
/// The `normal` field is the direction recorded in the source file. STL
/// normals are frequently zero or inconsistent with the winding, so geometric
/// code uses [`Facet::geometric_normal`] (derived from the CCW winding by the
/// right-hand rule) instead of trusting the stored value.
///
/// # Example
///
/// ```
/// use vox_types::{Facet, Point3};
///
/// let facet = Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// // Area of a right triangle with legs 1 and 1
/// assert!((facet.area() - 0.5).abs() < 1e-10);
///
/// // Winding normal points in +Z
/// let n = facet.geometric_normal().unwrap();
/// assert!((n.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facet {
    /// Face normal as stored in the source file (nominally unit length).
    pub normal: Vector3<f64>,
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Facet {
    /// Create a facet from three vertices and an explicit stored normal.
    #[inline]
    #[must_use]
    pub const fn new(
        normal: Vector3<f64>,
        v0: Point3<f64>,
        v1: Point3<f64>,
        v2: Point3<f64>,
    ) -> Self {
        Self { normal, v0, v1, v2 }
    }

    /// Create a facet from three vertices, deriving the stored normal from
    /// the winding.
    ///
    /// Degenerate triangles get a zero stored normal.
    #[must_use]
    pub fn from_vertices(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        let normal = Self { normal: Vector3::zeros(), v0, v1, v2 }
            .geometric_normal()
            .unwrap_or_else(Vector3::zeros);
        Self { normal, v0, v1, v2 }
    }

    /// Compute the (unnormalized) winding normal via cross product.
    ///
    /// The direction follows the right-hand rule with CCW winding.
    /// The magnitude equals twice the facet's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit winding normal.
    ///
    /// Returns `None` for degenerate facets (zero area).
    ///
    /// # Example
    ///
    /// ```
    /// use vox_types::{Facet, Point3};
    ///
    /// // Collinear vertices have no normal
    /// let degen = Facet::from_vertices(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert!(degen.geometric_normal().is_none());
    /// ```
    #[must_use]
    pub fn geometric_normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the area of the facet.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Check if the facet is degenerate (zero or near-zero area).
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Area threshold below which the facet is degenerate.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.area() < epsilon
    }

    /// Compute the bounding box of the three vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::from_point(self.v0);
        aabb.expand_to_include(&self.v1);
        aabb.expand_to_include(&self.v2);
        aabb
    }

    /// Get the vertices as an array.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Create a new facet with reversed winding (flipped orientation).
    ///
    /// The stored normal is negated to stay consistent.
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            normal: -self.normal,
            v0: self.v0,
            v1: self.v2,
            v2: self.v1,
        }
    }

    /// Translate the facet by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.v0 += offset;
        self.v1 += offset;
        self.v2 += offset;
    }
}
