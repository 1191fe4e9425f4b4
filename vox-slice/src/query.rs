//! Surface queries: nearest ray hit with orientation.
//!
//! The sampler is written purely against [`SurfaceQuery`], so the
//! exhaustive scan, the BVH, and any future hardware-backed rasterizer are
//! interchangeable behind the same seam.

use nalgebra::{Point3, Vector3};
use vox_types::{Facet, TriMesh};

/// Tolerance for the Möller–Trumbore determinant and the near-plane cutoff.
pub(crate) const RAY_EPSILON: f64 = 1e-10;

/// A ray in world space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin.
    pub origin: Point3<f64>,
    /// Ray direction (not required to be normalized; depths are in units of
    /// its length).
    pub dir: Vector3<f64>,
}

impl Ray {
    /// Create a ray.
    #[inline]
    #[must_use]
    pub const fn new(origin: Point3<f64>, dir: Vector3<f64>) -> Self {
        Self { origin, dir }
    }

    /// Create a ray pointing straight down (-z), the slicing direction.
    #[inline]
    #[must_use]
    pub fn downward(origin: Point3<f64>) -> Self {
        Self::new(origin, -Vector3::z())
    }
}

/// The nearest surface found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter at the intersection.
    pub depth: f64,
    /// Whether the winding normal of the hit facet points away from the ray
    /// origin (the ray is exiting material).
    pub back_face: bool,
    /// Index of the hit facet in mesh order.
    pub facet: u32,
}

/// Nearest-hit query over a mesh surface.
///
/// Exact depth ties are broken by the lower facet index, so every
/// implementation returns the same hit for the same ray regardless of
/// traversal order.
pub trait SurfaceQuery {
    /// Find the nearest intersection at `depth >= 0` along the ray, if any.
    fn nearest_hit(&self, ray: &Ray) -> Option<SurfaceHit>;
}

/// Intersect a ray with one facet (Möller–Trumbore).
///
/// Returns `(depth, back_face)`. The facing comes from the sign of the
/// determinant, i.e. from the winding, not from the stored normal.
/// Degenerate facets (determinant below epsilon, which covers zero area)
/// produce no hit.
pub(crate) fn ray_facet_intersect(ray: &Ray, facet: &Facet) -> Option<(f64, bool)> {
    let edge1 = facet.v1 - facet.v0;
    let edge2 = facet.v2 - facet.v0;

    let h = ray.dir.cross(&edge2);
    let a = edge1.dot(&h);

    // Parallel or degenerate
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - facet.v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.dir.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);

    if t > RAY_EPSILON {
        // a = -dir . (e1 x e2): negative determinant means the winding
        // normal points along the ray
        Some((t, a < 0.0))
    } else {
        None
    }
}

/// Decide whether a candidate hit beats the current best.
///
/// Strictly nearer wins; exact ties go to the lower facet index.
pub(crate) fn hit_improves(best: Option<&SurfaceHit>, depth: f64, facet: u32) -> bool {
    match best {
        None => true,
        Some(b) => depth < b.depth || (depth == b.depth && facet < b.facet),
    }
}

/// Exhaustive nearest-hit scan over every facet.
///
/// O(facets) per ray — the reference implementation the accelerated
/// [`crate::FacetBvh`] must agree with bit-for-bit.
#[derive(Debug)]
pub struct LinearScan<'a> {
    mesh: &'a TriMesh,
}

impl<'a> LinearScan<'a> {
    /// Create a scan over the given mesh.
    #[inline]
    #[must_use]
    pub const fn new(mesh: &'a TriMesh) -> Self {
        Self { mesh }
    }
}

impl SurfaceQuery for LinearScan<'_> {
    fn nearest_hit(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut best: Option<SurfaceHit> = None;

        #[allow(clippy::cast_possible_truncation)]
        // Truncation: facet indices are u32, meshes beyond that are unsupported
        for (i, facet) in self.mesh.iter().enumerate() {
            if let Some((depth, back_face)) = ray_facet_intersect(ray, facet) {
                let index = i as u32;
                if hit_improves(best.as_ref(), depth, index) {
                    best = Some(SurfaceHit {
                        depth,
                        back_face,
                        facet: index,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vox_types::cube;

    fn xy_facet() -> Facet {
        // CCW from above: winding normal +Z
        Facet::from_vertices(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 10.0, 0.0),
        )
    }

    #[test]
    fn ray_hits_facet() {
        let ray = Ray::downward(Point3::new(5.0, 3.0, 5.0));
        let hit = ray_facet_intersect(&ray, &xy_facet());

        let (t, back) = hit.unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-10);
        // Downward ray against an up-facing facet: front face
        assert!(!back);
    }

    #[test]
    fn ray_sees_back_of_reversed_facet() {
        let ray = Ray::downward(Point3::new(5.0, 3.0, 5.0));
        let hit = ray_facet_intersect(&ray, &xy_facet().reversed());

        let (_, back) = hit.unwrap();
        assert!(back);
    }

    #[test]
    fn ray_misses_facet() {
        let ray = Ray::downward(Point3::new(100.0, 100.0, 5.0));
        assert!(ray_facet_intersect(&ray, &xy_facet()).is_none());
    }

    #[test]
    fn ray_parallel_to_facet() {
        let ray = Ray::new(Point3::new(5.0, 3.0, 5.0), Vector3::x());
        assert!(ray_facet_intersect(&ray, &xy_facet()).is_none());
    }

    #[test]
    fn hits_behind_origin_are_ignored() {
        let ray = Ray::downward(Point3::new(5.0, 3.0, -1.0));
        assert!(ray_facet_intersect(&ray, &xy_facet()).is_none());
    }

    #[test]
    fn degenerate_facet_is_skipped() {
        let degen = Facet::from_vertices(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        let ray = Ray::downward(Point3::new(0.5, 0.0, 5.0));
        assert!(ray_facet_intersect(&ray, &degen).is_none());
    }

    #[test]
    fn linear_scan_finds_nearest() {
        // From inside a cube, the nearest surface below is the bottom face,
        // whose winding normal points away from the ray: back face.
        let mesh = cube(10.0);
        let query = LinearScan::new(&mesh);

        let hit = query
            .nearest_hit(&Ray::downward(Point3::new(5.0, 5.0, 5.0)))
            .unwrap();
        assert_relative_eq!(hit.depth, 5.0, epsilon = 1e-10);
        assert!(hit.back_face);
    }

    #[test]
    fn linear_scan_above_solid_sees_front_face() {
        let mesh = cube(10.0);
        let query = LinearScan::new(&mesh);

        let hit = query
            .nearest_hit(&Ray::downward(Point3::new(5.0, 5.0, 20.0)))
            .unwrap();
        // Nearest surface is the top of the cube, facing the ray
        assert_relative_eq!(hit.depth, 10.0, epsilon = 1e-10);
        assert!(!hit.back_face);
    }

    #[test]
    fn linear_scan_miss() {
        let mesh = cube(10.0);
        let query = LinearScan::new(&mesh);
        assert!(query
            .nearest_hit(&Ray::downward(Point3::new(50.0, 50.0, 5.0)))
            .is_none());
    }

    #[test]
    fn depth_ties_go_to_first_facet() {
        // Two coincident facets; the first in mesh order must win.
        let mut mesh = TriMesh::new();
        mesh.push(xy_facet());
        mesh.push(xy_facet());
        let query = LinearScan::new(&mesh);

        let hit = query
            .nearest_hit(&Ray::downward(Point3::new(5.0, 3.0, 5.0)))
            .unwrap();
        assert_eq!(hit.facet, 0);
    }
}
