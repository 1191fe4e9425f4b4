//! Per-slice solid-occupancy sampling.

use nalgebra::Point3;
use tracing::trace;

use crate::plan::GridSpec;
use crate::query::{Ray, SurfaceQuery};

/// A 2D boolean occupancy grid for one z-slice.
///
/// Row-major, row 0 = lowest y. Produced fresh per slice and handed straight
/// to the packer; nothing is retained across slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceOccupancy {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SliceOccupancy {
    /// Create an all-empty grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Grid width (x voxel count).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height (y voxel count).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the occupancy of pixel `(x, y)`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Set the occupancy of pixel `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        self.bits[y as usize * self.width as usize + x as usize] = solid;
    }

    /// Iterate over rows, bottom to top.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.bits.chunks_exact(self.width.max(1) as usize)
    }

    /// Count the solid pixels.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Sample the solid occupancy of one z-slice.
///
/// For every pixel center in the slice plane a ray is cast straight down.
/// The pixel is solid exactly when the nearest surface below the plane is
/// back-facing — the ray starts inside material and exits through it. No
/// surface below, or a front-facing one, means the column is empty at this
/// height.
///
/// This single-nearest-hit classification assumes the mesh is closed and
/// consistently wound near the sampled point; it does not parity-count the
/// full ray. The result is a pure function of mesh, grid, and index —
/// sampling the same slice twice is bit-identical.
#[must_use]
pub fn sample_slice<Q: SurfaceQuery>(query: &Q, grid: &GridSpec, slice: u32) -> SliceOccupancy {
    let mut occupancy = SliceOccupancy::new(grid.nx, grid.ny);
    let z = grid.slice_plane_z(slice);

    for j in 0..grid.ny {
        for i in 0..grid.nx {
            let (x, y) = grid.pixel_center(i, j);
            let ray = Ray::downward(Point3::new(x, y, z));
            let solid = query.nearest_hit(&ray).is_some_and(|hit| hit.back_face);
            occupancy.set(i, j, solid);
        }
    }

    trace!(
        slice,
        z,
        solid = occupancy.solid_count(),
        "sampled slice occupancy"
    );

    occupancy
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::{plan, PlanParams};
    use crate::query::LinearScan;
    use vox_types::{cube, Facet, TriMesh};

    #[test]
    fn cube_slices_are_fully_solid() {
        let plan = plan(cube(10.0), &PlanParams::new(1.0)).unwrap();
        let query = LinearScan::new(&plan.mesh);

        assert_eq!(plan.grid.nz, 10);
        for slice in 0..plan.grid.nz {
            let occ = sample_slice(&query, &plan.grid, slice);
            assert_eq!(occ.width(), 10);
            assert_eq!(occ.height(), 10);
            assert_eq!(occ.solid_count(), 100, "slice {slice} not fully solid");
        }
    }

    #[test]
    fn sampling_is_idempotent() {
        let plan = plan(cube(10.0), &PlanParams::new(1.0)).unwrap();
        let query = LinearScan::new(&plan.mesh);

        let first = sample_slice(&query, &plan.grid, 4);
        let second = sample_slice(&query, &plan.grid, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_above_and_below_the_solid() {
        // A 10x10x4 box spanning z in [3, 7], plus a degenerate sliver
        // stretching the bounding box to z in [0, 10]. The sliver has zero
        // area, so it must contribute nothing to any slice.
        let mut box_mesh = cube(10.0);
        box_mesh.facets.iter_mut().for_each(|f| {
            f.v0.z = f.v0.z * 0.4 + 3.0;
            f.v1.z = f.v1.z * 0.4 + 3.0;
            f.v2.z = f.v2.z * 0.4 + 3.0;
        });

        let mut mesh = TriMesh::new();
        for facet in box_mesh.iter() {
            mesh.push(*facet);
        }
        mesh.push(Facet::from_vertices(
            nalgebra::Point3::new(0.0, 0.0, 0.0),
            nalgebra::Point3::new(0.0, 0.0, 10.0),
            nalgebra::Point3::new(0.0, 0.0, 5.0),
        ));

        let plan = plan(mesh, &PlanParams::new(1.0)).unwrap();
        assert_eq!(plan.grid.nz, 10);
        let query = LinearScan::new(&plan.mesh);

        for slice in 0..plan.grid.nz {
            let occ = sample_slice(&query, &plan.grid, slice);
            let z = plan.grid.slice_plane_z(slice);
            if (3.0..7.0).contains(&z) {
                assert_eq!(occ.solid_count(), 100, "slice {slice} (z={z}) should be solid");
            } else {
                assert_eq!(occ.solid_count(), 0, "slice {slice} (z={z}) should be empty");
            }
        }
    }

    #[test]
    fn convex_solid_covers_a_contiguous_block() {
        // A 4x4 cube inside a 10-pixel-wide grid: the occupied pixels of a
        // middle slice form one axis-aligned block, nothing scattered.
        let mut mesh = cube(4.0);
        // Stretch bounds with a degenerate sliver so the grid is 10 wide
        mesh.push(Facet::from_vertices(
            nalgebra::Point3::new(-3.0, -3.0, 0.0),
            nalgebra::Point3::new(7.0, 7.0, 0.0),
            nalgebra::Point3::new(-3.0, -3.0, 0.0),
        ));

        let plan = plan(mesh, &PlanParams::new(1.0)).unwrap();
        assert_eq!((plan.grid.nx, plan.grid.ny), (10, 10));
        let query = LinearScan::new(&plan.mesh);

        let occ = sample_slice(&query, &plan.grid, 1);
        assert_eq!(occ.solid_count(), 16);

        // Solid pixels form a single contiguous rectangle
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0, 0);
        for y in 0..occ.height() {
            for x in 0..occ.width() {
                if occ.get(x, y) {
                    min = (min.0.min(x), min.1.min(y));
                    max = (max.0.max(x), max.1.max(y));
                }
            }
        }
        let area = (max.0 - min.0 + 1) * (max.1 - min.1 + 1);
        assert_eq!(area as usize, occ.solid_count());
    }
}
