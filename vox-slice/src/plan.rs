//! Bounds and grid planning.
//!
//! Turns a raw mesh plus a requested pitch into a centered mesh and an
//! integer voxel grid covering its bounding box.

use nalgebra::{Point3, Vector3};
use tracing::info;
use vox_types::{Aabb, TriMesh};

use crate::error::{SliceError, SliceResult};

/// Millimeters per inch, for DPI-based pitch derivation.
const MM_PER_INCH: f64 = 25.4;

/// Parameters for grid planning.
#[derive(Debug, Clone, Copy)]
pub struct PlanParams {
    /// World units per voxel. Must be positive and finite.
    pub pitch: f64,

    /// Minimum in-plane (x, y) extent in pitch units.
    ///
    /// The bounding box is grown symmetrically to at least this many pitch
    /// units wide and tall before dimensions are derived. The default of 1
    /// only guarantees a well-formed grid; raster backends with a minimum
    /// target size (off-screen framebuffers are commonly 128 and up) can
    /// raise it.
    pub min_plane_extent: u32,
}

impl PlanParams {
    /// Create params for the given pitch with the default extent floor.
    #[inline]
    #[must_use]
    pub const fn new(pitch: f64) -> Self {
        Self {
            pitch,
            min_plane_extent: 1,
        }
    }

    /// Create params from a resolution in dots per inch.
    ///
    /// `pitch = 25.4 / dpi` millimeters. A zero DPI yields an infinite
    /// pitch, which [`plan`] rejects.
    ///
    /// # Example
    ///
    /// ```
    /// use vox_slice::PlanParams;
    ///
    /// let params = PlanParams::from_dpi(254);
    /// assert!((params.pitch - 0.1).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_dpi(dpi: u32) -> Self {
        Self::new(MM_PER_INCH / f64::from(dpi))
    }

    /// Set the minimum in-plane extent in pitch units.
    #[inline]
    #[must_use]
    pub const fn with_min_plane_extent(mut self, extent: u32) -> Self {
        self.min_plane_extent = extent;
        self
    }
}

/// A planned voxel grid: pitch, integer dimensions, and the box it covers.
///
/// Invariants (established by [`plan`]):
/// - `nx`, `ny`, `nz` are each at least 1,
/// - `bounds` is centered on the origin in x and y and has `min.z == 0`,
/// - `n = ceil(bounds_size / pitch)` per axis.
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    /// World units per voxel.
    pub pitch: f64,
    /// Voxel count along x (slice image width).
    pub nx: u32,
    /// Voxel count along y (slice image height).
    pub ny: u32,
    /// Voxel count along z (number of slices).
    pub nz: u32,
    /// The (clamped, centered) box the grid covers, in grid space.
    pub bounds: Aabb,
}

impl GridSpec {
    /// World-space center of pixel `(i, j)` in the slice plane.
    ///
    /// Pixel centers divide the covered box exactly, the way an orthographic
    /// viewport does: column 0 is half a sample in from `bounds.min.x`.
    #[must_use]
    pub fn pixel_center(&self, i: u32, j: u32) -> (f64, f64) {
        let size = self.bounds.size();
        let x = (f64::from(i) + 0.5).mul_add(size.x / f64::from(self.nx), self.bounds.min.x);
        let y = (f64::from(j) + 0.5).mul_add(size.y / f64::from(self.ny), self.bounds.min.y);
        (x, y)
    }

    /// World-space z of the sampling plane for a slice.
    ///
    /// Slice indices count from the bottom of the grid. Planes are anchored
    /// to the top of the box in half-pitch steps, so any sub-pitch slack
    /// sits below the bottom slice — the scan proceeds top-down even though
    /// indices are assigned bottom-up.
    #[must_use]
    pub fn slice_plane_z(&self, slice: u32) -> f64 {
        debug_assert!(slice < self.nz);
        let steps_from_top = f64::from(self.nz - 1 - slice) + 0.5;
        steps_from_top.mul_add(-self.pitch, self.bounds.max.z)
    }
}

/// The output of planning: the grid and the mesh translated into grid space.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The derived voxel grid.
    pub grid: GridSpec,
    /// The mesh, centered in x/y and raised so the box bottom sits at z = 0.
    pub mesh: TriMesh,
}

/// Plan a voxel grid for a mesh at the given pitch.
///
/// - Computes the mesh bounding box and clamps its size to the configured
///   minimums (symmetrically about the box center, before any ceil).
/// - Translates the mesh so the clamped box is centered on the origin in
///   x and y, with the mesh top touching the box top and the box bottom at
///   z = 0.
/// - Derives `ceil(size / pitch)` voxels per axis, each at least 1.
///
/// # Errors
///
/// - [`SliceError::InvalidPitch`] if the pitch is not positive and finite.
/// - [`SliceError::EmptyMesh`] if the mesh has no facets.
///
/// # Example
///
/// ```
/// use vox_slice::{plan, PlanParams};
/// use vox_types::cube;
///
/// let plan = plan(cube(10.0), &PlanParams::new(1.0)).unwrap();
/// assert_eq!((plan.grid.nx, plan.grid.ny, plan.grid.nz), (10, 10, 10));
/// ```
pub fn plan(mut mesh: TriMesh, params: &PlanParams) -> SliceResult<Plan> {
    let pitch = params.pitch;
    if pitch <= 0.0 || !pitch.is_finite() {
        return Err(SliceError::InvalidPitch(pitch));
    }
    if mesh.is_empty() {
        return Err(SliceError::EmptyMesh);
    }

    let raw = mesh.bounds();
    let mut size = raw.size();
    let plane_floor = f64::from(params.min_plane_extent) * pitch;
    size.x = size.x.max(plane_floor);
    size.y = size.y.max(plane_floor);
    // At least one pitch of height, so a flat mesh still yields one slice.
    size.z = size.z.max(pitch);

    let center = raw.center();
    mesh.translate(Vector3::new(-center.x, -center.y, size.z - raw.max.z));

    let bounds = Aabb::new(
        Point3::new(-0.5 * size.x, -0.5 * size.y, 0.0),
        Point3::new(0.5 * size.x, 0.5 * size.y, size.z),
    );

    let grid = GridSpec {
        pitch,
        nx: dim(size.x, pitch),
        ny: dim(size.y, pitch),
        nz: dim(size.z, pitch),
        bounds,
    };

    info!(
        nx = grid.nx,
        ny = grid.ny,
        nz = grid.nz,
        pitch,
        "planned voxel grid"
    );

    Ok(Plan { grid, mesh })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Truncation/sign: the value is ceil of a positive finite ratio, clamped >= 1
fn dim(extent: f64, pitch: f64) -> u32 {
    (extent / pitch).ceil().max(1.0) as u32
}
