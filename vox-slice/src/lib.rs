//! Slice-based solid-occupancy sampling for triangle meshes.
//!
//! This crate is the core of the VoxForge pipeline. Given a triangle soup
//! and a voxel pitch, it decides for every voxel column (x, y) and every
//! z-slice whether that voxel lies inside the solid, and packs the result
//! into 1-bit word-aligned scanlines ready for a bitmap container.
//!
//! # Pipeline
//!
//! 1. [`plan`] validates the pitch, rejects empty meshes, clamps and centers
//!    the bounding box, and derives integer grid dimensions.
//! 2. [`sample_slice`] rasterizes one z-slice: a downward ray through every
//!    pixel center, classified by the orientation of the nearest surface.
//! 3. [`pack_slice`] packs each boolean row into an MSB-first, word-aligned
//!    scanline.
//! 4. [`voxelize_into`] / [`voxelize_into_parallel`] drive all slices into a
//!    [`SliceSink`] (e.g. a BMP stack writer).
//!
//! # Example
//!
//! ```
//! use vox_slice::{plan, sample_slice, LinearScan, PlanParams};
//! use vox_types::cube;
//!
//! let plan = plan(cube(10.0), &PlanParams::new(1.0)).unwrap();
//! assert_eq!(plan.grid.nz, 10);
//!
//! let query = LinearScan::new(&plan.mesh);
//! let slice = sample_slice(&query, &plan.grid, 5);
//! assert!(slice.get(5, 5));
//! ```
//!
//! # Limitations
//!
//! Occupancy is classified from a single nearest-hit query per pixel, which
//! assumes the mesh is closed and consistently wound near every sampled
//! point. Self-intersecting or non-manifold input, and double-walled shells
//! thinner than the sampling band, produce unspecified (but deterministic)
//! results. Such input is rasterized as given, never repaired.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bvh;
mod error;
mod pack;
mod pipeline;
mod plan;
mod query;
mod sampler;

pub use bvh::{BvhStats, FacetBvh};
pub use error::{SliceError, SliceResult};
pub use pack::{pack_row, pack_slice, packed_row_len, row_bit};
pub use pipeline::{voxelize_into, voxelize_into_parallel, SliceSink};
pub use plan::{plan, GridSpec, Plan, PlanParams};
pub use query::{LinearScan, Ray, SurfaceHit, SurfaceQuery};
pub use sampler::{sample_slice, SliceOccupancy};
