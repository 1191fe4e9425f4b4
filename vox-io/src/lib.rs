//! I/O collaborators for the VoxForge pipeline.
//!
//! Everything in this crate sits outside the geometric core:
//!
//! - [`load_stl`] - STL front-end (binary and ASCII, auto-detected)
//! - [`BmpStackWriter`] - persists packed slices as a stack of 1-bit BMP
//!   files, one per layer, lowest index at the bottom of the solid
//! - [`write_bmp`] and the header codecs it is built from
//!
//! The core hands this crate packed scanlines plus grid metadata through
//! the [`vox_slice::SliceSink`] trait and never performs file I/O itself.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bmp;
mod error;
mod stack;
mod stl;

pub use bmp::{pixels_per_meter, write_bmp, BmpFileHeader, BmpInfoHeader, PALETTE, PIXEL_DATA_OFFSET};
pub use error::{IoError, IoResult};
pub use stack::{BmpStackWriter, StackError};
pub use stl::load_stl;
