//! Slice-stack persistence: one BMP file per layer.

use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use vox_slice::{GridSpec, SliceSink};

use crate::bmp::{pixels_per_meter, write_bmp};

/// Errors from the slice-stack writer.
#[derive(Debug, Error)]
pub enum StackError {
    /// Output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A slice file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Writes each slice as `imageNNNNN.bmp` in an output directory.
///
/// File indices equal slice indices: index 0 is the bottom layer, so
/// downstream consumers see "layer 0 at the bottom" regardless of the order
/// slices were sampled in.
///
/// Files already written stay on disk if a later slice fails; partial
/// stacks from mid-stream I/O failures are the documented cost of writing
/// incrementally.
#[derive(Debug)]
pub struct BmpStackWriter {
    dir: PathBuf,
    width: u32,
    height: u32,
    ppm: i32,
}

impl BmpStackWriter {
    /// Create the output directory and a writer for the given grid.
    ///
    /// # Errors
    ///
    /// [`StackError::CreateDir`] if the directory cannot be created.
    pub fn create(dir: impl AsRef<Path>, grid: &GridSpec) -> Result<Self, StackError> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir).map_err(|source| StackError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        info!(dir = %dir.display(), slices = grid.nz, "writing slice stack");

        Ok(Self {
            dir,
            width: grid.nx,
            height: grid.ny,
            ppm: pixels_per_meter(grid.pitch),
        })
    }

    /// Path of the file for a slice index.
    #[must_use]
    pub fn slice_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("image{index:05}.bmp"))
    }
}

impl SliceSink for BmpStackWriter {
    type Error = StackError;

    fn write_slice(&mut self, index: u32, rows: &[Vec<u8>]) -> Result<(), StackError> {
        let path = self.slice_path(index);
        let wrap = |source| StackError::Write {
            path: path.clone(),
            source,
        };

        let file = File::create(&path).map_err(wrap)?;
        let mut writer = BufWriter::new(file);
        write_bmp(&mut writer, self.width, self.height, self.ppm, rows).map_err(wrap)?;
        writer.into_inner().map_err(|e| wrap(e.into_error()))?;
        Ok(())
    }
}
