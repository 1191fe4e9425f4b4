//! Driving a full slice stack into a sink.
//!
//! The sink is the collaborator boundary: the core hands over packed
//! scanlines plus a slice index and never touches the filesystem itself.

use rayon::prelude::*;
use std::sync::mpsc;
use tracing::{debug, info};

use crate::pack::pack_slice;
use crate::plan::GridSpec;
use crate::query::SurfaceQuery;
use crate::sampler::sample_slice;

/// Receiver of completed slices.
///
/// Index 0 is the bottom layer of the stack. Implementations own all I/O
/// concerns (file naming, container format, atomicity); slices already
/// accepted are never retracted by the core.
pub trait SliceSink {
    /// Error type surfaced by the sink.
    type Error;

    /// Persist one slice. `rows` holds one packed scanline per grid row,
    /// bottom row first.
    ///
    /// # Errors
    ///
    /// Implementation-defined; a sink error aborts the run.
    fn write_slice(&mut self, index: u32, rows: &[Vec<u8>]) -> Result<(), Self::Error>;
}

/// Sample, pack, and emit every slice of the grid, one at a time.
///
/// The simplest safe schedule: exactly one slice is in flight, so memory
/// use is one occupancy grid regardless of stack height.
///
/// # Errors
///
/// Returns the first sink error; no further slices are sampled after one.
pub fn voxelize_into<Q, S>(query: &Q, grid: &GridSpec, sink: &mut S) -> Result<(), S::Error>
where
    Q: SurfaceQuery,
    S: SliceSink,
{
    info!(
        nx = grid.nx,
        ny = grid.ny,
        nz = grid.nz,
        "sampling slice stack"
    );

    for slice in 0..grid.nz {
        let occupancy = sample_slice(query, grid, slice);
        let rows = pack_slice(&occupancy);
        sink.write_slice(slice, &rows)?;
        debug!(slice, of = grid.nz, "slice emitted");
    }

    Ok(())
}

/// Sample slices on rayon workers while the sink consumes on this thread.
///
/// In-flight slices are bounded by a channel sized to twice the worker
/// count, so a slow sink backpressures sampling instead of letting
/// sampled-but-unwritten slices pile up. Slices arrive at the sink in
/// whatever order workers finish; indices identify them.
///
/// # Errors
///
/// Returns the first sink error. Workers stop promptly once the channel
/// closes; slices already handed over stay written.
pub fn voxelize_into_parallel<Q, S>(query: &Q, grid: &GridSpec, sink: &mut S) -> Result<(), S::Error>
where
    Q: SurfaceQuery + Sync,
    S: SliceSink + Send,
    S::Error: Send,
{
    let workers = rayon::current_num_threads();
    info!(
        nx = grid.nx,
        ny = grid.ny,
        nz = grid.nz,
        workers,
        "sampling slice stack in parallel"
    );

    let (tx, rx) = mpsc::sync_channel::<(u32, Vec<Vec<u8>>)>(workers * 2);
    let mut result = Ok(());

    rayon::scope(|scope| {
        scope.spawn(move |_| {
            // A send fails only when the receiver is gone (sink error);
            // try_for_each then stops scheduling further slices.
            let _ = (0..grid.nz).into_par_iter().try_for_each_with(tx, |tx, slice| {
                let occupancy = sample_slice(query, grid, slice);
                let rows = pack_slice(&occupancy);
                tx.send((slice, rows)).map_err(|_| ())
            });
        });

        for (slice, rows) in rx.iter() {
            if let Err(err) = sink.write_slice(slice, &rows) {
                result = Err(err);
                break;
            }
            debug!(slice, of = grid.nz, "slice emitted");
        }
        drop(rx);
    });

    result
}
