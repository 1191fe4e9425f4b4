//! VoxForge command line: rasterize an STL solid into a stack of 1-bit BMP
//! slice masks.
//!
//! ```text
//! voxforge input.stl --dpi 360
//! ```
//!
//! Writes `imageNNNNN.bmp` files (index 0 = bottom layer) into a directory
//! named after the input file, or wherever `--output` points.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vox_io::BmpStackWriter;
use vox_slice::{plan, voxelize_into, voxelize_into_parallel, FacetBvh, PlanParams};

/// Convert an STL solid into a stack of 1-bit BMP slice masks.
#[derive(Parser)]
#[command(name = "voxforge")]
#[command(version)]
#[command(about = "Rasterize STL solids into 1-bit BMP slice stacks", long_about = None)]
struct Cli {
    /// Input STL file (binary or ASCII).
    input: PathBuf,

    /// Slicing resolution in dots per inch.
    #[arg(long, default_value_t = 360)]
    dpi: u32,

    /// Output directory (defaults to the input file stem).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sample slices on all cores instead of one at a time.
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.input.exists() {
        bail!("{} does not exist", cli.input.display());
    }
    if cli.dpi == 0 {
        bail!("invalid DPI: 0");
    }

    let output = cli.output.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map_or_else(|| PathBuf::from("slices"), PathBuf::from)
    });

    let mesh = vox_io::load_stl(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let params = PlanParams::from_dpi(cli.dpi);
    let plan = plan(mesh, &params).context("failed to plan voxel grid")?;
    let grid = plan.grid;

    let mut sink = BmpStackWriter::create(&output, &grid)
        .with_context(|| format!("cannot write to {}", output.display()))?;

    let bvh = FacetBvh::build(&plan.mesh);
    info!(parallel = cli.parallel, "starting conversion");

    if cli.parallel {
        voxelize_into_parallel(&bvh, &grid, &mut sink)?;
    } else {
        voxelize_into(&bvh, &grid, &mut sink)?;
    }

    println!(
        "Images ({}x{}, {} dpi, {} slices) saved to {}.",
        grid.nx,
        grid.ny,
        cli.dpi,
        grid.nz,
        output.display()
    );

    Ok(())
}
