use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "racesim",
    about = "A lap-based stock-car race simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Simulate the race tick by tick in real-time and log the leader
    #[clap(short, long)]
    pub realtime: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of simulation runs (only for non-real-time mode), every run draws the open grid
    /// positions with its own seed
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the simulation parameter file
    #[clap(short, long)]
    pub parfile_path: PathBuf,

    /// Set path to a calibration file overriding the default model constants
    #[clap(short, long)]
    pub calibration_path: Option<PathBuf>,

    /// Set real-time factor (only relevant in real-time mode)
    #[clap(short = 'f', long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set tick size in milliseconds of race time (only relevant in real-time mode)
    #[clap(short, long, default_value = "100")]
    pub tick_ms: f64,

    /// Set path of the csv results file (default: output/last_run.csv)
    #[clap(short, long)]
    pub output_path: Option<PathBuf>,
}
