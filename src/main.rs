//! # spectral-inspect
//!
//! A command-line tool for spectrum snapshots written by `spectral_engine`.
//!
//! ## Usage
//!
//! ```bash
//! # Write a demo NMR spectrum
//! spectral-inspect demo demo_nmr.spectrum.json
//!
//! # Show its structure
//! spectral-inspect info demo_nmr.spectrum.json
//!
//! # Interpolated lookup at 1200 Hz
//! spectral-inspect value-at demo_nmr.spectrum.json 1200
//!
//! # Compare two snapshots
//! spectral-inspect compare a.spectrum.json b.spectrum.json --tolerance 1e-6
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
