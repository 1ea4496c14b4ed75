use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use spectral_engine::prelude::*;
use spectral_engine::snapshot;

/// Compare two snapshots; fails when they differ
pub fn run(
    first: PathBuf,
    second: PathBuf,
    tolerance: Option<f64>,
    config: EngineConfig,
) -> Result<()> {
    let a = snapshot::load(&first)
        .with_context(|| format!("Failed to read {}", first.display()))?;
    let b = snapshot::load(&second)
        .with_context(|| format!("Failed to read {}", second.display()))?;

    let mut options = ComparisonOptions::from(&config.compare);
    if let Some(tolerance) = tolerance {
        if tolerance.is_nan() || tolerance < 0.0 {
            anyhow::bail!("Tolerance must be a non-negative number, got {}", tolerance);
        }
        options.tolerance = tolerance;
    }
    info!(
        "Comparing {} and {} (tolerance {})",
        first.display(),
        second.display(),
        options.tolerance
    );

    let report = compare_spectra(&a, &b, &options);
    println!("{}", report.format_colored());

    if !report.is_equal() {
        anyhow::bail!("Spectra differ ({} differences)", report.difference_count());
    }
    Ok(())
}
