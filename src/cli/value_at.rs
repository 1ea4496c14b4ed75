use anyhow::{Context, Result};
use std::path::PathBuf;

use spectral_engine::prelude::*;
use spectral_engine::snapshot;

/// Look up the item at `x` in one section of a snapshot
pub fn run(file: PathBuf, x: f64, section: Option<usize>, config: EngineConfig) -> Result<()> {
    let mut spectrum = snapshot::load(&file).context("Failed to read spectrum snapshot")?;
    spectrum.set_config(config);

    if let Some(index) = section {
        spectrum
            .set_active_section(index)
            .with_context(|| format!("No section {} in {}", index, file.display()))?;
    }
    let Some(active) = spectrum.active_section() else {
        anyhow::bail!(
            "{} has {} sections and none is active; pass --section",
            file.display(),
            spectrum.section_count()
        );
    };
    let name = active.name().to_string();
    let symbols: Vec<String> = active
        .variable_symbols()
        .into_iter()
        .map(str::to_string)
        .collect();

    match spectrum.value_at(x)? {
        Some(item) => {
            println!("Section '{}' at {}:", name, x);
            for (symbol, value) in symbols.iter().zip(&item) {
                let external = spectrum.to_external_value(symbol, *value).ok();
                match (external, spectrum.variable(symbol)) {
                    (Some(external), Some(var)) if var.needs_conversion() => println!(
                        "  {} = {} {} ({} {})",
                        symbol,
                        value,
                        var.internal_unit,
                        external,
                        var.actual_external_unit()
                    ),
                    (_, Some(var)) => println!("  {} = {} {}", symbol, value, var.internal_unit),
                    (_, None) => println!("  {} = {}", symbol, value),
                }
            }
        }
        None => println!("Section '{}' has no value at {}", name, x),
    }
    Ok(())
}
