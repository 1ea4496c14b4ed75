use anyhow::{Context, Result};
use std::path::PathBuf;

use spectral_engine::prelude::*;
use spectral_engine::snapshot;

/// Display information about a spectrum snapshot
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let spectrum = snapshot::load(&file).context("Failed to read spectrum snapshot")?;

    println!("Spectrum Information");
    println!("====================");
    println!("File: {}", file.display());
    println!("Id: {}", spectrum.id());
    println!("Type: {}", spectrum.spectrum_type());
    if let Some(title) = spectrum.title() {
        println!("Title: {}", title);
    }
    println!();

    println!("Variables:");
    for var in spectrum.variables() {
        println!("  {}", var);
    }
    println!();

    if !spectrum.parameters().is_empty() {
        println!("Parameters:");
        for (key, param) in spectrum.parameters() {
            match &param.unit {
                Some(unit) => println!("  {}: {} {}", key, param.value, unit),
                None => println!("  {}: {}", key, param.value),
            }
        }
        println!();
    }

    println!("Sections:");
    let active = spectrum.active_section_index();
    for (index, section) in spectrum.sections().iter().enumerate() {
        let marker = if active == Some(index) { "*" } else { " " };
        println!(
            "{} {:3}. {} ({}, {} items{})",
            marker,
            index,
            section.name(),
            section.mode(),
            section.len(),
            if section.is_sorted() { ", sorted" } else { "" }
        );
        for var in section.variables() {
            let internal = section
                .range_of(&var.symbol, RangeOptions::default())
                .ok()
                .flatten();
            let external = section
                .external_range_of(
                    &var.symbol,
                    RangeOptions::default(),
                    spectrum.registry(),
                    Some(&spectrum),
                )
                .ok()
                .flatten();
            match (internal, external) {
                (Some(internal), Some(external)) if var.needs_conversion() => println!(
                    "       {}: [{:.6}, {:.6}] {} / [{:.6}, {:.6}] {}",
                    var.symbol,
                    internal.min,
                    internal.max,
                    var.internal_unit,
                    external.min,
                    external.max,
                    var.actual_external_unit()
                ),
                (Some(internal), _) => println!(
                    "       {}: [{:.6}, {:.6}] {}",
                    var.symbol, internal.min, internal.max, var.internal_unit
                ),
                (None, _) => println!("       {}: <empty>", var.symbol),
            }
        }
    }

    Ok(())
}
