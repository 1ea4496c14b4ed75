use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use spectral_engine::prelude::*;
use spectral_engine::snapshot;

/// Observe frequency of the demo spectrometer, MHz
const OBSERVE_FREQUENCY_MHZ: f64 = 400.0;

/// Sampled points of the demo curve
const CURVE_POINTS: usize = 4096;

/// Demo lines: (position in ppm, height, half width in Hz, multiplicity)
const LINES: &[(f64, f64, f64, &str)] = &[
    (1.21, 3.0, 1.5, "t"),
    (3.65, 2.0, 1.5, "q"),
    (7.26, 0.4, 0.8, "s"),
];

/// Generate a demo NMR spectrum snapshot
pub fn run(output: PathBuf) -> Result<()> {
    info!("spectral-inspect - demo NMR spectrum");
    info!("====================================");

    let spectrum = build_demo_spectrum()?;
    info!(
        "Built spectrum with {} sections ({} curve points)",
        spectrum.section_count(),
        CURVE_POINTS
    );

    snapshot::save(&spectrum, &output)
        .with_context(|| format!("Failed to write snapshot {}", output.display()))?;

    println!("Wrote demo spectrum to {}", output.display());
    Ok(())
}

fn lorentzian(x: f64, center: f64, half_width: f64, height: f64) -> f64 {
    let d = (x - center) / half_width;
    height / (1.0 + d * d)
}

fn build_demo_spectrum() -> Result<SpectrumData> {
    let mut spectrum = SpectrumData::new(
        SpectrumType::Nmr,
        vec![
            VariableDefinition::independent("x", "Hz")
                .with_external_unit("ppm")
                .with_name("chemical shift"),
            VariableDefinition::dependent("y", "arb").with_name("intensity"),
        ],
    )?;
    spectrum.set_title("Demo 1H spectrum (ethanol-like)");
    spectrum.set_parameter(OBSERVE_FREQUENCY_PARAM, OBSERVE_FREQUENCY_MHZ, Some("MHz"));
    spectrum.set_parameter("Temperature", 298.0, Some("K"));

    let hz = |ppm: f64| ppm * OBSERVE_FREQUENCY_MHZ;
    let from_hz = 0.0;
    let to_hz = hz(10.0);

    // sampled curve, abscissae stored as a range
    let curve = spectrum.create_section("spectrum", &[], DataMode::Continuous)?;
    let section = spectrum
        .section_mut(curve)
        .context("Curve section vanished")?;
    section.set_continuous_range("x", from_hz, to_hz)?;
    for i in 0..CURVE_POINTS {
        let x = from_hz + (to_hz - from_hz) * i as f64 / (CURVE_POINTS - 1) as f64;
        let y: f64 = LINES
            .iter()
            .map(|&(ppm, height, width, _)| lorentzian(x, hz(ppm), width, height))
            .sum();
        section.append_item(ItemInput::keyed([("y", y)]))?;
    }

    // peak table
    let peaks = spectrum.create_section("peaks", &[], DataMode::Peak)?;
    let section = spectrum
        .section_mut(peaks)
        .context("Peak section vanished")?;
    section.set_peak_root("y", 0.0)?;
    for &(ppm, height, _, multiplicity) in LINES {
        let extra = ExtraInfo::default()
            .with_shape(PeakShape::Sharp)
            .with_multiplicity(multiplicity.parse().unwrap_or(PeakMultiplicity::Multiplet));
        section.append_item_with_extra(vec![hz(ppm), height], extra)?;
    }
    section.sort();

    spectrum.set_active_section(curve)?;
    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_spectrum_is_consistent() {
        let spectrum = build_demo_spectrum().unwrap();
        assert_eq!(spectrum.section_count(), 2);
        assert_eq!(spectrum.section(0).unwrap().len(), CURVE_POINTS);

        let peaks = spectrum.section_by_name("peaks").unwrap();
        assert_eq!(peaks.len(), LINES.len());
        assert!(peaks.is_sorted());

        let ppm = spectrum
            .external_range_of("x", RangeOptions::default())
            .unwrap()
            .unwrap();
        assert!((ppm.max - 10.0).abs() < 1e-9);
    }
}
