//! # Comparison Module
//!
//! Tolerance-aware structural comparison of sections and spectra, used to
//! check that a dataset survives a serialization round trip.
//!
//! Two sections are equal when they share mode, local variable definitions,
//! per-variable settings (peak root, default value, continuous range) and
//! item count, and every item matches value by value within a relative
//! tolerance. Values are compared after substitution of omitted values; two
//! omitted values are equal. Extra info is compared too (unless disabled),
//! an empty [`ExtraInfo`] counting as no extra info at all.

mod report;

#[cfg(test)]
mod tests;

use crate::config::{CompareConfig, DEFAULT_RELATIVE_TOLERANCE};
use crate::section::{DataSection, ExtraInfo};
use crate::spectrum::SpectrumData;
use crate::variable::VariableDefinition;

pub use report::{ComparisonReport, Difference};

/// Item differences listed per section before the rest are only counted
const MAX_LISTED_ITEM_DIFFERENCES: usize = 10;

/// Comparison settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonOptions {
    /// Relative tolerance for float equality
    pub tolerance: f64,
    /// Whether per-item extra info takes part in the comparison
    pub compare_extra_info: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_RELATIVE_TOLERANCE,
            compare_extra_info: true,
        }
    }
}

impl From<&CompareConfig> for ComparisonOptions {
    fn from(config: &CompareConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            compare_extra_info: config.extra_info,
        }
    }
}

/// Relative float equality; both NaN counts as equal
pub fn values_equal(a: f64, b: f64, tolerance: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

fn extra_info_equal(a: Option<&ExtraInfo>, b: Option<&ExtraInfo>) -> bool {
    let a = a.filter(|e| !e.is_empty());
    let b = b.filter(|e| !e.is_empty());
    a == b
}

fn compare_variables(
    report: &mut ComparisonReport,
    path: &str,
    a: &[VariableDefinition],
    b: &[VariableDefinition],
) {
    if a.len() != b.len() {
        report.push(
            path,
            format!("{} variables vs {}", a.len(), b.len()),
        );
        return;
    }
    for (va, vb) in a.iter().zip(b) {
        let same = va.symbol == vb.symbol
            && va.dependency == vb.dependency
            && va.internal_unit == vb.internal_unit
            && va.actual_external_unit() == vb.actual_external_unit()
            && va.name == vb.name;
        if !same {
            report.push(
                format!("{} / variable '{}'", path, va.symbol),
                format!("{} vs {}", va, vb),
            );
        }
    }
}

fn optional_values_equal(a: Option<f64>, b: Option<f64>, tolerance: f64) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => values_equal(a, b, tolerance),
        (None, None) => true,
        _ => false,
    }
}

/// Peak roots, default values and continuous ranges of the shared variables
fn compare_settings(
    report: &mut ComparisonReport,
    path: &str,
    a: &DataSection,
    b: &DataSection,
    tolerance: f64,
) {
    for symbol in a.variable_symbols() {
        if !b.has_variable(symbol) {
            continue;
        }
        let var_path = format!("{} / variable '{}'", path, symbol);
        let (root_a, root_b) = (a.peak_root(symbol), b.peak_root(symbol));
        if !optional_values_equal(root_a, root_b, tolerance) {
            report.push(
                var_path.clone(),
                format!("peak root {:?} vs {:?}", root_a, root_b),
            );
        }
        let (default_a, default_b) = (a.default_value(symbol), b.default_value(symbol));
        if !optional_values_equal(default_a, default_b, tolerance) {
            report.push(
                var_path.clone(),
                format!("default value {:?} vs {:?}", default_a, default_b),
            );
        }
        let (range_a, range_b) = (a.continuous_range(symbol), b.continuous_range(symbol));
        let ranges_match = match (range_a, range_b) {
            (Some(ra), Some(rb)) => {
                values_equal(ra.from_value, rb.from_value, tolerance)
                    && values_equal(ra.to_value, rb.to_value, tolerance)
            }
            (None, None) => true,
            _ => false,
        };
        if !ranges_match {
            report.push(
                var_path,
                format!("continuous range {:?} vs {:?}", range_a, range_b),
            );
        }
    }
}

fn compare_sections_into(
    report: &mut ComparisonReport,
    path: &str,
    a: &DataSection,
    b: &DataSection,
    options: &ComparisonOptions,
) {
    if a.mode() != b.mode() {
        report.push(path, format!("mode {} vs {}", a.mode(), b.mode()));
    }
    compare_variables(report, path, a.variables(), b.variables());
    compare_settings(report, path, a, b, options.tolerance);
    if a.len() != b.len() {
        report.push(path, format!("{} items vs {}", a.len(), b.len()));
        return;
    }
    if a.variables().len() != b.variables().len() {
        return;
    }

    let mut listed = 0;
    for (index, (item_a, item_b)) in a.iter().zip(b.iter()).enumerate() {
        let values_match = item_a
            .iter()
            .zip(&item_b)
            .all(|(x, y)| values_equal(*x, *y, options.tolerance));
        let extras_match = !options.compare_extra_info
            || extra_info_equal(a.extra_info_at(index), b.extra_info_at(index));

        let mut details = Vec::new();
        if !values_match {
            details.push(format!("values {:?} vs {:?}", item_a, item_b));
        }
        if !extras_match {
            details.push(format!(
                "extra info {:?} vs {:?}",
                a.extra_info_at(index),
                b.extra_info_at(index)
            ));
        }
        for detail in details {
            if listed < MAX_LISTED_ITEM_DIFFERENCES {
                report.push(format!("{} / item {}", path, index), detail);
                listed += 1;
            } else {
                report.omitted += 1;
            }
        }
    }
}

/// Compare two sections
pub fn compare_sections(
    a: &DataSection,
    b: &DataSection,
    options: &ComparisonOptions,
) -> ComparisonReport {
    let mut report = ComparisonReport::new();
    let path = format!("section '{}'", a.name());
    compare_sections_into(&mut report, &path, a, b, options);
    report
}

/// Compare two spectra: type, title, variables, parameters and every section
/// pairwise by index. Identifiers are not compared.
pub fn compare_spectra(
    a: &SpectrumData,
    b: &SpectrumData,
    options: &ComparisonOptions,
) -> ComparisonReport {
    let mut report = ComparisonReport::new();

    if a.spectrum_type() != b.spectrum_type() {
        report.push(
            "spectrum",
            format!("type {} vs {}", a.spectrum_type(), b.spectrum_type()),
        );
    }
    if a.title() != b.title() {
        report.push(
            "spectrum",
            format!("title {:?} vs {:?}", a.title(), b.title()),
        );
    }
    compare_variables(&mut report, "spectrum", a.variables(), b.variables());

    let params_a = a.parameters();
    let params_b = b.parameters();
    for key in params_a.keys().chain(params_b.keys().filter(|k| !params_a.contains_key(*k))) {
        let path = format!("parameter '{}'", key);
        match (params_a.get(key), params_b.get(key)) {
            (Some(pa), Some(pb)) => {
                if !values_equal(pa.value, pb.value, options.tolerance) || pa.unit != pb.unit {
                    report.push(path, format!("{:?} vs {:?}", pa, pb));
                }
            }
            (Some(_), None) => report.push(path, "missing in second spectrum"),
            (None, Some(_)) => report.push(path, "missing in first spectrum"),
            (None, None) => {}
        }
    }

    if a.section_count() != b.section_count() {
        report.push(
            "spectrum",
            format!("{} sections vs {}", a.section_count(), b.section_count()),
        );
        return report;
    }
    for (index, (sa, sb)) in a.sections().iter().zip(b.sections()).enumerate() {
        let path = format!("section {} '{}'", index, sa.name());
        compare_sections_into(&mut report, &path, sa, sb, options);
    }
    report
}

/// Whether two sections are equal under `options`
pub fn sections_equal(a: &DataSection, b: &DataSection, options: &ComparisonOptions) -> bool {
    compare_sections(a, b, options).is_equal()
}

/// Whether two spectra are equal under `options`
pub fn spectra_equal(a: &SpectrumData, b: &SpectrumData, options: &ComparisonOptions) -> bool {
    compare_spectra(a, b, options).is_equal()
}
