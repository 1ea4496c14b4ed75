use super::*;
use crate::section::{DataMode, ItemInput, PeakMultiplicity, PeakShape};
use crate::spectrum::SpectrumType;

fn peak_section() -> DataSection {
    let mut section = DataSection::new(
        "peaks",
        vec![
            VariableDefinition::independent("x", "ppm"),
            VariableDefinition::dependent("y", "arb"),
        ],
        DataMode::Peak,
    )
    .unwrap();
    section
        .append_item_with_extra(
            vec![1.2, 3.0],
            ExtraInfo::default()
                .with_shape(PeakShape::Sharp)
                .with_multiplicity(PeakMultiplicity::Triplet),
        )
        .unwrap();
    section.append_item(vec![3.4, 2.0]).unwrap();
    section
}

#[test]
fn test_values_equal() {
    assert!(values_equal(1.0, 1.0, 0.0));
    assert!(values_equal(f64::NAN, f64::NAN, 0.0));
    assert!(!values_equal(f64::NAN, 1.0, 1.0));
    assert!(values_equal(1000.0, 1000.00001, 1e-7));
    assert!(!values_equal(1000.0, 1000.1, 1e-7));
    assert!(values_equal(0.0, -0.0, 0.0));
}

#[test]
fn test_section_equals_its_clone() {
    let section = peak_section();
    let copy = section.clone();
    let report = compare_sections(&section, &copy, &ComparisonOptions::default());
    assert!(report.is_equal(), "{}", report);
}

#[test]
fn test_value_difference_is_reported() {
    let a = peak_section();
    let mut b = a.clone();
    b.set_item_at(1, vec![3.4, 2.5]).unwrap();

    let report = compare_sections(&a, &b, &ComparisonOptions::default());
    assert!(!report.is_equal());
    assert_eq!(report.differences.len(), 1);
    assert_eq!(report.differences[0].path, "section 'peaks' / item 1");

    let loose = ComparisonOptions {
        tolerance: 0.5,
        ..Default::default()
    };
    assert!(sections_equal(&a, &b, &loose));
}

#[test]
fn test_empty_extra_info_equals_none() {
    let a = peak_section();
    let mut b = a.clone();
    b.set_extra_info_at(1, Some(ExtraInfo::default())).unwrap();
    assert!(sections_equal(&a, &b, &ComparisonOptions::default()));

    b.set_extra_info_at(0, None).unwrap();
    assert!(!sections_equal(&a, &b, &ComparisonOptions::default()));
    let ignore_extra = ComparisonOptions {
        compare_extra_info: false,
        ..Default::default()
    };
    assert!(sections_equal(&a, &b, &ignore_extra));
}

#[test]
fn test_mode_and_variable_mismatch() {
    let a = peak_section();
    let mut b = a.clone();
    b.set_mode(DataMode::Continuous);
    let report = compare_sections(&a, &b, &ComparisonOptions::default());
    assert!(report.differences.iter().any(|d| d.detail.contains("mode")));

    let c = DataSection::new(
        "peaks",
        vec![
            VariableDefinition::independent("x", "Hz"),
            VariableDefinition::dependent("y", "arb"),
        ],
        DataMode::Peak,
    )
    .unwrap();
    let report = compare_sections(&a, &c, &ComparisonOptions::default());
    assert!(report
        .differences
        .iter()
        .any(|d| d.path.contains("variable 'x'")));
    assert!(report.differences.iter().any(|d| d.detail.contains("items")));
}

#[test]
fn test_omitted_values_compare_after_substitution() {
    let vars = vec![
        VariableDefinition::independent("x", "nm"),
        VariableDefinition::dependent("y", "arb"),
    ];
    let mut explicit = DataSection::new("s", vars.clone(), DataMode::Continuous).unwrap();
    explicit.append_item(vec![0.0, 1.0]).unwrap();
    explicit.append_item(vec![10.0, 2.0]).unwrap();

    let mut ranged = DataSection::new("s", vars, DataMode::Continuous).unwrap();
    ranged.set_continuous_range("x", 0.0, 10.0).unwrap();
    ranged.append_item(ItemInput::keyed([("y", 1.0)])).unwrap();
    ranged.append_item(ItemInput::keyed([("y", 2.0)])).unwrap();

    // items match after substitution; only the range setting differs
    let report = compare_sections(&explicit, &ranged, &ComparisonOptions::default());
    assert_eq!(report.differences.len(), 1, "{}", report);
    assert_eq!(report.differences[0].path, "section 's' / variable 'x'");
    assert!(report.differences[0].detail.starts_with("continuous range"));

    let mut also_ranged = explicit.clone();
    also_ranged.set_continuous_range("x", 0.0, 10.0).unwrap();
    assert!(sections_equal(&also_ranged, &ranged, &ComparisonOptions::default()));
}

#[test]
fn test_variable_settings_are_compared() {
    let options = ComparisonOptions::default();
    let mut a = peak_section();
    let mut b = a.clone();
    a.set_peak_root("y", 0.0).unwrap();
    b.set_peak_root("y", 3.0).unwrap();
    let report = compare_sections(&a, &b, &options);
    assert!(!report.is_equal());
    assert_eq!(report.differences[0].path, "section 'peaks' / variable 'y'");
    assert!(report.differences[0].detail.contains("peak root"));

    b.set_peak_root("y", 0.0).unwrap();
    assert!(sections_equal(&a, &b, &options));

    b.set_default_value("y", -1.0).unwrap();
    let report = compare_sections(&a, &b, &options);
    assert!(report.differences.iter().any(|d| d.detail.contains("default value")));

    let mut ranged = a.clone();
    ranged.set_continuous_range("x", 1.2, 3.4).unwrap();
    let report = compare_sections(&a, &ranged, &options);
    assert!(report
        .differences
        .iter()
        .any(|d| d.detail.contains("continuous range")));
}

#[test]
fn test_long_difference_lists_are_truncated() {
    let vars = vec![
        VariableDefinition::independent("x", "s"),
        VariableDefinition::dependent("y", "arb"),
    ];
    let mut a = DataSection::new("s", vars.clone(), DataMode::Continuous).unwrap();
    let mut b = DataSection::new("s", vars, DataMode::Continuous).unwrap();
    for i in 0..25 {
        a.append_item(vec![i as f64, 0.0]).unwrap();
        b.append_item(vec![i as f64, 1.0]).unwrap();
    }
    let report = compare_sections(&a, &b, &ComparisonOptions::default());
    assert_eq!(report.differences.len(), MAX_LISTED_ITEM_DIFFERENCES);
    assert_eq!(report.difference_count(), 25);
    assert!(report.to_string().contains("and 15 more"));
}

#[test]
fn test_compare_spectra() {
    let vars = vec![
        VariableDefinition::independent("x", "Hz"),
        VariableDefinition::dependent("y", "arb"),
    ];
    let mut a = SpectrumData::new(SpectrumType::Nmr, vars.clone()).unwrap();
    a.set_parameter("ObserveFrequency", 400.0, Some("MHz"));
    a.append_item(vec![1.0, 2.0]).unwrap();

    let b = a.clone();
    assert!(spectra_equal(&a, &b, &ComparisonOptions::default()));

    let mut c = SpectrumData::new(SpectrumType::Nmr, vars).unwrap();
    c.set_parameter("ObserveFrequency", 500.0, Some("MHz"));
    let report = compare_spectra(&a, &c, &ComparisonOptions::default());
    assert!(report
        .differences
        .iter()
        .any(|d| d.path == "parameter 'ObserveFrequency'"));
    assert!(report.differences.iter().any(|d| d.detail.contains("sections")));
}

#[test]
fn test_report_formatting() {
    let report = ComparisonReport::new();
    assert!(report.to_string().contains("equal"));
    assert!(report.format_colored().contains("equal"));

    let mut report = ComparisonReport::new();
    report.push("section 'a'", "mode peak vs continuous");
    let text = report.to_string();
    assert!(text.contains("section 'a': mode peak vs continuous"));
    assert!(text.contains("Summary: 1 differences"));
}
