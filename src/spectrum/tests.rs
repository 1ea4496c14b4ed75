use super::*;
use crate::config::LookupConfig;
use crate::params::OBSERVE_FREQUENCY_PARAM;
use crate::section::SectionError;

fn xy_spectrum(spectrum_type: SpectrumType, x_unit: &str) -> SpectrumData {
    SpectrumData::new(
        spectrum_type,
        vec![
            VariableDefinition::independent("x", x_unit),
            VariableDefinition::dependent("y", "arb"),
        ],
    )
    .unwrap()
}

#[test]
fn test_new_rejects_duplicate_variables() {
    let err = SpectrumData::new(
        SpectrumType::General,
        vec![
            VariableDefinition::independent("x", "s"),
            VariableDefinition::dependent("x", "arb"),
        ],
    )
    .unwrap_err();
    assert_eq!(err, SpectrumError::DuplicateVariable("x".into()));
}

#[test]
fn test_reads_without_sections_are_empty() {
    let spectrum = xy_spectrum(SpectrumType::Ir, "cm-1");
    assert!(spectrum.active_section().is_none());
    assert_eq!(spectrum.item_count(), 0);
    assert_eq!(spectrum.item_at(0), None);
    assert_eq!(spectrum.value_at(1.0).unwrap(), None);
    assert_eq!(spectrum.range_of("x", RangeOptions::default()).unwrap(), None);
}

#[test]
fn test_first_mutation_creates_default_section() {
    let mut spectrum = xy_spectrum(SpectrumType::Ir, "cm-1");
    let stored = spectrum.append_item(vec![1.0, 2.0]).unwrap();
    assert_eq!(stored, vec![1.0, 2.0]);
    assert_eq!(spectrum.section_count(), 1);

    let section = spectrum.active_section().unwrap();
    assert_eq!(section.name(), DEFAULT_SECTION_NAME);
    assert_eq!(section.mode(), DataMode::Continuous);
    assert_eq!(section.variable_symbols(), vec!["x", "y"]);
}

#[test]
fn test_single_section_is_implicitly_active() {
    let mut spectrum = xy_spectrum(SpectrumType::Ms, "Th");
    let index = spectrum
        .create_section("peaks", &["x", "y"], DataMode::Peak)
        .unwrap();
    assert_eq!(index, 0);
    assert_eq!(spectrum.active_section_index(), Some(0));

    spectrum.create_section("curve", &[], DataMode::Continuous).unwrap();
    assert_eq!(spectrum.active_section_index(), None);
    assert!(matches!(
        spectrum.append_item(vec![1.0, 1.0]),
        Err(SpectrumError::NoActiveSection)
    ));

    spectrum.set_active_section(1).unwrap();
    spectrum.append_item(vec![1.0, 1.0]).unwrap();
    assert_eq!(spectrum.section(1).unwrap().len(), 1);
    assert!(spectrum.set_active_section(2).is_err());
}

#[test]
fn test_remove_section_adjusts_active_index() {
    let mut spectrum = xy_spectrum(SpectrumType::Ms, "Th");
    for name in ["a", "b", "c"] {
        spectrum.create_section(name, &[], DataMode::Peak).unwrap();
    }
    spectrum.set_active_section(2).unwrap();
    let removed = spectrum.remove_section(0).unwrap();
    assert_eq!(removed.name(), "a");
    assert_eq!(spectrum.active_section().unwrap().name(), "c");

    spectrum.remove_section(1).unwrap();
    // one section left: implicitly active
    assert_eq!(spectrum.active_section().unwrap().name(), "b");
    assert!(matches!(
        spectrum.remove_section(4),
        Err(SpectrumError::SectionIndexOutOfBounds { index: 4, len: 1 })
    ));
}

#[test]
fn test_create_section_with_unknown_variable() {
    let mut spectrum = xy_spectrum(SpectrumType::Ir, "cm-1");
    assert_eq!(
        spectrum
            .create_section("bad", &["x", "z"], DataMode::Continuous)
            .unwrap_err(),
        SpectrumError::UnknownVariable("z".into())
    );
}

#[test]
fn test_variable_management() {
    let mut spectrum = xy_spectrum(SpectrumType::Ir, "cm-1");
    spectrum
        .insert_variable_at(1, VariableDefinition::dependent("t", "K"))
        .unwrap();
    assert_eq!(spectrum.index_of_variable("t"), Some(1));
    assert_eq!(spectrum.index_of_variable("y"), Some(2));
    assert!(matches!(
        spectrum.insert_variable_at(9, VariableDefinition::dependent("q", "K")),
        Err(SpectrumError::VariableIndexOutOfBounds { .. })
    ));

    spectrum.create_section("s", &["x", "y"], DataMode::Continuous).unwrap();
    assert_eq!(spectrum.remove_variable("t").unwrap().symbol, "t");
    assert_eq!(
        spectrum.remove_variable("y").unwrap_err(),
        SpectrumError::VariableInUse {
            symbol: "y".into(),
            section: "s".into()
        }
    );
}

#[test]
fn test_set_external_unit_propagates_to_sections() {
    let mut spectrum = xy_spectrum(SpectrumType::Nmr, "Hz");
    spectrum.create_section("s", &[], DataMode::Continuous).unwrap();
    spectrum.set_external_unit("x", Some("ppm")).unwrap();

    assert_eq!(spectrum.variable("x").unwrap().actual_external_unit(), "ppm");
    let section = spectrum.section(0).unwrap();
    assert_eq!(section.variable("x").unwrap().actual_external_unit(), "ppm");

    assert!(matches!(
        spectrum.set_external_unit("x", Some("furlong")),
        Err(SpectrumError::Unit(UnitError::UnknownUnit(_)))
    ));
    spectrum.set_external_unit("x", None).unwrap();
    assert_eq!(spectrum.variable("x").unwrap().actual_external_unit(), "Hz");
}

#[test]
fn test_nmr_external_range_uses_observe_frequency() {
    let mut spectrum = xy_spectrum(SpectrumType::Nmr, "Hz");
    spectrum.set_external_unit("x", Some("ppm")).unwrap();
    spectrum.append_item(vec![400.0, 1.0]).unwrap();
    spectrum.append_item(vec![2904.0, 3.0]).unwrap();

    assert!(spectrum
        .external_range_of("x", RangeOptions::default())
        .is_err());

    spectrum.set_parameter(OBSERVE_FREQUENCY_PARAM, 400.0, Some("MHz"));
    let range = spectrum
        .external_range_of("x", RangeOptions::default())
        .unwrap()
        .unwrap();
    assert!((range.min - 1.0).abs() < 1e-12);
    assert!((range.max - 7.26).abs() < 1e-9);

    let hz = spectrum.from_external_value("x", 1.0).unwrap();
    assert!((hz - 400.0).abs() < 1e-9);

    let alt: Vec<&str> = spectrum.alt_units("x").unwrap().iter().map(|u| u.key).collect();
    assert!(alt.contains(&"ppm"));
}

#[test]
fn test_value_at_uses_configured_peak_tolerance() {
    let mut spectrum = xy_spectrum(SpectrumType::Ms, "Th");
    spectrum.create_section("peaks", &[], DataMode::Peak).unwrap();
    spectrum.append_item(vec![100.0, 5.0]).unwrap();
    spectrum.append_item(vec![250.0, 8.0]).unwrap();

    // default tolerance is far too tight for this query
    assert!(spectrum.value_at(100.2).unwrap().unwrap()[1].is_nan());
    assert_eq!(
        spectrum.find_nearest_item_index(&[("x", 100.2)], Some(0.01)).unwrap(),
        Some(0)
    );

    spectrum.set_config(EngineConfig {
        lookup: LookupConfig {
            peak_tolerance: 0.01,
        },
        ..Default::default()
    });
    assert_eq!(spectrum.value_at(100.2).unwrap(), Some(vec![100.0, 5.0]));
}

#[test]
fn test_merged_range_skips_sections_without_variable() {
    let mut spectrum = SpectrumData::new(
        SpectrumType::General,
        vec![
            VariableDefinition::independent("x", "s"),
            VariableDefinition::dependent("y", "arb"),
            VariableDefinition::dependent("z", "arb"),
        ],
    )
    .unwrap();
    let a = spectrum.create_section("a", &["x", "y"], DataMode::Continuous).unwrap();
    let b = spectrum.create_section("b", &["x", "z"], DataMode::Continuous).unwrap();
    spectrum.section_mut(a).unwrap().append_item(vec![0.0, 1.0]).unwrap();
    spectrum.section_mut(a).unwrap().append_item(vec![5.0, 2.0]).unwrap();
    spectrum.section_mut(b).unwrap().append_item(vec![-3.0, 7.0]).unwrap();
    spectrum.section_mut(b).unwrap().append_item(vec![2.0, 9.0]).unwrap();

    let x = spectrum.merged_range("x", RangeOptions::default()).unwrap().unwrap();
    assert_eq!(x, DataRange { min: -3.0, max: 5.0 });
    let y = spectrum.merged_range("y", RangeOptions::default()).unwrap().unwrap();
    assert_eq!(y, DataRange { min: 1.0, max: 2.0 });
    assert!(spectrum.merged_range("w", RangeOptions::default()).is_err());

    let minutes = {
        spectrum.set_external_unit("x", Some("min")).unwrap();
        spectrum
            .external_merged_range("x", RangeOptions::default())
            .unwrap()
            .unwrap()
    };
    assert!((minutes.max - 5.0 / 60.0).abs() < 1e-12);
}

#[test]
fn test_add_section_validates_variables() {
    let mut spectrum = xy_spectrum(SpectrumType::Ir, "cm-1");
    let foreign = DataSection::new(
        "foreign",
        vec![VariableDefinition::independent("q", "s")],
        DataMode::Continuous,
    )
    .unwrap();
    assert_eq!(
        spectrum.add_section(foreign).unwrap_err(),
        SpectrumError::UnknownVariable("q".into())
    );

    let own = DataSection::new(
        "own",
        vec![VariableDefinition::independent("x", "cm-1")],
        DataMode::Continuous,
    )
    .unwrap();
    assert_eq!(spectrum.add_section(own).unwrap(), 0);
    assert!(spectrum.section_by_name("own").is_some());
}

#[test]
fn test_delegated_errors_are_wrapped() {
    let mut spectrum = xy_spectrum(SpectrumType::Ir, "cm-1");
    let err = spectrum.append_item(vec![1.0]).unwrap_err();
    assert_eq!(
        err,
        SpectrumError::Section(SectionError::ItemLengthMismatch {
            expected: 2,
            actual: 1
        })
    );
}

#[test]
fn test_parameters() {
    let mut spectrum = xy_spectrum(SpectrumType::Nmr, "Hz");
    spectrum.set_parameter("Temperature", 298.0, Some("K"));
    spectrum.set_parameter("Scans", 16.0, None);
    assert_eq!(spectrum.parameter("Temperature").unwrap().unit.as_deref(), Some("K"));
    assert_eq!(spectrum.parameters().len(), 2);
    assert!(spectrum.remove_parameter("Scans").is_some());
    assert!(spectrum.parameter("Scans").is_none());
}
