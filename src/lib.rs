//! # spectral-engine - Spectroscopy Data Engine
//!
//! `spectral_engine` is the in-memory data layer for spectroscopy datasets
//! (NMR, IR, MS, UV/Vis...): variables with physical units, data sections in
//! continuous (sampled curve) or peak (sparse table) mode, interpolation and
//! peak matching, cached statistics, unit conversion at the display boundary
//! and structural comparison for round-trip testing.
//!
//! ## Key Features
//!
//! - **Two storage modes**: continuous sections interpolate linearly between
//!   samples; peak sections match the nearest peak within a relative
//!   tolerance and degrade to a baseline ("peak root") otherwise.
//!
//! - **Omitted values**: evenly spaced abscissae can be stored as a
//!   `[from, to]` range, and absent values fall back to per-variable defaults.
//!
//! - **Pluggable unit conversion**: a registry of converters (generic SI
//!   scaling, NMR Hz ↔ ppm through the observe frequency, IR wavelength ↔
//!   wavenumber), tried most-recently-registered first.
//!
//! - **Cached statistics**: per-variable ranges and averages are computed in
//!   one pass and kept until the next mutation.
//!
//! - **Change notification**: observers subscribe to section mutations.
//!
//! ## Quick Start
//!
//! ```rust
//! use spectral_engine::prelude::*;
//!
//! let mut spectrum = SpectrumData::new(
//!     SpectrumType::Nmr,
//!     vec![
//!         VariableDefinition::independent("x", "Hz").with_external_unit("ppm"),
//!         VariableDefinition::dependent("y", "arb"),
//!     ],
//! )?;
//! spectrum.set_parameter(OBSERVE_FREQUENCY_PARAM, 400.0, Some("MHz"));
//!
//! for i in 0..=10 {
//!     let hz = i as f64 * 400.0;
//!     spectrum.append_item(vec![hz, (i * i) as f64])?;
//! }
//!
//! // interpolated lookup in the internal unit
//! let item = spectrum.value_at(600.0)?.expect("inside the data");
//! assert_eq!(item[1], 2.5);
//!
//! // range converted to the display unit
//! let ppm = spectrum
//!     .external_range_of("x", RangeOptions::default())?
//!     .expect("non-empty");
//! assert!((ppm.max - 10.0).abs() < 1e-9);
//! # Ok::<(), spectral_engine::spectrum::SpectrumError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`variable`]: variable definitions (symbol, role, units)
//! - [`units`]: unit catalog, converters and the conversion registry
//! - [`section`]: data sections, lookups, statistics, observers
//! - [`spectrum`]: datasets of sections with active-section delegation
//! - [`compare`]: tolerance-aware structural comparison
//! - [`snapshot`]: JSON snapshots for persistence and round-trip tests
//! - [`config`]: TOML engine configuration

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod compare;
pub mod config;
pub mod params;
pub mod section;
pub mod snapshot;
pub mod spectrum;
pub mod units;
pub mod variable;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::compare::{
        compare_sections, compare_spectra, sections_equal, spectra_equal, ComparisonOptions,
        ComparisonReport,
    };
    pub use crate::config::{EngineConfig, DEFAULT_RELATIVE_TOLERANCE};
    pub use crate::params::{ParameterSource, ParameterValue, OBSERVE_FREQUENCY_PARAM};
    pub use crate::section::{
        ChangeKind, DataChangeEvent, DataItem, DataMode, DataRange, DataSection, ExtraInfo,
        ItemInput, PeakMultiplicity, PeakShape, RangeOptions, RangeQueryOptions,
        RangeQueryResult, SectionError,
    };
    pub use crate::spectrum::{SpectrumData, SpectrumError, SpectrumType};
    pub use crate::units::{
        ConversionContext, UnitConversionRegistry, UnitConverter, UnitError,
    };
    pub use crate::variable::{VarDependency, VariableDefinition};
}
