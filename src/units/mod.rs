//! # Units Module
//!
//! Physical units and the pluggable conversion chain used to translate values
//! between a variable's internal (storage) unit and its external (display)
//! unit.
//!
//! ## Built-in converters
//!
//! Tried most-recently-registered first:
//!
//! 1. **IR wavelength ↔ wavenumber**: `wavenumber = 1 / wavelength` on the
//!    standard (SI) values.
//! 2. **NMR frequency ↔ ppm**: `ratio = frequency / observe_frequency`, only
//!    when the dataset declares an `ObserveFrequency` parameter in a frequency
//!    unit.
//! 3. **Generic**: linear scaling between units of the same category.
//!
//! ## Example
//!
//! ```rust
//! use spectral_engine::params::{ParameterValue, OBSERVE_FREQUENCY_PARAM};
//! use spectral_engine::units::{ConversionContext, UnitConversionRegistry};
//! use std::collections::BTreeMap;
//!
//! let mut params = BTreeMap::new();
//! params.insert(
//!     OBSERVE_FREQUENCY_PARAM.to_string(),
//!     ParameterValue::new(400.0, "MHz"),
//! );
//!
//! let registry = UnitConversionRegistry::with_defaults();
//! let ctx = ConversionContext::default().with_parameters(&params);
//! let ppm = registry.convert(400.0, "Hz", "ppm", &ctx)?;
//! assert!((ppm - 1.0).abs() < 1e-9);
//! # Ok::<(), spectral_engine::units::UnitError>(())
//! ```

mod catalog;
mod converter;
mod error;
mod registry;


pub use catalog::{
    all_units, find_unit, standard_unit, unit_keys, units_in_category, Unit, UnitCategory,
    UnitScale,
};
pub use converter::{
    ConversionContext, GenericUnitConverter, IrWavelengthConverter, NmrFrequencyConverter,
    UnitConverter,
};
pub use error::UnitError;
pub use registry::UnitConversionRegistry;
