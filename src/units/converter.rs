use std::fmt;

use crate::params::{ParameterSource, OBSERVE_FREQUENCY_PARAM};
use crate::section::DataSection;
use crate::variable::VariableDefinition;

use super::catalog::{find_unit, units_in_category, Unit, UnitCategory};
use super::UnitError;

/// Context handed to converters: the variable being converted, its section and
/// the owning dataset's parameters. Every field is optional.
#[derive(Clone, Copy, Default)]
pub struct ConversionContext<'a> {
    /// Variable whose value is converted
    pub variable: Option<&'a VariableDefinition>,
    /// Section holding the value
    pub section: Option<&'a DataSection>,
    /// Parameters of the owning dataset
    pub parameters: Option<&'a dyn ParameterSource>,
}

impl<'a> ConversionContext<'a> {
    /// Context for a variable
    pub fn for_variable(variable: &'a VariableDefinition) -> Self {
        Self {
            variable: Some(variable),
            ..Default::default()
        }
    }

    /// Attach the owning section
    pub fn with_section(mut self, section: &'a DataSection) -> Self {
        self.section = Some(section);
        self
    }

    /// Attach the dataset parameters
    pub fn with_parameters(mut self, parameters: &'a dyn ParameterSource) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub(crate) fn variable_symbol(&self) -> Option<String> {
        self.variable.map(|v| v.symbol.clone())
    }
}

impl fmt::Debug for ConversionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionContext")
            .field("variable", &self.variable.map(|v| v.symbol.as_str()))
            .field("section", &self.section.map(|s| s.name()))
            .field("has_parameters", &self.parameters.is_some())
            .finish()
    }
}

/// A unit conversion strategy.
///
/// `can_convert` must be checked before `convert`; converters are free to
/// return an error (or garbage) when called for a pair they did not accept.
pub trait UnitConverter: fmt::Debug + Send + Sync {
    /// Name used for diagnostics and `unregister`
    fn name(&self) -> &str;

    /// Whether this converter handles `value` from `from` to `to` in `ctx`
    fn can_convert(&self, value: f64, from: &Unit, to: &Unit, ctx: &ConversionContext<'_>)
        -> bool;

    /// Perform the conversion
    fn convert(
        &self,
        value: f64,
        from: &Unit,
        to: &Unit,
        ctx: &ConversionContext<'_>,
    ) -> Result<f64, UnitError>;

    /// Target units this converter could offer for `from`; advisory only
    fn alt_units(&self, from: &Unit, ctx: &ConversionContext<'_>) -> Vec<&'static Unit>;
}

fn unavailable(from: &Unit, to: &Unit, ctx: &ConversionContext<'_>) -> UnitError {
    UnitError::ConversionUnavailable {
        from: from.key.to_string(),
        to: to.key.to_string(),
        variable: ctx.variable_symbol(),
    }
}

fn finite_or_err(result: f64, value: f64, from: &Unit, to: &Unit) -> Result<f64, UnitError> {
    if result.is_finite() || !value.is_finite() {
        Ok(result)
    } else {
        Err(UnitError::InvalidValue {
            value,
            from: from.key.to_string(),
            to: to.key.to_string(),
        })
    }
}

/// Linear (or affine) conversion between units of the same category
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericUnitConverter;

impl UnitConverter for GenericUnitConverter {
    fn name(&self) -> &str {
        "generic"
    }

    fn can_convert(&self, _value: f64, from: &Unit, to: &Unit, _ctx: &ConversionContext<'_>) -> bool {
        from.key == to.key || (from.category == to.category && from.is_scaled() && to.is_scaled())
    }

    fn convert(
        &self,
        value: f64,
        from: &Unit,
        to: &Unit,
        ctx: &ConversionContext<'_>,
    ) -> Result<f64, UnitError> {
        from.convert_to(value, to)
            .ok_or_else(|| unavailable(from, to, ctx))
    }

    fn alt_units(&self, from: &Unit, _ctx: &ConversionContext<'_>) -> Vec<&'static Unit> {
        if !from.is_scaled() {
            return Vec::new();
        }
        units_in_category(from.category)
            .filter(|u| u.key != from.key && u.is_scaled())
            .collect()
    }
}

/// NMR chemical-shift conversion between a frequency and a dimensionless ratio
/// (usually ppm), using the dataset's observe frequency.
#[derive(Debug, Default, Clone, Copy)]
pub struct NmrFrequencyConverter;

impl NmrFrequencyConverter {
    /// Observe frequency in Hz, if the dataset declares one with a frequency unit
    fn observe_frequency_hz(ctx: &ConversionContext<'_>) -> Option<f64> {
        let param = ctx.parameters?.parameter(OBSERVE_FREQUENCY_PARAM)?;
        let unit = find_unit(param.unit.as_deref()?)?;
        if unit.category != UnitCategory::Frequency {
            return None;
        }
        unit.to_standard(param.value)
            .filter(|hz| hz.is_finite() && *hz != 0.0)
    }

    fn is_pair(from: &Unit, to: &Unit) -> bool {
        matches!(
            (from.category, to.category),
            (UnitCategory::Frequency, UnitCategory::Dimensionless)
                | (UnitCategory::Dimensionless, UnitCategory::Frequency)
        )
    }
}

impl UnitConverter for NmrFrequencyConverter {
    fn name(&self) -> &str {
        "nmr-frequency"
    }

    fn can_convert(&self, _value: f64, from: &Unit, to: &Unit, ctx: &ConversionContext<'_>) -> bool {
        Self::is_pair(from, to) && Self::observe_frequency_hz(ctx).is_some()
    }

    fn convert(
        &self,
        value: f64,
        from: &Unit,
        to: &Unit,
        ctx: &ConversionContext<'_>,
    ) -> Result<f64, UnitError> {
        let observe_hz = Self::observe_frequency_hz(ctx).ok_or_else(|| unavailable(from, to, ctx))?;
        let standard = from
            .to_standard(value)
            .ok_or_else(|| unavailable(from, to, ctx))?;
        let converted = match from.category {
            UnitCategory::Frequency => standard / observe_hz,
            _ => standard * observe_hz,
        };
        let result = to
            .from_standard(converted)
            .ok_or_else(|| unavailable(from, to, ctx))?;
        finite_or_err(result, value, from, to)
    }

    fn alt_units(&self, from: &Unit, ctx: &ConversionContext<'_>) -> Vec<&'static Unit> {
        if Self::observe_frequency_hz(ctx).is_none() {
            return Vec::new();
        }
        let target = match from.category {
            UnitCategory::Frequency => UnitCategory::Dimensionless,
            UnitCategory::Dimensionless => UnitCategory::Frequency,
            _ => return Vec::new(),
        };
        units_in_category(target).collect()
    }
}

/// IR wavelength ↔ wavenumber reciprocal conversion
#[derive(Debug, Default, Clone, Copy)]
pub struct IrWavelengthConverter;

impl IrWavelengthConverter {
    fn is_pair(from: &Unit, to: &Unit) -> bool {
        matches!(
            (from.category, to.category),
            (UnitCategory::Length, UnitCategory::WaveNumber)
                | (UnitCategory::WaveNumber, UnitCategory::Length)
        )
    }
}

impl UnitConverter for IrWavelengthConverter {
    fn name(&self) -> &str {
        "ir-wavelength"
    }

    fn can_convert(&self, value: f64, from: &Unit, to: &Unit, _ctx: &ConversionContext<'_>) -> bool {
        Self::is_pair(from, to) && value != 0.0
    }

    fn convert(
        &self,
        value: f64,
        from: &Unit,
        to: &Unit,
        ctx: &ConversionContext<'_>,
    ) -> Result<f64, UnitError> {
        let standard = from
            .to_standard(value)
            .ok_or_else(|| unavailable(from, to, ctx))?;
        let result = to
            .from_standard(1.0 / standard)
            .ok_or_else(|| unavailable(from, to, ctx))?;
        finite_or_err(result, value, from, to)
    }

    fn alt_units(&self, from: &Unit, _ctx: &ConversionContext<'_>) -> Vec<&'static Unit> {
        let target = match from.category {
            UnitCategory::Length => UnitCategory::WaveNumber,
            UnitCategory::WaveNumber => UnitCategory::Length,
            _ => return Vec::new(),
        };
        units_in_category(target).collect()
    }
}
