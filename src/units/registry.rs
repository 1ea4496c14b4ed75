use std::fmt;
use std::sync::Arc;

use super::catalog::{find_unit, Unit};
use super::converter::{
    ConversionContext, GenericUnitConverter, IrWavelengthConverter, NmrFrequencyConverter,
    UnitConverter,
};
use super::UnitError;

/// Ordered chain of unit converters.
///
/// Converters are tried most-recently-registered first; the first one whose
/// `can_convert` accepts the request performs the conversion.
#[derive(Clone)]
pub struct UnitConversionRegistry {
    converters: Vec<Arc<dyn UnitConverter>>,
}

impl Default for UnitConversionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl UnitConversionRegistry {
    /// A registry with no converters
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// A registry holding the built-in converters: generic linear scaling,
    /// NMR frequency ↔ ppm and IR wavelength ↔ wavenumber (highest priority)
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(GenericUnitConverter);
        registry.register(NmrFrequencyConverter);
        registry.register(IrWavelengthConverter);
        registry
    }

    /// Register a converter with the highest priority
    pub fn register<C: UnitConverter + 'static>(&mut self, converter: C) -> &mut Self {
        self.converters.push(Arc::new(converter));
        self
    }

    /// Remove every converter with the given name. Returns whether any was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.converters.len();
        self.converters.retain(|c| c.name() != name);
        before != self.converters.len()
    }

    /// Names of the registered converters, highest priority first
    pub fn converter_names(&self) -> Vec<&str> {
        self.converters.iter().rev().map(|c| c.name()).collect()
    }

    /// Number of registered converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether no converter is registered
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn resolve(key: &str) -> Result<&'static Unit, UnitError> {
        find_unit(key).ok_or_else(|| UnitError::UnknownUnit(key.to_string()))
    }

    fn find_converter(
        &self,
        value: f64,
        from: &Unit,
        to: &Unit,
        ctx: &ConversionContext<'_>,
    ) -> Option<&dyn UnitConverter> {
        self.converters
            .iter()
            .rev()
            .map(|c| c.as_ref())
            .find(|c| c.can_convert(value, from, to, ctx))
    }

    /// Whether `value` can be converted from `from` to `to`
    pub fn can_convert(&self, value: f64, from: &str, to: &str, ctx: &ConversionContext<'_>) -> bool {
        if from == to {
            return true;
        }
        match (find_unit(from), find_unit(to)) {
            (Some(f), Some(t)) => self.find_converter(value, f, t, ctx).is_some(),
            _ => false,
        }
    }

    /// Convert `value` from unit `from` to unit `to`.
    ///
    /// Identical unit keys are returned unchanged without consulting the chain.
    pub fn convert(
        &self,
        value: f64,
        from: &str,
        to: &str,
        ctx: &ConversionContext<'_>,
    ) -> Result<f64, UnitError> {
        if from == to {
            return Ok(value);
        }
        let from_unit = Self::resolve(from)?;
        let to_unit = Self::resolve(to)?;
        let converter = self
            .find_converter(value, from_unit, to_unit, ctx)
            .ok_or_else(|| UnitError::ConversionUnavailable {
                from: from.to_string(),
                to: to.to_string(),
                variable: ctx.variable_symbol(),
            })?;
        log::trace!(
            "converting {} {} -> {} with '{}'",
            value,
            from,
            to,
            converter.name()
        );
        converter.convert(value, from_unit, to_unit, ctx)
    }

    /// Alternative target units suggested by every converter for `from`,
    /// without duplicates and excluding `from` itself
    pub fn alt_units(&self, from: &str, ctx: &ConversionContext<'_>) -> Vec<&'static Unit> {
        let Some(from_unit) = find_unit(from) else {
            return Vec::new();
        };
        let mut result: Vec<&'static Unit> = Vec::new();
        for converter in self.converters.iter().rev() {
            for unit in converter.alt_units(from_unit, ctx) {
                if unit.key != from_unit.key && !result.iter().any(|u| u.key == unit.key) {
                    result.push(unit);
                }
            }
        }
        result
    }
}

impl fmt::Debug for UnitConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitConversionRegistry")
            .field("converters", &self.converter_names())
            .finish()
    }
}
