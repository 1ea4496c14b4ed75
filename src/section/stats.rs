use std::collections::BTreeMap;

use crate::params::ParameterSource;
use crate::units::{ConversionContext, UnitConversionRegistry};

use super::cache::VariableStats;
use super::types::{DataMode, DataRange};
use super::{DataSection, SectionError};

/// Options for range and average queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Skip values that only come from the peak root
    pub ignore_peak_root: bool,
}

impl RangeOptions {
    /// Options excluding the peak root
    pub fn ignoring_peak_root() -> Self {
        Self {
            ignore_peak_root: true,
        }
    }
}

impl DataSection {
    /// Range and average of one variable, computed in a single pass and
    /// cached until the next mutation
    pub(crate) fn variable_stats(&self, var: usize, options: RangeOptions) -> VariableStats {
        let symbol = &self.variables[var].symbol;
        if let Some(stats) = self.cache.borrow().get(symbol, options.ignore_peak_root) {
            return stats;
        }

        let use_root = !options.ignore_peak_root;
        let mut range: Option<DataRange> = None;
        let mut sum = 0.0;
        let mut count = 0usize;
        for index in 0..self.items.len() {
            let value = self.value_of(index, var, use_root);
            if value.is_nan() {
                continue;
            }
            sum += value;
            count += 1;
            match range.as_mut() {
                Some(r) => r.include(value),
                None => range = Some(DataRange::new(value, value)),
            }
        }
        if self.mode == DataMode::Peak && use_root && !self.items.is_empty() {
            if let Some(root) = self.peak_root.get(symbol).filter(|v| !v.is_nan()) {
                match range.as_mut() {
                    Some(r) => r.include(*root),
                    None => range = Some(DataRange::new(*root, *root)),
                }
            }
        }

        let stats = VariableStats {
            range,
            average: (count > 0).then(|| sum / count as f64),
        };
        log::debug!(
            "section '{}': computed stats for '{}' over {} items",
            self.name,
            symbol,
            self.items.len()
        );
        self.cache
            .borrow_mut()
            .put(symbol, options.ignore_peak_root, stats);
        stats
    }

    /// `[min, max]` of a variable in its internal unit; `None` when the
    /// section holds no valid value for it
    pub fn range_of(
        &self,
        symbol: &str,
        options: RangeOptions,
    ) -> Result<Option<DataRange>, SectionError> {
        let var = self.require_variable(symbol)?;
        Ok(self.variable_stats(var, options).range)
    }

    /// Ranges of several variables (all local variables when `symbols` is
    /// empty). Variables without valid values are left out.
    pub fn ranges_of(
        &self,
        symbols: &[&str],
        options: RangeOptions,
    ) -> Result<BTreeMap<String, DataRange>, SectionError> {
        let symbols = if symbols.is_empty() {
            self.variable_symbols()
        } else {
            symbols.to_vec()
        };
        let mut result = BTreeMap::new();
        for symbol in symbols {
            if let Some(range) = self.range_of(symbol, options)? {
                result.insert(symbol.to_string(), range);
            }
        }
        Ok(result)
    }

    /// Mean of the valid values of a variable in its internal unit
    pub fn average_of(&self, symbol: &str, options: RangeOptions) -> Result<Option<f64>, SectionError> {
        let var = self.require_variable(symbol)?;
        Ok(self.variable_stats(var, options).average)
    }

    /// Explicit display range if set, otherwise the data range
    pub fn display_range(&self, symbol: &str) -> Result<Option<DataRange>, SectionError> {
        self.require_variable(symbol)?;
        if let Some(range) = self.display_ranges.get(symbol) {
            return Ok(Some(*range));
        }
        self.range_of(symbol, RangeOptions::default())
    }

    // ==================== External unit boundary ====================

    fn conversion_units<'a>(
        &'a self,
        symbol: &str,
    ) -> Result<(&'a crate::variable::VariableDefinition, &'a str, &'a str), SectionError> {
        let var = self.require_variable(symbol)?;
        let def = &self.variables[var];
        Ok((def, def.internal_unit.as_str(), def.actual_external_unit()))
    }

    /// Convert an internal value of `symbol` to its external unit
    pub fn to_external_value(
        &self,
        symbol: &str,
        value: f64,
        registry: &UnitConversionRegistry,
        parameters: Option<&dyn ParameterSource>,
    ) -> Result<f64, SectionError> {
        let (def, internal, external) = self.conversion_units(symbol)?;
        let ctx = ConversionContext {
            variable: Some(def),
            section: Some(self),
            parameters,
        };
        Ok(registry.convert(value, internal, external, &ctx)?)
    }

    /// Convert an external value of `symbol` back to its internal unit
    pub fn from_external_value(
        &self,
        symbol: &str,
        value: f64,
        registry: &UnitConversionRegistry,
        parameters: Option<&dyn ParameterSource>,
    ) -> Result<f64, SectionError> {
        let (def, internal, external) = self.conversion_units(symbol)?;
        let ctx = ConversionContext {
            variable: Some(def),
            section: Some(self),
            parameters,
        };
        Ok(registry.convert(value, external, internal, &ctx)?)
    }

    /// Data range of `symbol` converted to its external unit. Reciprocal
    /// conversions may swap the bounds; the result is reordered.
    pub fn external_range_of(
        &self,
        symbol: &str,
        options: RangeOptions,
        registry: &UnitConversionRegistry,
        parameters: Option<&dyn ParameterSource>,
    ) -> Result<Option<DataRange>, SectionError> {
        let Some(range) = self.range_of(symbol, options)? else {
            return Ok(None);
        };
        let a = self.to_external_value(symbol, range.min, registry, parameters)?;
        let b = self.to_external_value(symbol, range.max, registry, parameters)?;
        Ok(Some(DataRange::new(a, b)))
    }

    /// Average of `symbol` converted to its external unit
    pub fn external_average_of(
        &self,
        symbol: &str,
        options: RangeOptions,
        registry: &UnitConversionRegistry,
        parameters: Option<&dyn ParameterSource>,
    ) -> Result<Option<f64>, SectionError> {
        match self.average_of(symbol, options)? {
            Some(avg) => Ok(Some(self.to_external_value(symbol, avg, registry, parameters)?)),
            None => Ok(None),
        }
    }
}
