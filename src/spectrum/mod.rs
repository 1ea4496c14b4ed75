//! # Spectrum Module
//!
//! [`SpectrumData`] is a whole spectroscopy dataset: the canonical variable
//! list, any number of [`DataSection`]s, named parameters and the unit
//! conversion registry used at the display boundary.
//!
//! Single-section convenience operations (`append_item`, `value_at`,
//! `range_of`...) delegate to the *active* section. When exactly one section
//! exists it is active regardless of the stored index. With no section at all,
//! reads return nothing and the first mutating delegation creates a default
//! continuous section holding every variable.
//!
//! ## Example
//!
//! ```rust
//! use spectral_engine::spectrum::{SpectrumData, SpectrumType};
//! use spectral_engine::variable::VariableDefinition;
//!
//! let mut spectrum = SpectrumData::new(
//!     SpectrumType::Ir,
//!     vec![
//!         VariableDefinition::independent("x", "cm-1"),
//!         VariableDefinition::dependent("y", "arb"),
//!     ],
//! )?;
//! spectrum.append_item(vec![4000.0, 0.1])?;
//! spectrum.append_item(vec![400.0, 0.9])?;
//! assert_eq!(spectrum.section_count(), 1);
//! assert_eq!(spectrum.item_count(), 2);
//! # Ok::<(), spectral_engine::spectrum::SpectrumError>(())
//! ```

mod error;
mod types;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::params::{ParameterSource, ParameterValue};
use crate::section::{
    DataItem, DataMode, DataRange, DataSection, ItemInput, RangeOptions, RangeQueryOptions,
    RangeQueryResult,
};
use crate::units::{find_unit, ConversionContext, Unit, UnitConversionRegistry, UnitError};
use crate::variable::VariableDefinition;

pub use error::SpectrumError;
pub use types::SpectrumType;

/// Name given to the section created implicitly by mutating delegations
pub const DEFAULT_SECTION_NAME: &str = "default";

/// A spectroscopy dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumData {
    id: Uuid,
    title: Option<String>,
    spectrum_type: SpectrumType,
    variables: Vec<VariableDefinition>,
    sections: Vec<DataSection>,
    active_section_index: Option<usize>,
    parameters: BTreeMap<String, ParameterValue>,
    #[serde(default)]
    config: EngineConfig,
    #[serde(skip)]
    registry: UnitConversionRegistry,
}

impl SpectrumData {
    /// Create a dataset with the given variables and no sections
    pub fn new(
        spectrum_type: SpectrumType,
        variables: Vec<VariableDefinition>,
    ) -> Result<Self, SpectrumError> {
        let mut spectrum = Self {
            id: Uuid::new_v4(),
            title: None,
            spectrum_type,
            variables: Vec::with_capacity(variables.len()),
            sections: Vec::new(),
            active_section_index: None,
            parameters: BTreeMap::new(),
            config: EngineConfig::default(),
            registry: UnitConversionRegistry::with_defaults(),
        };
        for var in variables {
            spectrum.append_variable(var)?;
        }
        Ok(spectrum)
    }

    /// Builder-style engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Unique identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the display title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Kind of spectroscopy
    pub fn spectrum_type(&self) -> SpectrumType {
        self.spectrum_type
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the engine configuration
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Unit conversion registry
    pub fn registry(&self) -> &UnitConversionRegistry {
        &self.registry
    }

    /// Mutable registry, e.g. to register custom converters
    pub fn registry_mut(&mut self) -> &mut UnitConversionRegistry {
        &mut self.registry
    }

    // ==================== Parameters ====================

    /// Set a named parameter
    pub fn set_parameter(&mut self, key: impl Into<String>, value: f64, unit: Option<&str>) {
        let value = match unit {
            Some(unit) => ParameterValue::new(value, unit),
            None => ParameterValue::unitless(value),
        };
        self.parameters.insert(key.into(), value);
    }

    /// Named parameter by key
    pub fn parameter(&self, key: &str) -> Option<&ParameterValue> {
        self.parameters.get(key)
    }

    /// Remove a named parameter
    pub fn remove_parameter(&mut self, key: &str) -> Option<ParameterValue> {
        self.parameters.remove(key)
    }

    /// All named parameters
    pub fn parameters(&self) -> &BTreeMap<String, ParameterValue> {
        &self.parameters
    }

    // ==================== Variables ====================

    /// Variables in declaration order
    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    /// Variable by symbol
    pub fn variable(&self, symbol: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.symbol == symbol)
    }

    /// Position of a variable
    pub fn index_of_variable(&self, symbol: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.symbol == symbol)
    }

    fn require_variable(&self, symbol: &str) -> Result<&VariableDefinition, SpectrumError> {
        self.variable(symbol)
            .ok_or_else(|| SpectrumError::UnknownVariable(symbol.to_string()))
    }

    /// Append a variable
    pub fn append_variable(&mut self, variable: VariableDefinition) -> Result<(), SpectrumError> {
        let len = self.variables.len();
        self.insert_variable_at(len, variable)
    }

    /// Insert a variable before `index`
    pub fn insert_variable_at(
        &mut self,
        index: usize,
        variable: VariableDefinition,
    ) -> Result<(), SpectrumError> {
        if index > self.variables.len() {
            return Err(SpectrumError::VariableIndexOutOfBounds {
                index,
                len: self.variables.len(),
            });
        }
        if self.variable(&variable.symbol).is_some() {
            return Err(SpectrumError::DuplicateVariable(variable.symbol));
        }
        self.variables.insert(index, variable);
        Ok(())
    }

    /// Remove a variable no section refers to
    pub fn remove_variable(&mut self, symbol: &str) -> Result<VariableDefinition, SpectrumError> {
        let index = self
            .index_of_variable(symbol)
            .ok_or_else(|| SpectrumError::UnknownVariable(symbol.to_string()))?;
        if let Some(section) = self.sections.iter().find(|s| s.has_variable(symbol)) {
            return Err(SpectrumError::VariableInUse {
                symbol: symbol.to_string(),
                section: section.name().to_string(),
            });
        }
        Ok(self.variables.remove(index))
    }

    /// Change the display unit of a variable in the dataset and every section
    /// holding it. `None` displays values in the internal unit.
    pub fn set_external_unit(&mut self, symbol: &str, unit: Option<&str>) -> Result<(), SpectrumError> {
        if let Some(key) = unit {
            find_unit(key).ok_or_else(|| UnitError::UnknownUnit(key.to_string()))?;
        }
        let index = self
            .index_of_variable(symbol)
            .ok_or_else(|| SpectrumError::UnknownVariable(symbol.to_string()))?;
        let unit = unit.map(str::to_string);
        self.variables[index].external_unit = unit.clone();
        for section in &mut self.sections {
            section.set_external_unit(symbol, unit.clone());
        }
        Ok(())
    }

    /// Alternative display units for a variable
    pub fn alt_units(&self, symbol: &str) -> Result<Vec<&'static Unit>, SpectrumError> {
        let var = self.require_variable(symbol)?;
        let ctx = ConversionContext::for_variable(var).with_parameters(self);
        Ok(self.registry.alt_units(&var.internal_unit, &ctx))
    }

    /// Convert a value of `symbol` from its internal to its external unit
    pub fn to_external_value(&self, symbol: &str, value: f64) -> Result<f64, SpectrumError> {
        let var = self.require_variable(symbol)?;
        let ctx = ConversionContext::for_variable(var).with_parameters(self);
        Ok(self
            .registry
            .convert(value, &var.internal_unit, var.actual_external_unit(), &ctx)?)
    }

    /// Convert a value of `symbol` from its external back to its internal unit
    pub fn from_external_value(&self, symbol: &str, value: f64) -> Result<f64, SpectrumError> {
        let var = self.require_variable(symbol)?;
        let ctx = ConversionContext::for_variable(var).with_parameters(self);
        Ok(self
            .registry
            .convert(value, var.actual_external_unit(), &var.internal_unit, &ctx)?)
    }

    // ==================== Sections ====================

    /// All sections
    pub fn sections(&self) -> &[DataSection] {
        &self.sections
    }

    /// Number of sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Section by index
    pub fn section(&self, index: usize) -> Option<&DataSection> {
        self.sections.get(index)
    }

    /// Mutable section by index
    pub fn section_mut(&mut self, index: usize) -> Option<&mut DataSection> {
        self.sections.get_mut(index)
    }

    /// First section with the given name
    pub fn section_by_name(&self, name: &str) -> Option<&DataSection> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Create a section over the given variables (all variables when
    /// `symbols` is empty). Returns its index.
    pub fn create_section(
        &mut self,
        name: impl Into<String>,
        symbols: &[&str],
        mode: DataMode,
    ) -> Result<usize, SpectrumError> {
        let variables = if symbols.is_empty() {
            self.variables.clone()
        } else {
            symbols
                .iter()
                .map(|s| self.require_variable(s).cloned())
                .collect::<Result<Vec<_>, _>>()?
        };
        let section = DataSection::new(name, variables, mode)?;
        self.sections.push(section);
        Ok(self.sections.len() - 1)
    }

    /// Add an existing section; each of its variables must belong to the
    /// spectrum. Returns its index.
    pub fn add_section(&mut self, section: DataSection) -> Result<usize, SpectrumError> {
        for var in section.variables() {
            self.require_variable(&var.symbol)?;
        }
        self.sections.push(section);
        Ok(self.sections.len() - 1)
    }

    /// Remove and return a section
    pub fn remove_section(&mut self, index: usize) -> Result<DataSection, SpectrumError> {
        if index >= self.sections.len() {
            return Err(self.section_out_of_bounds(index));
        }
        let removed = self.sections.remove(index);
        self.active_section_index = match self.active_section_index {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Ok(removed)
    }

    fn section_out_of_bounds(&self, index: usize) -> SpectrumError {
        SpectrumError::SectionIndexOutOfBounds {
            index,
            len: self.sections.len(),
        }
    }

    /// Index of the active section
    pub fn active_section_index(&self) -> Option<usize> {
        match self.sections.len() {
            0 => None,
            1 => Some(0),
            len => self.active_section_index.filter(|&i| i < len),
        }
    }

    /// Mark a section active
    pub fn set_active_section(&mut self, index: usize) -> Result<(), SpectrumError> {
        if index >= self.sections.len() {
            return Err(self.section_out_of_bounds(index));
        }
        self.active_section_index = Some(index);
        Ok(())
    }

    /// The active section
    pub fn active_section(&self) -> Option<&DataSection> {
        self.active_section_index().map(|i| &self.sections[i])
    }

    /// The active section, mutable
    pub fn active_section_mut(&mut self) -> Option<&mut DataSection> {
        self.active_section_index().map(move |i| &mut self.sections[i])
    }

    /// The active section, creating the default one when there is none
    fn ensure_active_section(&mut self) -> Result<&mut DataSection, SpectrumError> {
        if self.sections.is_empty() {
            log::debug!("spectrum {}: creating the default section", self.id);
            let index = self.create_section(DEFAULT_SECTION_NAME, &[], DataMode::Continuous)?;
            self.active_section_index = Some(index);
        }
        let index = self
            .active_section_index()
            .ok_or(SpectrumError::NoActiveSection)?;
        Ok(&mut self.sections[index])
    }

    // ==================== Active-section delegation ====================

    /// Append an item to the active section; returns the stored item
    pub fn append_item(&mut self, input: impl Into<ItemInput>) -> Result<DataItem, SpectrumError> {
        let section = self.ensure_active_section()?;
        Ok(section.append_item(input)?.to_vec())
    }

    /// Overwrite (or append at `len`) an item of the active section
    pub fn set_item_at(
        &mut self,
        index: usize,
        input: impl Into<ItemInput>,
    ) -> Result<(), SpectrumError> {
        Ok(self.ensure_active_section()?.set_item_at(index, input)?)
    }

    /// Remove an item of the active section
    pub fn remove_item_at(&mut self, index: usize) -> Result<DataItem, SpectrumError> {
        Ok(self.ensure_active_section()?.remove_item_at(index)?)
    }

    /// Remove every item of the active section
    pub fn clear(&mut self) -> Result<(), SpectrumError> {
        self.ensure_active_section()?.clear();
        Ok(())
    }

    /// Sort the active section
    pub fn sort(&mut self) -> Result<(), SpectrumError> {
        self.ensure_active_section()?.sort();
        Ok(())
    }

    /// Number of items of the active section (0 without one)
    pub fn item_count(&self) -> usize {
        self.active_section().map_or(0, DataSection::len)
    }

    /// Item of the active section with omitted values substituted
    pub fn item_at(&self, index: usize) -> Option<DataItem> {
        self.active_section()?.item_at(index)
    }

    /// Point lookup on the active section at `x` of its first independent
    /// variable; peak matching uses the configured tolerance
    pub fn value_at(&self, x: f64) -> Result<Option<DataItem>, SpectrumError> {
        let Some(section) = self.active_section() else {
            return Ok(None);
        };
        let symbols = section.independent_variable_symbols();
        let Some(symbol) = symbols.first() else {
            return Ok(None);
        };
        Ok(section.values_at(&[(*symbol, x)], Some(self.config.lookup.peak_tolerance))?)
    }

    /// Nearest peak of the active section; `tolerance` defaults to the
    /// configured one
    pub fn find_nearest_item_index(
        &self,
        query: &[(&str, f64)],
        tolerance: Option<f64>,
    ) -> Result<Option<usize>, SpectrumError> {
        let Some(section) = self.active_section() else {
            return Ok(None);
        };
        let tolerance = tolerance.unwrap_or(self.config.lookup.peak_tolerance);
        Ok(section.find_nearest_item_index(query, Some(tolerance))?)
    }

    /// Range query on the active section
    pub fn values_in_independent_range(
        &self,
        symbol: &str,
        from: f64,
        to: f64,
        options: RangeQueryOptions,
    ) -> Result<RangeQueryResult, SpectrumError> {
        match self.active_section() {
            Some(section) => Ok(section.values_in_independent_range(symbol, from, to, options)?),
            None => Ok(RangeQueryResult::default()),
        }
    }

    /// Internal-unit range of `symbol` in the active section
    pub fn range_of(
        &self,
        symbol: &str,
        options: RangeOptions,
    ) -> Result<Option<DataRange>, SpectrumError> {
        match self.active_section() {
            Some(section) => Ok(section.range_of(symbol, options)?),
            None => Ok(None),
        }
    }

    /// External-unit range of `symbol` in the active section
    pub fn external_range_of(
        &self,
        symbol: &str,
        options: RangeOptions,
    ) -> Result<Option<DataRange>, SpectrumError> {
        match self.active_section() {
            Some(section) => {
                Ok(section.external_range_of(symbol, options, &self.registry, Some(self))?)
            }
            None => Ok(None),
        }
    }

    /// Average of `symbol` in the active section
    pub fn average_of(&self, symbol: &str, options: RangeOptions) -> Result<Option<f64>, SpectrumError> {
        match self.active_section() {
            Some(section) => Ok(section.average_of(symbol, options)?),
            None => Ok(None),
        }
    }

    // ==================== Cross-section ====================

    /// Union of the ranges of `symbol` over every section holding it
    pub fn merged_range(
        &self,
        symbol: &str,
        options: RangeOptions,
    ) -> Result<Option<DataRange>, SpectrumError> {
        self.require_variable(symbol)?;
        let mut merged: Option<DataRange> = None;
        for section in self.sections.iter().filter(|s| s.has_variable(symbol)) {
            if let Some(range) = section.range_of(symbol, options)? {
                merged = Some(match merged {
                    Some(m) => m.merge(&range),
                    None => range,
                });
            }
        }
        Ok(merged)
    }

    /// [`merged_range`](Self::merged_range) in the external unit
    pub fn external_merged_range(
        &self,
        symbol: &str,
        options: RangeOptions,
    ) -> Result<Option<DataRange>, SpectrumError> {
        let Some(range) = self.merged_range(symbol, options)? else {
            return Ok(None);
        };
        let a = self.to_external_value(symbol, range.min)?;
        let b = self.to_external_value(symbol, range.max)?;
        Ok(Some(DataRange::new(a, b)))
    }

    /// Check the structural invariants of a deserialized dataset
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        for (i, var) in self.variables.iter().enumerate() {
            if self.variables[..i].iter().any(|v| v.symbol == var.symbol) {
                return Err(format!("duplicate variable '{}'", var.symbol));
            }
        }
        for section in &self.sections {
            for var in section.variables() {
                if self.variable(&var.symbol).is_none() {
                    return Err(format!(
                        "section '{}' uses unknown variable '{}'",
                        section.name(),
                        var.symbol
                    ));
                }
            }
            section
                .check_consistency()
                .map_err(|e| format!("section '{}': {}", section.name(), e))?;
        }
        if let Some(index) = self.active_section_index {
            if index >= self.sections.len() {
                return Err(format!(
                    "active section index {} out of bounds ({} sections)",
                    index,
                    self.sections.len()
                ));
            }
        }
        Ok(())
    }
}

impl ParameterSource for SpectrumData {
    fn parameter(&self, key: &str) -> Option<&ParameterValue> {
        self.parameters.get(key)
    }
}
