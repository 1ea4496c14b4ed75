//! Variable definitions: one measured axis of a spectrum (e.g. chemical shift,
//! wavenumber, intensity).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dependency role of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarDependency {
    /// Set by the measurement (frequency, time, wavelength...)
    Independent,
    /// Measured or derived from the independent variables (intensity...)
    Dependent,
}

/// Describes one measured axis of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Symbol, unique within a dataset (e.g. "x", "y")
    pub symbol: String,

    /// Optional human-readable name
    pub name: Option<String>,

    /// Dependency role
    pub dependency: VarDependency,

    /// Unit key the values are stored in
    pub internal_unit: String,

    /// Unit key the values are displayed in, if different
    pub external_unit: Option<String>,
}

impl VariableDefinition {
    /// Create an independent variable
    pub fn independent(symbol: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            dependency: VarDependency::Independent,
            internal_unit: unit.into(),
            external_unit: None,
        }
    }

    /// Create a dependent variable
    pub fn dependent(symbol: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            dependency: VarDependency::Dependent,
            ..Self::independent(symbol, unit)
        }
    }

    /// Set the display unit
    pub fn with_external_unit(mut self, unit: impl Into<String>) -> Self {
        self.external_unit = Some(unit.into());
        self
    }

    /// Set the human-readable name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this is an independent variable
    pub fn is_independent(&self) -> bool {
        self.dependency == VarDependency::Independent
    }

    /// Whether this is a dependent variable
    pub fn is_dependent(&self) -> bool {
        self.dependency == VarDependency::Dependent
    }

    /// The unit values are displayed in, falling back to the internal unit
    pub fn actual_external_unit(&self) -> &str {
        self.external_unit.as_deref().unwrap_or(&self.internal_unit)
    }

    /// Whether displaying this variable requires a unit conversion
    pub fn needs_conversion(&self) -> bool {
        self.actual_external_unit() != self.internal_unit
    }
}

impl fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.dependency {
            VarDependency::Independent => "independent",
            VarDependency::Dependent => "dependent",
        };
        match &self.external_unit {
            Some(ext) if ext != &self.internal_unit => write!(
                f,
                "{} [{}] ({}, shown as {})",
                self.symbol, self.internal_unit, role, ext
            ),
            _ => write!(f, "{} [{}] ({})", self.symbol, self.internal_unit, role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_unit_fallback() {
        let x = VariableDefinition::independent("x", "Hz");
        assert_eq!(x.actual_external_unit(), "Hz");
        assert!(!x.needs_conversion());

        let x = x.with_external_unit("ppm");
        assert_eq!(x.actual_external_unit(), "ppm");
        assert!(x.needs_conversion());
    }

    #[test]
    fn test_dependency_roles() {
        let y = VariableDefinition::dependent("y", "arb").with_name("intensity");
        assert!(y.is_dependent());
        assert!(!y.is_independent());
        assert_eq!(y.name.as_deref(), Some("intensity"));
        assert_eq!(y.to_string(), "y [arb] (dependent)");
    }
}
