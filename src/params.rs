//! Named dataset parameters (e.g. the NMR observe frequency) and the lookup
//! trait unit converters use to reach them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter key holding the NMR spectrometer observe frequency
pub const OBSERVE_FREQUENCY_PARAM: &str = "ObserveFrequency";

/// A numeric parameter value with an optional unit key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    /// Numeric value
    pub value: f64,
    /// Unit key of the value
    pub unit: Option<String>,
}

impl ParameterValue {
    /// Create a parameter value with a unit
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }

    /// Create a unitless parameter value
    pub fn unitless(value: f64) -> Self {
        Self { value, unit: None }
    }
}

/// Named parameter lookup exposed by the owning dataset
pub trait ParameterSource {
    /// Returns the parameter stored under `key`
    fn parameter(&self, key: &str) -> Option<&ParameterValue>;
}

impl ParameterSource for BTreeMap<String, ParameterValue> {
    fn parameter(&self, key: &str) -> Option<&ParameterValue> {
        self.get(key)
    }
}
