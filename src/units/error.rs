/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    /// The unit key is not in the catalog
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// No registered converter accepts the requested conversion
    #[error("No converter available from '{from}' to '{to}'{}", variable_suffix(.variable))]
    ConversionUnavailable {
        /// Source unit key
        from: String,
        /// Target unit key
        to: String,
        /// Symbol of the variable being converted, if known
        variable: Option<String>,
    },

    /// A converter accepted the request but could not produce a finite value
    #[error("Cannot convert {value} from '{from}' to '{to}'")]
    InvalidValue {
        /// The rejected value
        value: f64,
        /// Source unit key
        from: String,
        /// Target unit key
        to: String,
    },
}

fn variable_suffix(variable: &Option<String>) -> String {
    variable
        .as_ref()
        .map(|v| format!(" for variable '{}'", v))
        .unwrap_or_default()
}
