use crate::section::SectionError;
use crate::units::UnitError;

/// Errors that can occur during spectrum operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    /// Error from a data section
    #[error("Section error: {0}")]
    Section(#[from] SectionError),

    /// Unit lookup or conversion failed
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    /// The symbol is not a variable of the spectrum
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A variable with this symbol already exists
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),

    /// The variable cannot be removed while a section uses it
    #[error("Variable '{symbol}' is used by section '{section}'")]
    VariableInUse {
        /// Symbol of the variable
        symbol: String,
        /// Name of the first section using it
        section: String,
    },

    /// Variable position outside the variable list
    #[error("Variable index {index} out of bounds (spectrum has {len} variables)")]
    VariableIndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of variables
        len: usize,
    },

    /// Section index outside the section list
    #[error("Section index {index} out of bounds (spectrum has {len} sections)")]
    SectionIndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of sections
        len: usize,
    },

    /// Several sections exist and none is marked active
    #[error("No active section")]
    NoActiveSection,
}
