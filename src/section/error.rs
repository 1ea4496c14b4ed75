use crate::units::UnitError;

/// Errors that can occur while mutating or querying a data section
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SectionError {
    /// A positional item does not have one value per local variable
    #[error("Item has {actual} values, section expects {expected}")]
    ItemLengthMismatch {
        /// Number of local variables
        expected: usize,
        /// Number of supplied values
        actual: usize,
    },

    /// The symbol is not a local variable of the section
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Two local variables share the same symbol
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),

    /// The operation requires an independent variable
    #[error("Variable '{0}' is not independent")]
    NotIndependent(String),

    /// The section has no independent variable to look up by
    #[error("Section has no independent variable")]
    NoIndependentVariable,

    /// Item index outside the stored items
    #[error("Index {index} out of bounds (section holds {len} items)")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of stored items
        len: usize,
    },

    /// Unit conversion failed at the external boundary
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),
}
