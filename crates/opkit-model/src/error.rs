//! Error types for the opkit model.

/// Errors raised while binding values against operation metadata.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No schema in the catalog matches the requested operation or command.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A bound name does not match any parameter descriptor (or alias).
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// A bound value does not have the declared semantic type.
    #[error("parameter {param}: expected {expected}, got {got}")]
    TypeMismatch {
        /// The parameter (or nested field) being bound.
        param: String,
        /// The declared kind.
        expected: &'static str,
        /// The JSON type actually supplied.
        got: &'static str,
    },

    /// An enum-typed value is not a member of the declared constant set.
    #[error("parameter {param}: {value:?} is not one of {allowed:?}")]
    EnumOutOfRange {
        /// The parameter being bound.
        param: String,
        /// The rejected value.
        value: String,
        /// The declared constant set.
        allowed: Vec<&'static str>,
    },

    /// A select expression could not be parsed.
    #[error("malformed select expression: {0}")]
    MalformedSelect(String),
}
