use thiserror::Error as ThisError;

///
/// Error
///
/// Build- and compile-time failures for criteria, sort conditions, and
/// specifications. Everything here is raised synchronously while a
/// specification is being constructed or compiled; compiled filters and
/// sorters never fail during evaluation.
///

#[derive(Clone, Debug, ThisError)]
pub enum Error {
    /// Selector string is empty, malformed, or does not resolve against the
    /// target entity schema.
    #[error("selector '{selector}' does not resolve on entity '{entity}': {reason}")]
    InvalidSelector {
        selector: String,
        entity: String,
        reason: String,
    },

    /// Two criteria bound to different entity types were combined.
    #[error("criteria entity type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    /// A value could not be normalized to the required field type and no
    /// lenient fallback applies.
    #[error("cannot convert value '{value}' to {target}")]
    ValueConversion { value: String, target: String },

    /// An operator was used against an incompatible field type.
    #[error("operator {operator} is not supported on field '{field}': {reason}")]
    UnsupportedOperator {
        operator: String,
        field: String,
        reason: String,
    },

    /// A condition graph or specification could not be encoded or decoded.
    #[error("encode/decode failure: {message}")]
    Encode { message: String },

    /// A specification file could not be read or written.
    #[error("io failure for '{path}': {message}")]
    Io { path: String, message: String },
}

impl Error {
    /// Construct an invalid-selector error.
    pub(crate) fn invalid_selector(
        selector: impl Into<String>,
        entity: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Construct a value-conversion error.
    pub(crate) fn value_conversion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::ValueConversion {
            value: value.into(),
            target: target.into(),
        }
    }

    /// Construct an unsupported-operator error.
    pub(crate) fn unsupported_operator(
        operator: impl ToString,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedOperator {
            operator: operator.to_string(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode {
            message: err.to_string(),
        }
    }
}
