//! Error types shared by every fallible plotting operation.

/// Errors raised by validation, trace creation, viewport updates and the clock.
///
/// Every variant describes a caller-input error. The rejected operation never
/// applies partially, so the caller can always recover and retry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// A value did not have the expected primitive type.
    #[error("`{property}` expects a value of type {expected}, got {found}")]
    WrongType {
        /// Property or element being validated.
        property: String,
        /// Expected type name.
        expected: &'static str,
        /// Type name of the rejected value.
        found: &'static str,
    },
    /// A value is not a member of the allowed choice set.
    #[error("`{property}` must be one of {choices:?}, got {found:?}")]
    InvalidChoice {
        /// Property being validated.
        property: String,
        /// Allowed choices.
        choices: Vec<String>,
        /// Rejected value.
        found: String,
    },
    /// A list was expected.
    #[error("`{property}` expects a list")]
    NotArray {
        /// Property being validated.
        property: String,
    },
    /// A list had the wrong number of elements.
    #[error("`{property}` expects {expected} elements, got {found}")]
    WrongLength {
        /// Property being validated.
        property: String,
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// A per-axis value had neither one nor two components.
    #[error("`{property}` expects one or two values, got {found}")]
    WrongArity {
        /// Property being validated.
        property: String,
        /// Number of values supplied.
        found: usize,
    },
    /// A value that must be strictly positive was not.
    #[error("`{property}` must be positive, got {value}")]
    NonPositive {
        /// Property being validated.
        property: String,
        /// Rejected value.
        value: f64,
    },
    /// A value that must be finite was NaN or infinite.
    #[error("`{property}` must be finite, got {value}")]
    NonFinite {
        /// Property being validated.
        property: String,
        /// Rejected value.
        value: f64,
    },
    /// Colour text could not be parsed.
    #[error("invalid colour {0:?}")]
    InvalidColour(String),
    /// A trace with the same id already exists on the surface.
    #[error("trace `{0}` already exists")]
    DuplicateTraceId(String),
    /// The surface has no trace with this id.
    #[error("trace `{0}` does not exist")]
    UnknownTrace(String),
    /// An object with the same id is already registered with the clock.
    #[error("object `{0}` is already registered with the clock")]
    DuplicateObjectId(String),
    /// The clock has no object with this id.
    #[error("object `{0}` is not registered with the clock")]
    UnknownObject(String),
    /// Trace data matched none of the supported shapes.
    #[error("unrecognised trace data shape: {0}")]
    UnrecognisedDataShape(String),
    /// A data function did not produce a number at time 0.
    #[error("`{0}` did not return a number at time 0")]
    NonNumericFunctionResult(String),
    /// A min/max pair had `max < min` (or an empty span where one is required).
    #[error("invalid range for `{property}`: [{min}, {max}]")]
    InvalidRange {
        /// Property being validated.
        property: String,
        /// Requested minimum.
        min: f64,
        /// Requested maximum.
        max: f64,
    },
    /// A render target could not be located.
    #[error("element `{0}` not found")]
    ElementNotFound(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_property() {
        let err = PlotError::WrongArity {
            property: "scale".into(),
            found: 3,
        };
        assert_eq!(err.to_string(), "`scale` expects one or two values, got 3");

        let err = PlotError::InvalidRange {
            property: "xLims".into(),
            min: 2.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("xLims"));
    }
}
