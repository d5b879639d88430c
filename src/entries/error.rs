//! Entry error types
//!
//! Validation failures for submitted entries and filter criteria.

use thiserror::Error;

/// Errors raised while validating entries or criteria
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    /// A required field was missing or blank
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A numeric field fell outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Both an enumerated time range and an explicit date range were set
    #[error("Invalid criteria: time_range and date_range are mutually exclusive")]
    ConflictingTimeFilters,

    /// A min/max range with min greater than max
    #[error("Invalid criteria: {0} range has min greater than max")]
    InvertedRange(&'static str),

    /// A string did not name a known enumeration value
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

/// Result type alias for entry validation
pub type EntryResult<T> = Result<T, EntryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EntryError::OutOfRange {
            field: "intensity",
            value: 11,
            min: 1,
            max: 10,
        };
        assert_eq!(err.to_string(), "intensity must be between 1 and 10, got 11");

        let err = EntryError::UnknownValue {
            kind: "emotion",
            value: "meh".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown emotion: meh");
    }
}
