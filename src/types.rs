//! Core types for the schedule library

use thiserror::Error;

/// Result type alias for schedule operations
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Schedule library errors
///
/// Every public operation reports failures through this type; nothing in the
/// library panics on user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Input phrase or expression was empty
    #[error("Input is empty")]
    EmptyInput,

    /// No pattern matches the phrase
    #[error("Could not parse schedule: {0}")]
    GrammarMismatch(String),

    /// A numeric value is outside a field's legal domain
    #[error("{field} value {value} out of range ({min}-{max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Two mutually exclusive constraints were both set
    #[error("Conflicting constraints: {0}")]
    Conflicting(String),

    /// The target dialect cannot represent the requested schedule
    #[error("Not supported by this cron dialect: {0}")]
    UnsupportedByDialect(String),

    /// A cron expression had the wrong field count
    #[error("Expected {expected} cron fields, got {got}")]
    MalformedField { expected: String, got: usize },

    /// Timezone id not found in the zone database
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl ScheduleError {
    /// Shorthand for a grammar error with a formatted message
    pub(crate) fn grammar(msg: impl Into<String>) -> Self {
        ScheduleError::GrammarMismatch(msg.into())
    }

    /// Shorthand for an out-of-range error
    pub(crate) fn range(field: &'static str, value: u32, min: u32, max: u32) -> Self {
        ScheduleError::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScheduleError::range("minute", 75, 0, 59);
        assert_eq!(err.to_string(), "minute value 75 out of range (0-59)");

        let err = ScheduleError::MalformedField {
            expected: "5".to_string(),
            got: 3,
        };
        assert_eq!(err.to_string(), "Expected 5 cron fields, got 3");
    }

    #[test]
    fn test_grammar_shorthand() {
        let err = ScheduleError::grammar("no pattern matched 'gibberish'");
        assert!(err.to_string().contains("gibberish"));
    }
}
