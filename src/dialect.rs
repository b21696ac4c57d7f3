//! Cron dialects
//!
//! Three field grammars share the encoder/decoder machinery and differ in
//! field count, interval granularity, and operator support:
//!
//! ```text
//! Standard      minute hour day month weekday
//! WithSeconds   second minute hour day month weekday
//! Extended      second minute hour day month weekday [year]
//! ```
//!
//! Only `Extended` carries the reserved day operators (`L`, `LW`, `L-n`,
//! `nW`, `d#n`, `dL`), the `?` no-specific-value token, and the optional
//! trailing year field.

use serde::{Deserialize, Serialize};

/// A cron text grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CronDialect {
    /// Classic 5-field cron
    Standard,
    /// 6-field cron with a leading seconds field, no operators
    WithSeconds,
    /// Quartz-style 6/7-field cron with day operators and optional year
    Extended,
}

impl CronDialect {
    /// True when the dialect has a leading seconds field
    pub fn has_seconds(self) -> bool {
        !matches!(self, CronDialect::Standard)
    }

    /// True when the dialect accepts a trailing year field
    pub fn has_year(self) -> bool {
        matches!(self, CronDialect::Extended)
    }

    /// True when the dialect reserves the advanced day operators and `?`
    pub fn has_day_operators(self) -> bool {
        matches!(self, CronDialect::Extended)
    }

    /// Accepted field counts, for error messages
    pub fn expected_fields(self) -> &'static str {
        match self {
            CronDialect::Standard => "5",
            CronDialect::WithSeconds => "6",
            CronDialect::Extended => "6 or 7",
        }
    }

    /// Whether the given field count is valid for this dialect
    pub fn accepts_field_count(self, count: usize) -> bool {
        match self {
            CronDialect::Standard => count == 5,
            CronDialect::WithSeconds => count == 6,
            CronDialect::Extended => count == 6 || count == 7,
        }
    }
}

impl std::fmt::Display for CronDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CronDialect::Standard => write!(f, "standard"),
            CronDialect::WithSeconds => write!(f, "with-seconds"),
            CronDialect::Extended => write!(f, "extended"),
        }
    }
}
