//! A3S Schedule - Bidirectional schedule translation library
//!
//! Translates between human-readable schedule phrases and cron
//! expressions, in both directions:
//! - Phrase parsing ("every day at 2pm") into a structured schedule
//! - Canonical phrase formatting with normalization
//! - Encoding to standard 5-field, seconds-prefixed 6-field, and
//!   extended Quartz-style cron dialects
//! - Decoding cron expressions back into schedules
//! - One-shot timezone conversion of schedule times
//!
//! ## Quick Start
//!
//! ```
//! use a3s_schedule::{parse_phrase, format_phrase, encode, decode, CronDialect};
//!
//! let spec = parse_phrase("every weekday at 9am")?;
//! assert_eq!(encode(&spec, CronDialect::Standard)?, "0 9 * * 1-5");
//!
//! let spec = decode("0 14 * * *", CronDialect::Standard)?;
//! assert_eq!(format_phrase(&spec), "every day at 2pm");
//! # Ok::<(), a3s_schedule::ScheduleError>(())
//! ```

mod decode;
mod dialect;
mod encode;
mod fields;
mod format;
pub mod natural;
mod patterns;
mod spec;
mod tz;
mod types;

pub use decode::decode;
pub use dialect::CronDialect;
pub use encode::encode;
pub use format::{format_phrase, normalize};
pub use natural::parse_phrase;
pub use spec::{
    DayConstraint, DayOfMonth, DayPattern, FieldValues, IntervalUnit, MonthSpec, ScheduleSpec,
    SpecialDay, TimeOfDay, Weekday, MAX_INTERVAL,
};
pub use tz::{convert_to_zone, Clock, FixedClock, SystemClock};
pub use types::{Result, ScheduleError};
