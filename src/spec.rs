//! The schedule specification model
//!
//! [`ScheduleSpec`] is the intermediate representation shared by the phrase
//! parser, the formatter, and the cron codecs. It is constructed once per
//! parse/decode call and never mutated afterward; every transform is a pure
//! function returning a new value.

use serde::{Deserialize, Serialize};

/// Upper bound on interval counts accepted by the parser
pub const MAX_INTERVAL: u32 = 1000;

/// Repeat interval unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl IntervalUnit {
    /// Singular unit name as it appears in phrases
    pub fn singular(self) -> &'static str {
        match self {
            Self::Seconds => "second",
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Days => "day",
            Self::Weeks => "week",
            Self::Months => "month",
            Self::Years => "year",
        }
    }

    /// Plural unit name as it appears in phrases
    pub fn plural(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Parse a unit word, singular or plural
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim_end_matches('s') {
            "second" => Some(Self::Seconds),
            "minute" => Some(Self::Minutes),
            "hour" => Some(Self::Hours),
            "day" => Some(Self::Days),
            "week" => Some(Self::Weeks),
            "month" => Some(Self::Months),
            "year" => Some(Self::Years),
            _ => None,
        }
    }
}

/// Day of the week, cron numbering (0=Sunday .. 6=Saturday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Cron day number: 0=Sunday .. 6=Saturday
    pub fn number(self) -> u32 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            0 | 7 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    /// Full lowercase name as it appears in phrases
    pub fn name(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }

    /// Parse a full or three-letter day name, case-insensitive
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Some(Self::Sunday),
            "monday" | "mon" => Some(Self::Monday),
            "tuesday" | "tue" => Some(Self::Tuesday),
            "wednesday" | "wed" => Some(Self::Wednesday),
            "thursday" | "thu" => Some(Self::Thursday),
            "friday" | "fri" => Some(Self::Friday),
            "saturday" | "sat" => Some(Self::Saturday),
            _ => None,
        }
    }
}

/// Named day-of-week pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPattern {
    /// Monday through Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
}

impl DayPattern {
    pub fn days(self) -> &'static [Weekday] {
        match self {
            Self::Weekdays => &[
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
            ],
            Self::Weekends => &[Weekday::Saturday, Weekday::Sunday],
        }
    }
}

/// Day-of-week constraint
///
/// The single-day, pattern, list, and range forms are mutually exclusive by
/// construction: a spec carries exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayConstraint {
    /// No day-of-week restriction
    Any,
    /// A single day ("every monday")
    Single(Weekday),
    /// Weekdays or weekends
    Pattern(DayPattern),
    /// An explicit list ("every monday,wednesday,friday")
    List(Vec<Weekday>),
    /// An inclusive range; may wrap the week boundary
    /// (Friday..Monday denotes Fri, Sat, Sun, Mon)
    Range(Weekday, Weekday),
}

impl DayConstraint {
    pub fn is_any(&self) -> bool {
        matches!(self, DayConstraint::Any)
    }

    /// Expand to the set of days the constraint denotes, in cron-number order
    pub fn expand(&self) -> Vec<Weekday> {
        match self {
            DayConstraint::Any => Weekday::ALL.to_vec(),
            DayConstraint::Single(d) => vec![*d],
            DayConstraint::Pattern(p) => {
                let mut days = p.days().to_vec();
                days.sort_by_key(|d| d.number());
                days
            }
            DayConstraint::List(days) => {
                let mut days = days.clone();
                days.sort_by_key(|d| d.number());
                days.dedup();
                days
            }
            DayConstraint::Range(start, end) => {
                let mut days = Vec::new();
                let mut n = start.number();
                loop {
                    days.push(Weekday::from_number(n).unwrap_or(Weekday::Sunday));
                    if n == end.number() {
                        break;
                    }
                    n = (n + 1) % 7;
                }
                days.sort_by_key(|d| d.number());
                days
            }
        }
    }
}

/// Day-of-month constraint
///
/// Only produced by the phrase parser for monthly/yearly units, but carried
/// as dialect-agnostic data the codec renders regardless of provenance.
/// Values are deliberately not domain-checked at parse time (day 32 and
/// February 30th pass through to dialect output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfMonth {
    Single(u32),
    List(Vec<u32>),
    Range {
        start: u32,
        end: u32,
        step: Option<u32>,
    },
}

/// Advanced day-of-month / day-of-week operators (extended dialect only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialDay {
    /// Last calendar day of the month (`L`)
    LastDay,
    /// Last weekday (Mon-Fri) of the month (`LW`)
    LastWeekday,
    /// N days before the end of the month (`L-N`)
    DaysBeforeEnd(u32),
    /// Weekday nearest to the given day of month (`NW`)
    NearestWeekday(u32),
    /// Nth occurrence of a weekday in the month (`d#n`)
    NthWeekday { weekday: Weekday, nth: u32 },
    /// Last occurrence of a weekday in the month (`dL`)
    LastOfWeekday(Weekday),
}

/// Month constraint as a tagged union; variants are mutually exclusive by
/// construction, not by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthSpec {
    /// No month restriction
    Any,
    /// A single month (1-12)
    Single(u32),
    /// An inclusive month range
    Range(u32, u32),
    /// An explicit month list
    List(Vec<u32>),
}

impl MonthSpec {
    pub fn is_any(&self) -> bool {
        matches!(self, MonthSpec::Any)
    }
}

/// Full lowercase month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "january",
        2 => "february",
        3 => "march",
        4 => "april",
        5 => "may",
        6 => "june",
        7 => "july",
        8 => "august",
        9 => "september",
        10 => "october",
        11 => "november",
        12 => "december",
        _ => "?",
    }
}

/// Parse a full or three-letter month name, case-insensitive
pub fn month_from_name(s: &str) -> Option<u32> {
    match s.to_ascii_lowercase().as_str() {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Auxiliary numeric field values for sub-day granularity
/// (minute/hour/second lists, or a range with an optional step)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValues {
    List(Vec<u32>),
    Range {
        start: u32,
        end: u32,
        step: Option<u32>,
    },
}

/// A time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    /// Hour, 0-23
    pub hour: u32,
    /// Minute, 0-59
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

/// The schedule specification
///
/// Produced by [`crate::parse_phrase`] and [`crate::decode`], consumed by
/// [`crate::format_phrase`] and [`crate::encode`]. Immutable by convention:
/// no operation in this crate mutates an existing spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Interval count, 1-1000
    pub interval: u32,

    /// Interval unit
    pub unit: IntervalUnit,

    /// Time of day the schedule fires, if fixed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,

    /// IANA timezone id; `None` means unspecified (treated as UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Day-of-week constraint
    pub days: DayConstraint,

    /// Day-of-month constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<DayOfMonth>,

    /// Advanced day operator (extended dialect only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_day: Option<SpecialDay>,

    /// Month constraint
    pub months: MonthSpec,

    /// Auxiliary second values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_values: Option<FieldValues>,

    /// Auxiliary minute values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute_values: Option<FieldValues>,

    /// Auxiliary hour values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour_values: Option<FieldValues>,

    /// Explicit year constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

impl ScheduleSpec {
    /// A spec that fires once per `unit` with no other constraints
    pub fn every(interval: u32, unit: IntervalUnit) -> Self {
        Self {
            interval,
            unit,
            time: None,
            timezone: None,
            days: DayConstraint::Any,
            day_of_month: None,
            special_day: None,
            months: MonthSpec::Any,
            second_values: None,
            minute_values: None,
            hour_values: None,
            year: None,
        }
    }

    /// Set the time of day
    pub fn at(mut self, hour: u32, minute: u32) -> Self {
        self.time = Some(TimeOfDay::new(hour, minute));
        self
    }

    /// Set the timezone id
    pub fn in_zone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }
}
