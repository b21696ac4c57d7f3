//! Phrase recognizer patterns, compiled once and cached
//!
//! The parser tries these in a fixed order because broader patterns would
//! otherwise swallow text that a narrower one should own ("every monday"
//! must not be claimed by the generic interval pattern, and "on january
//! 15th" must win over an independently matched month and day). The order
//! itself lives in [`crate::natural`]; this module only owns the compiled
//! expressions.

use regex::Regex;
use std::sync::OnceLock;

/// Day-name alternation, longest spelling first
const DAY: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday\
                   |mon|tue|wed|thu|fri|sat|sun";

/// Month-name alternation, longest spelling first
const MONTH: &str = "january|february|march|april|may|june|july|august\
                     |september|october|november|december\
                     |jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec";

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("pattern table regex must compile"))
}

/// Combined range+step phrase, fully self-contained:
/// "every 5 minutes between 0 and 30 of each hour"
pub(crate) fn range_step() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"^every\s+(\d{1,4})\s+(minutes?|hours?)\s+between\s+(\d{1,2})\s+and\s+(\d{1,2})\s+of\s+each\s+(hour|day)$",
    )
}

/// "every monday,wednesday,friday" (two or more names)
pub(crate) fn bare_day_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        &format!(r"^every\s+((?:{DAY})(?:\s*,\s*(?:{DAY}))+)\b"),
    )
}

/// "every tuesday-thursday"
pub(crate) fn bare_day_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"^every\s+({DAY})\s*-\s*({DAY})\b"))
}

/// "every monday"
pub(crate) fn bare_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"^every\s+({DAY})\b"))
}

/// "every weekday" / "every weekend"
pub(crate) fn bare_day_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^every\s+(weekday|weekend)s?\b")
}

/// "between monday and friday" — canonical spans only, validated by the parser
pub(crate) fn between_days() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"\bbetween\s+({DAY})\s+and\s+({DAY})\b"))
}

/// Mid-phrase day constraint: "on monday,wednesday" (list form)
pub(crate) fn on_day_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        &format!(r"\bon\s+((?:{DAY})(?:\s*,\s*(?:{DAY}))+)\b"),
    )
}

/// Mid-phrase day constraint: "on tuesday-thursday"
pub(crate) fn on_day_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"\bon\s+({DAY})\s*-\s*({DAY})\b"))
}

/// Mid-phrase day constraint: "on monday"
pub(crate) fn on_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"\bon\s+({DAY})\b"))
}

/// Mid-phrase pattern keyword: "on weekdays" / "on weekends"
pub(crate) fn on_day_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bon\s+(weekday|weekend)s?\b")
}

/// Combined month+day shorthand: "on january 15th"
pub(crate) fn month_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        &format!(r"\bon\s+({MONTH})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"),
    )
}

/// "in january,april,july,october"
pub(crate) fn month_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        &format!(r"\bin\s+((?:{MONTH})(?:\s*,\s*(?:{MONTH}))+)\b"),
    )
}

/// "in january-march"
pub(crate) fn month_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"\bin\s+({MONTH})\s*-\s*({MONTH})\b"))
}

/// "in january"
pub(crate) fn month_single() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"\bin\s+({MONTH})\b"))
}

/// "on the last weekday"
pub(crate) fn last_weekday() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bon\s+the\s+last\s+weekday\b")
}

/// "on the last day"
pub(crate) fn last_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bon\s+the\s+last\s+day\b")
}

/// "on the 3rd to last day"
pub(crate) fn nth_to_last_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bon\s+the\s+(\d{1,2})(?:st|nd|rd|th)?\s+to\s+last\s+day\b")
}

/// "on the nearest weekday to the 15th"
pub(crate) fn nearest_weekday() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"\bon\s+the\s+nearest\s+weekday\s+to\s+the\s+(\d{1,2})(?:st|nd|rd|th)?\b",
    )
}

/// "on the 2nd tuesday"
pub(crate) fn nth_weekday() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        &format!(r"\bon\s+the\s+(\d)(?:st|nd|rd|th)\s+({DAY})\b"),
    )
}

/// "on the last friday"
pub(crate) fn last_of_weekday() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, &format!(r"\bon\s+the\s+last\s+({DAY})\b"))
}

/// "on the 10th-20th" with optional "/2" step
pub(crate) fn dom_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"\bon\s+(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)?\s*-\s*(\d{1,2})(?:st|nd|rd|th)?(?:\s*/\s*(\d{1,2}))?",
    )
}

/// "on the 1st,15th"
pub(crate) fn dom_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"\bon\s+(?:the\s+)?(\d{1,2}(?:st|nd|rd|th)?(?:\s*,\s*\d{1,2}(?:st|nd|rd|th)?)+)\b",
    )
}

/// "on the 15th" / "on 15"
pub(crate) fn dom_single() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bon\s+(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)?\b")
}

/// 12-hour time: "at 2pm" / "at 2:30pm"
pub(crate) fn time_12h() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b")
}

/// 24-hour time: "at 14:30"
pub(crate) fn time_24h() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bat\s+(\d{1,2}):(\d{2})\b")
}

/// Auxiliary numeric fields: "at minutes 0,15,30" / "at hours 9-17" /
/// "at seconds 0,30" / "at minutes 5-50/15"
pub(crate) fn aux_values() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bat\s+(seconds|minutes|hours)\s+([0-9][0-9,\-/]*)")
}

/// Year constraint: "in 2027"
pub(crate) fn year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bin\s+(\d{4})\b")
}

/// Explicit interval: "every 5 minutes"
pub(crate) fn interval_count() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^every\s+(\d{1,4})\s+([a-z]+)\b")
}

/// Implicit count of one: "every day"
pub(crate) fn interval_unit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^every\s+([a-z]+)\b")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        // Forces every OnceLock through its init path.
        range_step();
        bare_day_list();
        bare_day_range();
        bare_day();
        bare_day_pattern();
        between_days();
        on_day_list();
        on_day_range();
        on_day();
        on_day_pattern();
        month_day();
        month_list();
        month_range();
        month_single();
        last_weekday();
        last_day();
        nth_to_last_day();
        nearest_weekday();
        nth_weekday();
        last_of_weekday();
        dom_range();
        dom_list();
        dom_single();
        time_12h();
        time_24h();
        aux_values();
        year();
        interval_count();
        interval_unit();
    }

    #[test]
    fn test_day_alternation_boundaries() {
        // "mon" must not match inside "month"
        assert!(!bare_day().is_match("every month"));
        assert!(bare_day().is_match("every monday"));
        assert!(bare_day().is_match("every mon"));
    }

    #[test]
    fn test_month_day_shorthand() {
        let caps = month_day().captures("on january 15th").unwrap();
        assert_eq!(&caps[1], "january");
        assert_eq!(&caps[2], "15");
    }

    #[test]
    fn test_dom_single_requires_digits() {
        // "on january 15th" must be left to the month+day shorthand
        assert!(!dom_single().is_match("on january"));
        assert!(dom_single().is_match("on the 15th"));
        assert!(dom_single().is_match("on 15"));
    }

    #[test]
    fn test_range_step_is_anchored() {
        assert!(range_step().is_match("every 5 minutes between 0 and 30 of each hour"));
        assert!(!range_step().is_match("every 5 minutes between 0 and 30 of each hour at 2pm"));
    }

    #[test]
    fn test_year_vs_month() {
        assert!(year().is_match("in 2027"));
        assert!(!year().is_match("in january"));
        assert!(month_single().is_match("in january"));
        assert!(!month_single().is_match("in 2027"));
    }
}
