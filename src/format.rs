//! Natural language schedule formatter
//!
//! Renders a [`ScheduleSpec`] to canonical phrase text. A normalization
//! pass precedes rendering: semantically redundant combinations are
//! rewritten to their simplest logical form first, so `parse(format(s))` is
//! equivalent to the normalized `s` and formatting an already-normalized
//! spec reproduces the same text.

use crate::fields;
use crate::spec::{
    month_name, DayConstraint, DayOfMonth, DayPattern, FieldValues, IntervalUnit, MonthSpec,
    ScheduleSpec, SpecialDay, TimeOfDay, Weekday,
};

/// Rewrite redundant constraint combinations to their simplest form.
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(spec: &ScheduleSpec) -> ScheduleSpec {
    let mut out = spec.clone();
    out.days = normalize_days(&spec.days);
    out.months = normalize_months(&spec.months);
    out.day_of_month = spec.day_of_month.as_ref().map(normalize_day_of_month);
    out
}

fn normalize_days(days: &DayConstraint) -> DayConstraint {
    match days {
        DayConstraint::Any | DayConstraint::Single(_) | DayConstraint::Pattern(_) => days.clone(),
        DayConstraint::List(_) | DayConstraint::Range(..) => {
            let set: Vec<u32> = days.expand().iter().map(|d| d.number()).collect();
            canonical_day_set(&set)
        }
    }
}

/// Preference order: specific day > pattern keyword > range > list
fn canonical_day_set(set: &[u32]) -> DayConstraint {
    if set.len() == 7 {
        return DayConstraint::Any;
    }
    if set == [1, 2, 3, 4, 5] {
        return DayConstraint::Pattern(DayPattern::Weekdays);
    }
    if set == [0, 6] {
        return DayConstraint::Pattern(DayPattern::Weekends);
    }
    if set.len() == 1 {
        return DayConstraint::Single(weekday(set[0]));
    }
    if let Some((start, end)) = fields::circular_run(set, 7) {
        return DayConstraint::Range(weekday(start), weekday(end));
    }
    DayConstraint::List(set.iter().map(|&n| weekday(n)).collect())
}

fn weekday(n: u32) -> Weekday {
    Weekday::from_number(n).unwrap_or(Weekday::Sunday)
}

fn normalize_months(months: &MonthSpec) -> MonthSpec {
    match months {
        MonthSpec::Any | MonthSpec::Single(_) => months.clone(),
        MonthSpec::Range(start, end) => {
            if *start == 1 && *end == 12 {
                MonthSpec::Any
            } else if start == end {
                MonthSpec::Single(*start)
            } else {
                months.clone()
            }
        }
        MonthSpec::List(list) => {
            let mut sorted = list.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() == 12 {
                return MonthSpec::Any;
            }
            if sorted.len() == 1 {
                return MonthSpec::Single(sorted[0]);
            }
            if is_consecutive(&sorted) {
                return MonthSpec::Range(sorted[0], sorted[sorted.len() - 1]);
            }
            MonthSpec::List(sorted)
        }
    }
}

fn normalize_day_of_month(dom: &DayOfMonth) -> DayOfMonth {
    match dom {
        DayOfMonth::Single(_) => dom.clone(),
        DayOfMonth::List(list) => {
            let mut sorted = list.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() == 1 {
                return DayOfMonth::Single(sorted[0]);
            }
            if is_consecutive(&sorted) {
                return DayOfMonth::Range {
                    start: sorted[0],
                    end: sorted[sorted.len() - 1],
                    step: None,
                };
            }
            DayOfMonth::List(sorted)
        }
        DayOfMonth::Range { start, end, step } => {
            if start == end {
                DayOfMonth::Single(*start)
            } else {
                DayOfMonth::Range {
                    start: *start,
                    end: *end,
                    step: *step,
                }
            }
        }
    }
}

fn is_consecutive(sorted: &[u32]) -> bool {
    sorted.len() >= 2 && sorted.windows(2).all(|w| w[1] == w[0] + 1)
}

/// Render a spec to canonical phrase text
///
/// # Examples
///
/// ```
/// use a3s_schedule::{parse_phrase, format_phrase};
///
/// let spec = parse_phrase("every month on the 15th in january").unwrap();
/// assert_eq!(format_phrase(&spec), "on january 15th");
/// ```
pub fn format_phrase(spec: &ScheduleSpec) -> String {
    let spec = normalize(spec);
    let mut parts: Vec<String> = Vec::new();
    let mut minutes_consumed = false;
    let mut hours_consumed = false;
    let mut dom_consumed = false;
    let mut months_consumed = false;

    // The combined range+step phrase is self-contained, so it owns the
    // interval clause when it applies.
    if let (IntervalUnit::Minutes, Some(FieldValues::Range { start, end, step: None })) =
        (spec.unit, &spec.minute_values)
    {
        parts.push(format!(
            "every {} {} between {start} and {end} of each hour",
            spec.interval,
            unit_word(IntervalUnit::Minutes, spec.interval)
        ));
        minutes_consumed = true;
    } else if let (IntervalUnit::Hours, Some(FieldValues::Range { start, end, step: None })) =
        (spec.unit, &spec.hour_values)
    {
        parts.push(format!(
            "every {} {} between {start} and {end} of each day",
            spec.interval,
            unit_word(IntervalUnit::Hours, spec.interval)
        ));
        hours_consumed = true;
    } else if spec.unit == IntervalUnit::Weeks && spec.interval == 1 && !spec.days.is_any() {
        // A bare day phrase implies the weekly interval.
        parts.push(format!("every {}", day_phrase(&spec.days)));
    } else if spec.unit == IntervalUnit::Months
        && spec.interval == 1
        && spec.special_day.is_none()
    {
        // A monthly schedule pinned to one month can only fire once a
        // year; rewrite to the month+day shorthand.
        if let (MonthSpec::Single(month), Some(DayOfMonth::Single(day))) =
            (&spec.months, &spec.day_of_month)
        {
            parts.push(format!("on {} {}", month_name(*month), ordinal(*day)));
            months_consumed = true;
            dom_consumed = true;
        } else {
            parts.push("every month".to_string());
        }
    } else if spec.interval == 1 {
        parts.push(format!("every {}", spec.unit.singular()));
    } else {
        parts.push(format!("every {} {}", spec.interval, spec.unit.plural()));
    }

    // Day constraint for multi-week intervals ("every 2 weeks on monday")
    // and for sub-weekly intervals that a decode constrained by weekday
    // ("every 30 minutes on monday").
    let day_clause_pending = match spec.unit {
        IntervalUnit::Weeks => spec.interval > 1,
        IntervalUnit::Months | IntervalUnit::Years => false,
        _ => true,
    };
    if day_clause_pending && !spec.days.is_any() {
        parts.push(format!("on {}", day_phrase(&spec.days)));
    }

    if let Some(special) = &spec.special_day {
        parts.push(special_day_phrase(special));
    } else if !dom_consumed {
        if let Some(dom) = &spec.day_of_month {
            parts.push(day_of_month_phrase(dom));
        }
    }

    if !months_consumed {
        if let Some(clause) = month_phrase(&spec.months) {
            parts.push(clause);
        }
    }

    if let Some(time) = &spec.time {
        parts.push(format!("at {}", twelve_hour(time)));
    }

    if let Some(values) = &spec.second_values {
        parts.push(format!("at seconds {}", fields::render_field_values(values)));
    }
    if !minutes_consumed {
        if let Some(values) = &spec.minute_values {
            parts.push(format!("at minutes {}", fields::render_field_values(values)));
        }
    }
    if !hours_consumed {
        if let Some(values) = &spec.hour_values {
            parts.push(format!("at hours {}", fields::render_field_values(values)));
        }
    }

    if let Some(year) = spec.year {
        parts.push(format!("in {year}"));
    }

    parts.join(" ")
}

fn unit_word(unit: IntervalUnit, count: u32) -> &'static str {
    if count == 1 {
        unit.singular()
    } else {
        unit.plural()
    }
}

fn day_phrase(days: &DayConstraint) -> String {
    match days {
        DayConstraint::Any => "day".to_string(),
        DayConstraint::Single(d) => d.name().to_string(),
        DayConstraint::Pattern(DayPattern::Weekdays) => "weekday".to_string(),
        DayConstraint::Pattern(DayPattern::Weekends) => "weekend".to_string(),
        DayConstraint::List(list) => list
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(","),
        DayConstraint::Range(start, end) => format!("{}-{}", start.name(), end.name()),
    }
}

fn special_day_phrase(special: &SpecialDay) -> String {
    match special {
        SpecialDay::LastDay => "on the last day".to_string(),
        SpecialDay::LastWeekday => "on the last weekday".to_string(),
        SpecialDay::DaysBeforeEnd(n) => format!("on the {} to last day", ordinal(*n)),
        SpecialDay::NearestWeekday(day) => {
            format!("on the nearest weekday to the {}", ordinal(*day))
        }
        SpecialDay::NthWeekday { weekday, nth } => {
            format!("on the {} {}", ordinal(*nth), weekday.name())
        }
        SpecialDay::LastOfWeekday(weekday) => format!("on the last {}", weekday.name()),
    }
}

fn day_of_month_phrase(dom: &DayOfMonth) -> String {
    match dom {
        DayOfMonth::Single(day) => format!("on the {}", ordinal(*day)),
        DayOfMonth::List(days) => format!(
            "on the {}",
            days.iter()
                .map(|&d| ordinal(d))
                .collect::<Vec<_>>()
                .join(",")
        ),
        DayOfMonth::Range { start, end, step } => {
            let mut clause = format!("on the {}-{}", ordinal(*start), ordinal(*end));
            if let Some(step) = step {
                clause.push_str(&format!("/{step}"));
            }
            clause
        }
    }
}

fn month_phrase(months: &MonthSpec) -> Option<String> {
    match months {
        MonthSpec::Any => None,
        MonthSpec::Single(m) => Some(format!("in {}", month_name(*m))),
        MonthSpec::Range(start, end) => {
            Some(format!("in {}-{}", month_name(*start), month_name(*end)))
        }
        MonthSpec::List(list) => Some(format!(
            "in {}",
            list.iter()
                .map(|&m| month_name(m))
                .collect::<Vec<_>>()
                .join(",")
        )),
    }
}

/// Time of day, always spelled with a 12-hour clock and am/pm
fn twelve_hour(time: &TimeOfDay) -> String {
    let (hour, meridiem) = match time.hour {
        0 => (12, "am"),
        h @ 1..=11 => (h, "am"),
        12 => (12, "pm"),
        h => (h - 12, "pm"),
    };
    if time.minute == 0 {
        format!("{hour}{meridiem}")
    } else {
        format!("{hour}:{:02}{meridiem}", time.minute)
    }
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::natural::parse_phrase;

    #[test]
    fn test_simple_intervals() {
        assert_eq!(
            format_phrase(&ScheduleSpec::every(1, IntervalUnit::Days)),
            "every day"
        );
        assert_eq!(
            format_phrase(&ScheduleSpec::every(30, IntervalUnit::Minutes)),
            "every 30 minutes"
        );
    }

    #[test]
    fn test_time_always_twelve_hour() {
        let spec = parse_phrase("every day at 14:30").unwrap();
        assert_eq!(format_phrase(&spec), "every day at 2:30pm");

        let spec = parse_phrase("every day at 0:00").unwrap();
        assert_eq!(format_phrase(&spec), "every day at 12am");

        let spec = parse_phrase("every day at 12pm").unwrap();
        assert_eq!(format_phrase(&spec), "every day at 12pm");
    }

    #[test]
    fn test_monthly_single_month_shorthand() {
        let spec = parse_phrase("every month on the 15th in january").unwrap();
        assert_eq!(format_phrase(&spec), "on january 15th");
    }

    #[test]
    fn test_shorthand_keeps_time() {
        let spec = parse_phrase("every month on the 15th in january at 9am").unwrap();
        assert_eq!(format_phrase(&spec), "on january 15th at 9am");
    }

    #[test]
    fn test_day_list_collapses_to_pattern() {
        let spec = parse_phrase("every monday,tuesday,wednesday,thursday,friday").unwrap();
        assert_eq!(format_phrase(&spec), "every weekday");

        let spec = parse_phrase("every saturday,sunday").unwrap();
        assert_eq!(format_phrase(&spec), "every weekend");
    }

    #[test]
    fn test_day_list_collapses_to_range() {
        let spec = parse_phrase("every tuesday,wednesday,thursday").unwrap();
        assert_eq!(format_phrase(&spec), "every tuesday-thursday");
    }

    #[test]
    fn test_wrapping_day_list_collapses_to_range() {
        let spec = parse_phrase("every friday,saturday,sunday,monday").unwrap();
        assert_eq!(format_phrase(&spec), "every friday-monday");
    }

    #[test]
    fn test_between_normalizes_to_pattern() {
        let spec = parse_phrase("every week between monday and friday").unwrap();
        assert_eq!(format_phrase(&spec), "every weekday");
    }

    #[test]
    fn test_consecutive_month_list_collapses_to_range() {
        let spec = parse_phrase("every day in january,february,march").unwrap();
        assert_eq!(format_phrase(&spec), "every day in january-march");
    }

    #[test]
    fn test_dom_list_collapses_to_range() {
        let spec = parse_phrase("every month on the 10th,11th,12th").unwrap();
        assert_eq!(format_phrase(&spec), "every month on the 10th-12th");
    }

    #[test]
    fn test_special_day_phrases() {
        let cases = [
            "every month on the last day",
            "every month on the last weekday",
            "every month on the 3rd to last day",
            "every month on the nearest weekday to the 15th",
            "every month on the 2nd tuesday",
            "every month on the last friday",
        ];
        for case in cases {
            let spec = parse_phrase(case).unwrap();
            assert_eq!(format_phrase(&spec), case);
        }
    }

    #[test]
    fn test_range_step_phrase_round_trip() {
        let text = "every 5 minutes between 0 and 30 of each hour";
        let spec = parse_phrase(text).unwrap();
        assert_eq!(format_phrase(&spec), text);

        let text = "every 2 hours between 8 and 18 of each day";
        let spec = parse_phrase(text).unwrap();
        assert_eq!(format_phrase(&spec), text);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let phrases = [
            "every monday,tuesday,wednesday",
            "every month on the 15th in january",
            "every day in january,april at 2:30pm",
            "every weekday in january,april,july,october at 9am",
        ];
        for phrase in phrases {
            let spec = parse_phrase(phrase).unwrap();
            let once = normalize(&spec);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalize not idempotent for '{phrase}'");
            assert_eq!(format_phrase(&spec), format_phrase(&once));
        }
    }

    #[test]
    fn test_format_parse_format_is_stable() {
        let phrases = [
            "every day at 2pm",
            "every weekday in january,april,july,october at 9am",
            "every 2 weeks on monday at 9am",
            "on january 15th",
            "every month on the 1st,15th",
            "every minute at seconds 0,30",
            "every year on january 1st in 2027",
        ];
        for phrase in phrases {
            let first = format_phrase(&parse_phrase(phrase).unwrap());
            let second = format_phrase(&parse_phrase(&first).unwrap());
            assert_eq!(first, second, "unstable canonical form for '{phrase}'");
        }
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(31), "31st");
    }
}
