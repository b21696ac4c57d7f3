//! Natural language schedule parser
//!
//! Converts phrases like "every day at 2pm" or "on january 15th" into a
//! [`ScheduleSpec`]. Patterns are resolved in a fixed precedence order (see
//! [`crate::patterns`]); every sub-resolution returns independently and the
//! first failure wins, so no partial spec ever escapes.
//!
//! ## Supported forms
//!
//! - "every 5 minutes", "every hour", "every 2 weeks", "every year"
//! - "every monday", "every monday,wednesday,friday", "every tuesday-thursday"
//! - "every weekday", "every weekend", "every week between monday and friday"
//! - "every day at 2pm", "at 2:30pm", "at 14:30"
//! - "every month on the 15th", "on 15", "on the 1st,15th", "on the 10th-20th"
//! - "on january 15th", "in january", "in january-march", "in january,april"
//! - "every month on the last day", "on the last weekday",
//!   "on the 3rd to last day", "on the nearest weekday to the 15th",
//!   "on the 2nd tuesday", "on the last friday"
//! - "every 5 minutes between 0 and 30 of each hour"
//! - "at minutes 0,15,30", "at hours 9-17", "at seconds 0,30"
//! - "in 2027"

use crate::patterns;
use crate::spec::{
    DayConstraint, DayOfMonth, DayPattern, FieldValues, IntervalUnit, MonthSpec, ScheduleSpec,
    SpecialDay, TimeOfDay, Weekday, month_from_name, MAX_INTERVAL,
};
use crate::types::{Result, ScheduleError};

/// Hard cap on phrase length, applied before any pattern matching
pub const MAX_PHRASE_LEN: usize = 512;

/// Parse a schedule phrase into a [`ScheduleSpec`]
///
/// The phrase must begin with "every" or "on"; an "on"-prefixed phrase is
/// an implicit monthly schedule.
///
/// # Examples
///
/// ```
/// use a3s_schedule::{parse_phrase, IntervalUnit};
///
/// let spec = parse_phrase("every day at 2pm").unwrap();
/// assert_eq!(spec.unit, IntervalUnit::Days);
/// assert_eq!(spec.time.unwrap().hour, 14);
/// ```
pub fn parse_phrase(input: &str) -> Result<ScheduleSpec> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::EmptyInput);
    }
    if trimmed.len() > MAX_PHRASE_LEN {
        return Err(ScheduleError::grammar(format!(
            "phrase exceeds {MAX_PHRASE_LEN} characters"
        )));
    }
    let phrase = trimmed.to_lowercase();

    let first_word = phrase.split_whitespace().next().unwrap_or("");
    if first_word != "every" && first_word != "on" {
        return Err(ScheduleError::grammar(format!(
            "'{first_word}' is not a valid schedule start; phrases begin with 'every' or 'on'"
        )));
    }

    // The combined range+step phrase is fully self-contained and
    // short-circuits all other resolution.
    if let Some(caps) = patterns::range_step().captures(&phrase) {
        return resolve_range_step(&caps);
    }

    let (interval, unit, prefix_days) = resolve_interval(&phrase, first_word)?;
    let time = resolve_time(&phrase)?;
    let (days, day_of_month, special_day) = resolve_days(&phrase, unit, prefix_days)?;
    let (months, shorthand) = resolve_months(&phrase)?;
    let (second_values, minute_values, hour_values) = resolve_aux(&phrase)?;
    let year = resolve_year(&phrase)?;

    // The month+day shorthand overwrites an independently parsed
    // day-of-month.
    let day_of_month = match shorthand {
        Some((_, day)) => Some(DayOfMonth::Single(day)),
        None => day_of_month,
    };

    // Structural re-check: special day operators only make sense for
    // monthly/yearly schedules, and the day branch above must have kept the
    // two day families apart.
    debug_assert!(
        special_day.is_none() || matches!(unit, IntervalUnit::Months | IntervalUnit::Years)
    );
    debug_assert!(day_of_month.is_none() || days.is_any());

    tracing::debug!(phrase = %phrase, ?unit, interval, "parsed schedule phrase");

    let mut spec = ScheduleSpec::every(interval, unit);
    spec.time = time;
    spec.days = days;
    spec.day_of_month = day_of_month;
    spec.special_day = special_day;
    spec.months = months;
    spec.second_values = second_values;
    spec.minute_values = minute_values;
    spec.hour_values = hour_values;
    spec.year = year;
    Ok(spec)
}

/// "every 5 minutes between 0 and 30 of each hour"
fn resolve_range_step(caps: &regex::Captures<'_>) -> Result<ScheduleSpec> {
    let interval: u32 = caps[1].parse().unwrap_or(0);
    if interval == 0 || interval > MAX_INTERVAL {
        return Err(ScheduleError::range("interval", interval, 1, MAX_INTERVAL));
    }
    let unit = IntervalUnit::from_word(&caps[2])
        .ok_or_else(|| ScheduleError::grammar(format!("unknown interval unit '{}'", &caps[2])))?;
    let start: u32 = caps[3].parse().unwrap_or(u32::MAX);
    let end: u32 = caps[4].parse().unwrap_or(u32::MAX);
    let anchor = &caps[5];

    let (field, max, expected_anchor) = match unit {
        IntervalUnit::Minutes => ("minute", 59, "hour"),
        IntervalUnit::Hours => ("hour", 23, "day"),
        _ => unreachable!("range+step pattern only admits minutes and hours"),
    };
    if anchor != expected_anchor {
        return Err(ScheduleError::grammar(format!(
            "'{}' ranges repeat within each {expected_anchor}, not each {anchor}",
            unit.plural()
        )));
    }
    for value in [start, end] {
        if value > max {
            return Err(ScheduleError::range(field, value, 0, max));
        }
    }
    if start > end {
        return Err(ScheduleError::grammar(format!(
            "invalid {field} range {start}-{end}"
        )));
    }

    let mut spec = ScheduleSpec::every(interval, unit);
    let values = FieldValues::Range {
        start,
        end,
        step: None,
    };
    match unit {
        IntervalUnit::Minutes => spec.minute_values = Some(values),
        IntervalUnit::Hours => spec.hour_values = Some(values),
        _ => unreachable!("range+step pattern only admits minutes and hours"),
    }
    Ok(spec)
}

/// Resolve interval count and unit; bare day-of-week phrases establish an
/// implicit weekly interval and "on"-prefixed phrases default to monthly.
fn resolve_interval(
    phrase: &str,
    first_word: &str,
) -> Result<(u32, IntervalUnit, DayConstraint)> {
    if first_word == "on" {
        return Ok((1, IntervalUnit::Months, DayConstraint::Any));
    }

    // Bare day-of-week forms. The list and range checks come before the
    // single-day check because "every tuesday-thursday" and
    // "every monday,wednesday" both begin with a valid single day.
    if let Some(caps) = patterns::bare_day_list().captures(phrase) {
        let days = parse_day_list(&caps[1])?;
        return Ok((1, IntervalUnit::Weeks, DayConstraint::List(days)));
    }
    if let Some(caps) = patterns::bare_day_range().captures(phrase) {
        let start = weekday_token(&caps[1])?;
        let end = weekday_token(&caps[2])?;
        return Ok((1, IntervalUnit::Weeks, DayConstraint::Range(start, end)));
    }
    if let Some(caps) = patterns::bare_day_pattern().captures(phrase) {
        let pattern = day_pattern_token(&caps[1]);
        return Ok((1, IntervalUnit::Weeks, DayConstraint::Pattern(pattern)));
    }
    if let Some(caps) = patterns::bare_day().captures(phrase) {
        let day = weekday_token(&caps[1])?;
        return Ok((1, IntervalUnit::Weeks, DayConstraint::Single(day)));
    }

    if let Some(caps) = patterns::interval_count().captures(phrase) {
        let count: u32 = caps[1].parse().unwrap_or(0);
        if count == 0 || count > MAX_INTERVAL {
            return Err(ScheduleError::range("interval", count, 1, MAX_INTERVAL));
        }
        let unit = IntervalUnit::from_word(&caps[2]).ok_or_else(|| {
            ScheduleError::grammar(format!(
                "unknown interval unit '{}'; expected seconds, minutes, hours, days, weeks, months, or years",
                &caps[2]
            ))
        })?;
        return Ok((count, unit, DayConstraint::Any));
    }
    if let Some(caps) = patterns::interval_unit().captures(phrase) {
        let word = &caps[1];
        let unit = IntervalUnit::from_word(word).ok_or_else(|| {
            ScheduleError::grammar(format!(
                "unknown interval unit '{word}'; try 'every 5 minutes' or 'every monday'"
            ))
        })?;
        return Ok((1, unit, DayConstraint::Any));
    }

    Err(ScheduleError::grammar(
        "expected an interval after 'every', such as 'every day' or 'every 5 minutes'".to_string(),
    ))
}

/// Resolve an optional time of day with strict per-clock-format validation
fn resolve_time(phrase: &str) -> Result<Option<TimeOfDay>> {
    if let Some(caps) = patterns::time_12h().captures(phrase) {
        let hour: u32 = caps[1].parse().unwrap_or(u32::MAX);
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(u32::MAX))
            .unwrap_or(0);
        if hour < 1 || hour > 12 {
            return Err(ScheduleError::range("hour", hour, 1, 12));
        }
        if minute > 59 {
            return Err(ScheduleError::range("minute", minute, 0, 59));
        }
        let hour = match (&caps[3], hour) {
            ("am", 12) => 0,
            ("am", h) => h,
            ("pm", 12) => 12,
            ("pm", h) => h + 12,
            _ => unreachable!("pattern only captures am or pm"),
        };
        return Ok(Some(TimeOfDay::new(hour, minute)));
    }
    if let Some(caps) = patterns::time_24h().captures(phrase) {
        let hour: u32 = caps[1].parse().unwrap_or(u32::MAX);
        let minute: u32 = caps[2].parse().unwrap_or(u32::MAX);
        if hour > 23 {
            return Err(ScheduleError::range("hour", hour, 0, 23));
        }
        if minute > 59 {
            return Err(ScheduleError::range("minute", minute, 0, 59));
        }
        return Ok(Some(TimeOfDay::new(hour, minute)));
    }
    Ok(None)
}

/// Resolve day constraints, branching on whether the unit admits
/// day-of-month semantics (months/years) or day-of-week semantics.
fn resolve_days(
    phrase: &str,
    unit: IntervalUnit,
    prefix_days: DayConstraint,
) -> Result<(DayConstraint, Option<DayOfMonth>, Option<SpecialDay>)> {
    let monthly = matches!(unit, IntervalUnit::Months | IntervalUnit::Years);

    if monthly {
        let special = resolve_special_day(phrase)?;
        let dom = if special.is_some() {
            None
        } else {
            resolve_day_of_month(phrase)?
        };
        if let Some(found) = find_day_of_week(phrase)? {
            if dom.is_some() || special.is_some() {
                return Err(ScheduleError::Conflicting(format!(
                    "both a day-of-month and a day-of-week ('{found}') were given"
                )));
            }
            return Err(ScheduleError::grammar(format!(
                "day-of-week '{found}' is not valid for a {} schedule; use an occurrence form like 'on the 2nd {found}', or a weekly phrase like 'every {found}'",
                unit.singular()
            )));
        }
        return Ok((DayConstraint::Any, dom, special));
    }

    // Non-monthly units carry day-of-week constraints only; "on N" here is
    // a grammar error pointing at the weekly alternative.
    if let Some(caps) = patterns::dom_single().captures(phrase) {
        return Err(ScheduleError::grammar(format!(
            "'on {}' selects a day of the month and requires a monthly or yearly schedule; for a {} schedule use a weekday such as 'on monday'",
            &caps[1],
            unit.singular()
        )));
    }

    let mut days = prefix_days;
    if let Some(constraint) = resolve_day_of_week(phrase)? {
        if !days.is_any() {
            return Err(ScheduleError::Conflicting(
                "more than one day-of-week constraint was given".to_string(),
            ));
        }
        days = constraint;
    }
    Ok((days, None, None))
}

/// Advanced day-of-month operators, most specific first
fn resolve_special_day(phrase: &str) -> Result<Option<SpecialDay>> {
    if let Some(caps) = patterns::nearest_weekday().captures(phrase) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        return Ok(Some(SpecialDay::NearestWeekday(day)));
    }
    if let Some(caps) = patterns::nth_to_last_day().captures(phrase) {
        let n: u32 = caps[1].parse().unwrap_or(0);
        return Ok(Some(SpecialDay::DaysBeforeEnd(n)));
    }
    if patterns::last_weekday().is_match(phrase) {
        return Ok(Some(SpecialDay::LastWeekday));
    }
    if patterns::last_day().is_match(phrase) {
        return Ok(Some(SpecialDay::LastDay));
    }
    if let Some(caps) = patterns::nth_weekday().captures(phrase) {
        let nth: u32 = caps[1].parse().unwrap_or(0);
        if nth < 1 || nth > 5 {
            return Err(ScheduleError::range("occurrence", nth, 1, 5));
        }
        let weekday = weekday_token(&caps[2])?;
        return Ok(Some(SpecialDay::NthWeekday { weekday, nth }));
    }
    if let Some(caps) = patterns::last_of_weekday().captures(phrase) {
        let weekday = weekday_token(&caps[1])?;
        return Ok(Some(SpecialDay::LastOfWeekday(weekday)));
    }
    Ok(None)
}

/// Plain day-of-month forms. Values deliberately pass through without a
/// 1-31 domain check; the consuming scheduler refuses impossible dates.
fn resolve_day_of_month(phrase: &str) -> Result<Option<DayOfMonth>> {
    if let Some(caps) = patterns::dom_range().captures(phrase) {
        let start: u32 = caps[1].parse().unwrap_or(0);
        let end: u32 = caps[2].parse().unwrap_or(0);
        let step = match caps.get(3) {
            Some(m) => {
                let step: u32 = m.as_str().parse().unwrap_or(0);
                if step == 0 {
                    return Err(ScheduleError::grammar(
                        "day-of-month step cannot be 0".to_string(),
                    ));
                }
                Some(step)
            }
            None => None,
        };
        if start > end {
            return Err(ScheduleError::grammar(format!(
                "invalid day-of-month range {start}-{end}"
            )));
        }
        return Ok(Some(DayOfMonth::Range { start, end, step }));
    }
    if let Some(caps) = patterns::dom_list().captures(phrase) {
        let days: Vec<u32> = caps[1]
            .split(',')
            .filter_map(|part| {
                let digits: String = part
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            })
            .collect();
        if days.is_empty() {
            return Err(ScheduleError::grammar(format!(
                "invalid day-of-month list '{}'",
                &caps[1]
            )));
        }
        return Ok(Some(DayOfMonth::List(days)));
    }
    if let Some(caps) = patterns::dom_single().captures(phrase) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        return Ok(Some(DayOfMonth::Single(day)));
    }
    Ok(None)
}

/// Mid-phrase day-of-week constraint, longest form first
fn resolve_day_of_week(phrase: &str) -> Result<Option<DayConstraint>> {
    if let Some(caps) = patterns::between_days().captures(phrase) {
        let start = weekday_token(&caps[1])?;
        let end = weekday_token(&caps[2])?;
        return match (start, end) {
            (Weekday::Monday, Weekday::Friday) => {
                Ok(Some(DayConstraint::Pattern(DayPattern::Weekdays)))
            }
            (Weekday::Saturday, Weekday::Sunday) => {
                Ok(Some(DayConstraint::Pattern(DayPattern::Weekends)))
            }
            _ => Err(ScheduleError::grammar(format!(
                "'between {} and {}' only supports monday-friday and saturday-sunday; for other spans use the compact range syntax '{}-{}'",
                start.name(),
                end.name(),
                start.name(),
                end.name()
            ))),
        };
    }
    if let Some(caps) = patterns::on_day_list().captures(phrase) {
        return Ok(Some(DayConstraint::List(parse_day_list(&caps[1])?)));
    }
    if let Some(caps) = patterns::on_day_range().captures(phrase) {
        let start = weekday_token(&caps[1])?;
        let end = weekday_token(&caps[2])?;
        return Ok(Some(DayConstraint::Range(start, end)));
    }
    if let Some(caps) = patterns::on_day_pattern().captures(phrase) {
        return Ok(Some(DayConstraint::Pattern(day_pattern_token(&caps[1]))));
    }
    if let Some(caps) = patterns::on_day().captures(phrase) {
        return Ok(Some(DayConstraint::Single(weekday_token(&caps[1])?)));
    }
    Ok(None)
}

/// Report the first day-of-week token present, for error messages in the
/// monthly branch (where day-of-week forms are rejected).
fn find_day_of_week(phrase: &str) -> Result<Option<String>> {
    if let Some(caps) = patterns::on_day_list().captures(phrase) {
        return Ok(Some(caps[1].to_string()));
    }
    if let Some(caps) = patterns::on_day_range().captures(phrase) {
        return Ok(Some(format!("{}-{}", &caps[1], &caps[2])));
    }
    if let Some(caps) = patterns::on_day_pattern().captures(phrase) {
        return Ok(Some(caps[1].to_string()));
    }
    if let Some(caps) = patterns::on_day().captures(phrase) {
        return Ok(Some(caps[1].to_string()));
    }
    if let Some(caps) = patterns::between_days().captures(phrase) {
        return Ok(Some(format!("{}-{}", &caps[1], &caps[2])));
    }
    Ok(None)
}

/// Resolve month constraints. The combined month+day shorthand takes
/// priority over independently parsed month and day-of-month.
fn resolve_months(phrase: &str) -> Result<(MonthSpec, Option<(u32, u32)>)> {
    if let Some(caps) = patterns::month_day().captures(phrase) {
        let month = month_token(&caps[1])?;
        let day: u32 = caps[2].parse().unwrap_or(0);
        return Ok((MonthSpec::Single(month), Some((month, day))));
    }
    if let Some(caps) = patterns::month_list().captures(phrase) {
        let months: Result<Vec<u32>> = caps[1].split(',').map(|m| month_token(m.trim())).collect();
        return Ok((MonthSpec::List(months?), None));
    }
    if let Some(caps) = patterns::month_range().captures(phrase) {
        let start = month_token(&caps[1])?;
        let end = month_token(&caps[2])?;
        if start > end {
            return Err(ScheduleError::grammar(format!(
                "invalid month range {}-{}",
                &caps[1], &caps[2]
            )));
        }
        return Ok((MonthSpec::Range(start, end), None));
    }
    if let Some(caps) = patterns::month_single().captures(phrase) {
        return Ok((MonthSpec::Single(month_token(&caps[1])?), None));
    }
    Ok((MonthSpec::Any, None))
}

/// Auxiliary minute/hour/second lists, ranges, and steps, orthogonal to
/// the primary interval
#[allow(clippy::type_complexity)]
fn resolve_aux(
    phrase: &str,
) -> Result<(
    Option<FieldValues>,
    Option<FieldValues>,
    Option<FieldValues>,
)> {
    let mut seconds = None;
    let mut minutes = None;
    let mut hours = None;

    for caps in patterns::aux_values().captures_iter(phrase) {
        let field = &caps[1];
        let notation = &caps[2];
        let values = crate::fields::parse_numeric_values(notation).ok_or_else(|| {
            ScheduleError::grammar(format!("invalid {field} notation '{notation}'"))
        })?;
        let (slot, name, max): (&mut Option<FieldValues>, &'static str, u32) = match field {
            "seconds" => (&mut seconds, "second", 59),
            "minutes" => (&mut minutes, "minute", 59),
            "hours" => (&mut hours, "hour", 23),
            _ => unreachable!("pattern only captures seconds, minutes, or hours"),
        };
        validate_field_values(&values, name, max)?;
        if slot.is_some() {
            return Err(ScheduleError::Conflicting(format!(
                "{field} were specified more than once"
            )));
        }
        *slot = Some(values);
    }
    Ok((seconds, minutes, hours))
}

fn validate_field_values(values: &FieldValues, field: &'static str, max: u32) -> Result<()> {
    match values {
        FieldValues::List(list) => {
            for &v in list {
                if v > max {
                    return Err(ScheduleError::range(field, v, 0, max));
                }
            }
        }
        FieldValues::Range { start, end, step } => {
            for &v in [start, end] {
                if v > max {
                    return Err(ScheduleError::range(field, v, 0, max));
                }
            }
            if start > end {
                return Err(ScheduleError::grammar(format!(
                    "invalid {field} range {start}-{end}"
                )));
            }
            if step == &Some(0) {
                return Err(ScheduleError::grammar(format!(
                    "{field} step cannot be 0"
                )));
            }
        }
    }
    Ok(())
}

/// Optional explicit year ("in 2027")
fn resolve_year(phrase: &str) -> Result<Option<u32>> {
    match patterns::year().captures(phrase) {
        Some(caps) => {
            let year: u32 = caps[1].parse().unwrap_or(0);
            if !(1970..=2099).contains(&year) {
                return Err(ScheduleError::range("year", year, 1970, 2099));
            }
            Ok(Some(year))
        }
        None => Ok(None),
    }
}

fn parse_day_list(text: &str) -> Result<Vec<Weekday>> {
    text.split(',').map(|d| weekday_token(d.trim())).collect()
}

fn weekday_token(token: &str) -> Result<Weekday> {
    Weekday::from_name(token)
        .ok_or_else(|| ScheduleError::grammar(format!("'{token}' is not a day of the week")))
}

fn day_pattern_token(token: &str) -> DayPattern {
    if token.starts_with("weekend") {
        DayPattern::Weekends
    } else {
        DayPattern::Weekdays
    }
}

fn month_token(token: &str) -> Result<u32> {
    month_from_name(token)
        .ok_or_else(|| ScheduleError::grammar(format!("'{token}' is not a month name")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_prefix() {
        assert_eq!(parse_phrase("").unwrap_err(), ScheduleError::EmptyInput);
        assert_eq!(parse_phrase("   ").unwrap_err(), ScheduleError::EmptyInput);
        assert!(matches!(
            parse_phrase("always at 2pm").unwrap_err(),
            ScheduleError::GrammarMismatch(_)
        ));
    }

    #[test]
    fn test_length_cap() {
        let long = format!("every day {}", "x".repeat(600));
        assert!(matches!(
            parse_phrase(&long).unwrap_err(),
            ScheduleError::GrammarMismatch(_)
        ));
    }

    #[test]
    fn test_simple_intervals() {
        let spec = parse_phrase("every minute").unwrap();
        assert_eq!((spec.interval, spec.unit), (1, IntervalUnit::Minutes));

        let spec = parse_phrase("every 30 minutes").unwrap();
        assert_eq!((spec.interval, spec.unit), (30, IntervalUnit::Minutes));

        let spec = parse_phrase("every 2 weeks").unwrap();
        assert_eq!((spec.interval, spec.unit), (2, IntervalUnit::Weeks));

        let spec = parse_phrase("every year").unwrap();
        assert_eq!((spec.interval, spec.unit), (1, IntervalUnit::Years));
    }

    #[test]
    fn test_interval_bounds() {
        assert!(matches!(
            parse_phrase("every 1001 minutes").unwrap_err(),
            ScheduleError::OutOfRange { field: "interval", .. }
        ));
        assert!(matches!(
            parse_phrase("every 0 minutes").unwrap_err(),
            ScheduleError::OutOfRange { field: "interval", .. }
        ));
    }

    #[test]
    fn test_unknown_unit_named_in_error() {
        let err = parse_phrase("every 5 fortnights").unwrap_err();
        assert!(err.to_string().contains("fortnights"));
    }

    #[test]
    fn test_bare_day_is_weekly() {
        let spec = parse_phrase("every monday").unwrap();
        assert_eq!((spec.interval, spec.unit), (1, IntervalUnit::Weeks));
        assert_eq!(spec.days, DayConstraint::Single(Weekday::Monday));
    }

    #[test]
    fn test_day_list_and_range() {
        let spec = parse_phrase("every monday,wednesday,friday").unwrap();
        assert_eq!(
            spec.days,
            DayConstraint::List(vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday])
        );

        let spec = parse_phrase("every tuesday-thursday").unwrap();
        assert_eq!(
            spec.days,
            DayConstraint::Range(Weekday::Tuesday, Weekday::Thursday)
        );

        // Wrapping across the week boundary
        let spec = parse_phrase("every friday-monday").unwrap();
        assert_eq!(
            spec.days,
            DayConstraint::Range(Weekday::Friday, Weekday::Monday)
        );
    }

    #[test]
    fn test_day_patterns() {
        let spec = parse_phrase("every weekday at 9am").unwrap();
        assert_eq!(spec.days, DayConstraint::Pattern(DayPattern::Weekdays));
        assert_eq!(spec.time, Some(TimeOfDay::new(9, 0)));

        let spec = parse_phrase("every weekend").unwrap();
        assert_eq!(spec.days, DayConstraint::Pattern(DayPattern::Weekends));
    }

    #[test]
    fn test_between_days_canonical_only() {
        let spec = parse_phrase("every week between monday and friday").unwrap();
        assert_eq!(spec.days, DayConstraint::Pattern(DayPattern::Weekdays));

        let spec = parse_phrase("every week between saturday and sunday").unwrap();
        assert_eq!(spec.days, DayConstraint::Pattern(DayPattern::Weekends));

        let err = parse_phrase("every week between tuesday and thursday").unwrap_err();
        assert!(err.to_string().contains("tuesday-thursday"));
    }

    #[test]
    fn test_weeks_with_on_day() {
        let spec = parse_phrase("every 2 weeks on monday at 9am").unwrap();
        assert_eq!((spec.interval, spec.unit), (2, IntervalUnit::Weeks));
        assert_eq!(spec.days, DayConstraint::Single(Weekday::Monday));
    }

    #[test]
    fn test_time_12h() {
        assert_eq!(
            parse_phrase("every day at 2pm").unwrap().time,
            Some(TimeOfDay::new(14, 0))
        );
        assert_eq!(
            parse_phrase("every day at 2:30pm").unwrap().time,
            Some(TimeOfDay::new(14, 30))
        );
        assert_eq!(
            parse_phrase("every day at 12am").unwrap().time,
            Some(TimeOfDay::new(0, 0))
        );
        assert_eq!(
            parse_phrase("every day at 12pm").unwrap().time,
            Some(TimeOfDay::new(12, 0))
        );
    }

    #[test]
    fn test_time_0am_rejected() {
        assert!(matches!(
            parse_phrase("every day at 0am").unwrap_err(),
            ScheduleError::OutOfRange { field: "hour", .. }
        ));
        assert!(matches!(
            parse_phrase("every day at 13pm").unwrap_err(),
            ScheduleError::OutOfRange { field: "hour", .. }
        ));
    }

    #[test]
    fn test_time_24h() {
        assert_eq!(
            parse_phrase("every day at 14:30").unwrap().time,
            Some(TimeOfDay::new(14, 30))
        );
        assert!(matches!(
            parse_phrase("every day at 25:00").unwrap_err(),
            ScheduleError::OutOfRange { field: "hour", .. }
        ));
        assert!(matches!(
            parse_phrase("every day at 10:75").unwrap_err(),
            ScheduleError::OutOfRange { field: "minute", .. }
        ));
    }

    #[test]
    fn test_monthly_day_of_month() {
        let spec = parse_phrase("every month on the 15th").unwrap();
        assert_eq!(spec.day_of_month, Some(DayOfMonth::Single(15)));

        let spec = parse_phrase("every month on the 1st,15th").unwrap();
        assert_eq!(spec.day_of_month, Some(DayOfMonth::List(vec![1, 15])));

        let spec = parse_phrase("every month on the 10th-20th/2").unwrap();
        assert_eq!(
            spec.day_of_month,
            Some(DayOfMonth::Range {
                start: 10,
                end: 20,
                step: Some(2)
            })
        );
    }

    #[test]
    fn test_day_of_month_is_permissive() {
        // Day 32 passes through; the consuming scheduler refuses it later.
        let spec = parse_phrase("every month on 32").unwrap();
        assert_eq!(spec.day_of_month, Some(DayOfMonth::Single(32)));
    }

    #[test]
    fn test_on_number_outside_monthly_is_error() {
        let err = parse_phrase("every week on 15").unwrap_err();
        assert!(err.to_string().contains("monthly or yearly"));
        assert!(err.to_string().contains("on monday"));
    }

    #[test]
    fn test_on_prefix_is_implicit_monthly() {
        let spec = parse_phrase("on 15").unwrap();
        assert_eq!((spec.interval, spec.unit), (1, IntervalUnit::Months));
        assert_eq!(spec.day_of_month, Some(DayOfMonth::Single(15)));
    }

    #[test]
    fn test_month_day_shorthand() {
        let spec = parse_phrase("on january 15th").unwrap();
        assert_eq!((spec.interval, spec.unit), (1, IntervalUnit::Months));
        assert_eq!(spec.months, MonthSpec::Single(1));
        assert_eq!(spec.day_of_month, Some(DayOfMonth::Single(15)));
    }

    #[test]
    fn test_shorthand_overwrites_day_of_month() {
        let spec = parse_phrase("every year on the 3rd on december 25th").unwrap();
        assert_eq!(spec.months, MonthSpec::Single(12));
        assert_eq!(spec.day_of_month, Some(DayOfMonth::Single(25)));
    }

    #[test]
    fn test_month_constraints() {
        let spec = parse_phrase("every weekday in january,april,july,october at 9am").unwrap();
        assert_eq!(spec.months, MonthSpec::List(vec![1, 4, 7, 10]));

        let spec = parse_phrase("every day in january-march").unwrap();
        assert_eq!(spec.months, MonthSpec::Range(1, 3));

        let spec = parse_phrase("every day in january").unwrap();
        assert_eq!(spec.months, MonthSpec::Single(1));
    }

    #[test]
    fn test_special_days() {
        let spec = parse_phrase("every month on the last day").unwrap();
        assert_eq!(spec.special_day, Some(SpecialDay::LastDay));

        let spec = parse_phrase("every month on the last weekday").unwrap();
        assert_eq!(spec.special_day, Some(SpecialDay::LastWeekday));

        let spec = parse_phrase("every month on the 3rd to last day").unwrap();
        assert_eq!(spec.special_day, Some(SpecialDay::DaysBeforeEnd(3)));

        let spec = parse_phrase("every month on the nearest weekday to the 15th").unwrap();
        assert_eq!(spec.special_day, Some(SpecialDay::NearestWeekday(15)));

        let spec = parse_phrase("every month on the 2nd tuesday").unwrap();
        assert_eq!(
            spec.special_day,
            Some(SpecialDay::NthWeekday {
                weekday: Weekday::Tuesday,
                nth: 2
            })
        );

        let spec = parse_phrase("every month on the last friday").unwrap();
        assert_eq!(
            spec.special_day,
            Some(SpecialDay::LastOfWeekday(Weekday::Friday))
        );
    }

    #[test]
    fn test_weekday_in_monthly_rejected() {
        let err = parse_phrase("every month on monday").unwrap_err();
        assert!(err.to_string().contains("monday"));
    }

    #[test]
    fn test_range_step_phrase() {
        let spec = parse_phrase("every 5 minutes between 0 and 30 of each hour").unwrap();
        assert_eq!((spec.interval, spec.unit), (5, IntervalUnit::Minutes));
        assert_eq!(
            spec.minute_values,
            Some(FieldValues::Range {
                start: 0,
                end: 30,
                step: None
            })
        );

        let spec = parse_phrase("every 2 hours between 8 and 18 of each day").unwrap();
        assert_eq!((spec.interval, spec.unit), (2, IntervalUnit::Hours));
        assert_eq!(
            spec.hour_values,
            Some(FieldValues::Range {
                start: 8,
                end: 18,
                step: None
            })
        );
    }

    #[test]
    fn test_range_step_validation() {
        assert!(matches!(
            parse_phrase("every 5 minutes between 0 and 75 of each hour").unwrap_err(),
            ScheduleError::OutOfRange { field: "minute", .. }
        ));
        let err =
            parse_phrase("every 5 minutes between 0 and 30 of each day").unwrap_err();
        assert!(err.to_string().contains("hour"));
    }

    #[test]
    fn test_aux_fields() {
        let spec = parse_phrase("every day at minutes 0,15,30").unwrap();
        assert_eq!(spec.minute_values, Some(FieldValues::List(vec![0, 15, 30])));

        let spec = parse_phrase("every day at hours 9-17").unwrap();
        assert_eq!(
            spec.hour_values,
            Some(FieldValues::Range {
                start: 9,
                end: 17,
                step: None
            })
        );

        let spec = parse_phrase("every minute at seconds 0,30").unwrap();
        assert_eq!(spec.second_values, Some(FieldValues::List(vec![0, 30])));
    }

    #[test]
    fn test_aux_domain_checked() {
        assert!(matches!(
            parse_phrase("every day at minutes 0,75").unwrap_err(),
            ScheduleError::OutOfRange { field: "minute", .. }
        ));
    }

    #[test]
    fn test_year() {
        let spec = parse_phrase("every year on january 1st in 2027").unwrap();
        assert_eq!(spec.year, Some(2027));
        assert!(matches!(
            parse_phrase("every year in 1900").unwrap_err(),
            ScheduleError::OutOfRange { field: "year", .. }
        ));
    }

    #[test]
    fn test_case_insensitive() {
        let spec = parse_phrase("Every Day At 2PM").unwrap();
        assert_eq!(spec.time, Some(TimeOfDay::new(14, 0)));
    }
}
