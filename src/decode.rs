//! Cron expression to schedule decoder
//!
//! Splits an expression on whitespace, parses each field against its
//! domain, then infers the schedule's interval and unit from which fields
//! are constrained. Inference checks the finest-grained evidence first:
//! seconds, then minutes, hours, day-of-month steps, weekday constraints,
//! and finally a monthly default.

use crate::dialect::CronDialect;
use crate::fields::{self, FieldPattern};
use crate::spec::{
    DayConstraint, DayOfMonth, DayPattern, FieldValues, IntervalUnit, MonthSpec, ScheduleSpec,
    SpecialDay, TimeOfDay, Weekday,
};
use crate::types::{Result, ScheduleError};

/// Decode a cron expression in the given dialect into a schedule.
pub fn decode(expression: &str, dialect: CronDialect) -> Result<ScheduleSpec> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::EmptyInput);
    }

    let raw: Vec<&str> = trimmed.split_whitespace().collect();
    if !dialect.accepts_field_count(raw.len()) {
        return Err(ScheduleError::MalformedField {
            expected: dialect.expected_fields().to_string(),
            got: raw.len(),
        });
    }

    let offset = usize::from(dialect.has_seconds());
    let sec_text = dialect.has_seconds().then(|| raw[0]);
    let min_text = raw[offset];
    let hour_text = raw[offset + 1];
    let dom_text = raw[offset + 2];
    let month_text = raw[offset + 3];
    let dow_text = raw[offset + 4];
    let year_text = raw.get(offset + 5).copied();

    let sec = match sec_text {
        Some(text) => {
            let p = fields::parse_field(text, "second", fields::numeric)?;
            fields::validate(&p, "second", 0, 59, false)?;
            Some(p)
        }
        None => None,
    };

    let min = fields::parse_field(min_text, "minute", fields::numeric)?;
    fields::validate(&min, "minute", 0, 59, false)?;

    let hour = fields::parse_field(hour_text, "hour", fields::numeric)?;
    fields::validate(&hour, "hour", 0, 23, false)?;

    // Quartz day operators only exist in the extended dialect; elsewhere
    // the tokens fall through to parse_field and fail as ordinary text.
    let dom_special = if dialect.has_day_operators() {
        day_of_month_operator(dom_text)?
    } else {
        None
    };
    let dom = if dom_special.is_some() {
        FieldPattern::Wildcard
    } else {
        let text = question_as_wildcard(dom_text, dialect);
        let p = fields::parse_field(text, "day", fields::numeric)?;
        fields::validate(&p, "day", 1, 31, false)?;
        p
    };

    let month = fields::parse_field(month_text, "month", month_token)?;
    fields::validate(&month, "month", 1, 12, false)?;

    let dow_special = if dialect.has_day_operators() {
        day_of_week_operator(dow_text)?
    } else {
        None
    };
    let dow = if dow_special.is_some() {
        FieldPattern::Wildcard
    } else {
        let text = question_as_wildcard(dow_text, dialect);
        let p = fields::parse_field(text, "weekday", weekday_token)?;
        fields::validate(&p, "weekday", 0, 7, true)?;
        p
    };

    let year = match year_text {
        Some(text) => {
            let p = fields::parse_field(text, "year", fields::numeric)?;
            fields::validate(&p, "year", 1970, 2099, false)?;
            p.fixed_value()
        }
        None => None,
    };

    let special_day = dom_special.or(dow_special);
    let mut spec = infer_schedule(sec.as_ref(), &min, &hour, &dom, &dow, special_day)?;
    spec.months = month_spec(&month);
    spec.year = year;

    tracing::debug!(%dialect, interval = spec.interval, unit = ?spec.unit, "decoded expression");
    Ok(spec)
}

fn question_as_wildcard(text: &str, dialect: CronDialect) -> &str {
    if dialect.has_day_operators() && text == "?" {
        "*"
    } else {
        text
    }
}

fn day_of_month_operator(text: &str) -> Result<Option<SpecialDay>> {
    if text == "L" {
        return Ok(Some(SpecialDay::LastDay));
    }
    if text == "LW" {
        return Ok(Some(SpecialDay::LastWeekday));
    }
    if let Some(rest) = text.strip_prefix("L-") {
        let n: u32 = rest
            .parse()
            .map_err(|_| ScheduleError::grammar(format!("bad day offset '{text}'")))?;
        if !(1..=30).contains(&n) {
            return Err(ScheduleError::range("day offset", n, 1, 30));
        }
        return Ok(Some(SpecialDay::DaysBeforeEnd(n)));
    }
    if let Some(rest) = text.strip_suffix('W') {
        if let Ok(day) = rest.parse::<u32>() {
            if !(1..=31).contains(&day) {
                return Err(ScheduleError::range("day", day, 1, 31));
            }
            return Ok(Some(SpecialDay::NearestWeekday(day)));
        }
    }
    Ok(None)
}

fn day_of_week_operator(text: &str) -> Result<Option<SpecialDay>> {
    if let Some((day, nth)) = text.split_once('#') {
        let weekday = parse_weekday_number(day)?;
        let nth: u32 = nth
            .parse()
            .map_err(|_| ScheduleError::grammar(format!("bad weekday ordinal '{text}'")))?;
        if !(1..=5).contains(&nth) {
            return Err(ScheduleError::range("weekday ordinal", nth, 1, 5));
        }
        return Ok(Some(SpecialDay::NthWeekday { weekday, nth }));
    }
    if text.len() > 1 && text != "L" {
        if let Some(rest) = text.strip_suffix('L') {
            if rest.chars().all(|c| c.is_ascii_digit()) {
                let weekday = parse_weekday_number(rest)?;
                return Ok(Some(SpecialDay::LastOfWeekday(weekday)));
            }
        }
    }
    Ok(None)
}

fn parse_weekday_number(text: &str) -> Result<Weekday> {
    let n: u32 = text
        .parse()
        .map_err(|_| ScheduleError::grammar(format!("bad weekday '{text}'")))?;
    if n > 7 {
        return Err(ScheduleError::range("weekday", n, 0, 7));
    }
    Weekday::from_number(n).ok_or_else(|| ScheduleError::range("weekday", n, 0, 7))
}

fn month_token(token: &str) -> Option<u32> {
    token
        .parse::<u32>()
        .ok()
        .or_else(|| crate::spec::month_from_name(token))
}

fn weekday_token(token: &str) -> Option<u32> {
    token
        .parse::<u32>()
        .ok()
        .or_else(|| Weekday::from_name(token).map(|d| d.number()))
}

fn infer_schedule(
    sec: Option<&FieldPattern>,
    min: &FieldPattern,
    hour: &FieldPattern,
    dom: &FieldPattern,
    dow: &FieldPattern,
    special_day: Option<SpecialDay>,
) -> Result<ScheduleSpec> {
    // Seconds-grained schedule
    if let Some(sec) = sec {
        match sec {
            FieldPattern::Wildcard => {
                let mut spec = ScheduleSpec::every(1, IntervalUnit::Seconds);
                spec.special_day = special_day;
                apply_auxiliary(&mut spec, Some(min), Some(hour));
                apply_days(&mut spec, dom, dow)?;
                return Ok(spec);
            }
            FieldPattern::Step(step) => {
                let mut spec = ScheduleSpec::every(*step, IntervalUnit::Seconds);
                spec.special_day = special_day;
                apply_auxiliary(&mut spec, Some(min), Some(hour));
                apply_days(&mut spec, dom, dow)?;
                return Ok(spec);
            }
            _ => {}
        }
    }
    let second_values = sec.and_then(aux_values);

    // Minute-grained: a step or wildcard minute field dominates whatever
    // the coarser fields say.
    let minute_grain = match min {
        FieldPattern::Wildcard => Some((1, None)),
        FieldPattern::Step(step) => Some((*step, None)),
        FieldPattern::Range {
            start,
            end,
            step: Some(step),
        } => Some((
            *step,
            Some(FieldValues::Range {
                start: *start,
                end: *end,
                step: None,
            }),
        )),
        _ => None,
    };
    if let Some((interval, minute_values)) = minute_grain {
        let mut spec = ScheduleSpec::every(interval, IntervalUnit::Minutes);
        spec.minute_values = minute_values;
        spec.second_values = second_values;
        spec.special_day = special_day;
        apply_auxiliary(&mut spec, None, Some(hour));
        apply_days(&mut spec, dom, dow)?;
        return Ok(spec);
    }

    // A minute list or plain range with a free hour field still fires
    // within every hour, so the schedule is minute-grained.
    if hour.is_unconstrained() {
        if let Some(minute_values) = aux_values_ref(min) {
            let mut spec = ScheduleSpec::every(1, IntervalUnit::Minutes);
            spec.minute_values = Some(minute_values);
            spec.second_values = second_values;
            spec.special_day = special_day;
            apply_days(&mut spec, dom, dow)?;
            return Ok(spec);
        }
    }

    // Hour-grained
    let hour_grain = match hour {
        FieldPattern::Wildcard => Some((1, None)),
        FieldPattern::Step(step) => Some((*step, None)),
        FieldPattern::Range {
            start,
            end,
            step: Some(step),
        } => Some((
            *step,
            Some(FieldValues::Range {
                start: *start,
                end: *end,
                step: None,
            }),
        )),
        _ => None,
    };
    if let Some((interval, hour_values)) = hour_grain {
        let mut spec = ScheduleSpec::every(interval, IntervalUnit::Hours);
        spec.hour_values = hour_values;
        spec.second_values = second_values;
        spec.special_day = special_day;
        apply_minute_only(&mut spec, min);
        apply_days(&mut spec, dom, dow)?;
        return Ok(spec);
    }

    // Day operators force a monthly schedule.
    if let Some(special) = special_day {
        let mut spec = ScheduleSpec::every(1, IntervalUnit::Months);
        spec.special_day = Some(special);
        spec.second_values = second_values;
        apply_time(&mut spec, min, hour);
        return Ok(spec);
    }

    // Multi-day step in the day-of-month field
    if let FieldPattern::Step(step) = dom {
        let mut spec = ScheduleSpec::every(*step, IntervalUnit::Days);
        spec.second_values = second_values;
        apply_time(&mut spec, min, hour);
        apply_weekdays(&mut spec, dow)?;
        return Ok(spec);
    }

    // Weekday constraint with a free day-of-month reads as weekly.
    if !dow.is_unconstrained() && dom.is_unconstrained() {
        let mut spec = ScheduleSpec::every(1, IntervalUnit::Weeks);
        spec.days = weekday_constraint(dow)?;
        spec.second_values = second_values;
        apply_time(&mut spec, min, hour);
        return Ok(spec);
    }

    // Daily: fixed time, both day fields free
    if dom.is_unconstrained() && dow.is_unconstrained() {
        let mut spec = ScheduleSpec::every(1, IntervalUnit::Days);
        spec.second_values = second_values;
        apply_time(&mut spec, min, hour);
        return Ok(spec);
    }

    // Anything pinned to the day-of-month grid is monthly.
    let mut spec = ScheduleSpec::every(1, IntervalUnit::Months);
    spec.day_of_month = day_of_month(dom);
    spec.second_values = second_values;
    apply_time(&mut spec, min, hour);
    apply_weekdays(&mut spec, dow)?;
    Ok(spec)
}

/// Carry minute and hour over as either a fixed time or auxiliary value
/// sets, preferring a [`TimeOfDay`] when both are single values.
fn apply_time(spec: &mut ScheduleSpec, min: &FieldPattern, hour: &FieldPattern) {
    if let (Some(minute), Some(h)) = (min.fixed_value(), hour.fixed_value()) {
        spec.time = Some(TimeOfDay::new(h, minute));
        return;
    }
    apply_minute_only(spec, min);
    match hour {
        FieldPattern::Value(0) => {}
        FieldPattern::Value(v) => spec.hour_values = Some(FieldValues::List(vec![*v])),
        other => spec.hour_values = aux_values_ref(other),
    }
}

fn apply_minute_only(spec: &mut ScheduleSpec, min: &FieldPattern) {
    match min {
        FieldPattern::Value(0) => {}
        FieldPattern::Value(v) => spec.minute_values = Some(FieldValues::List(vec![*v])),
        other => spec.minute_values = aux_values_ref(other),
    }
}

/// Secondary fields of a fine-grained schedule: lists, ranges and nonzero
/// fixed values become auxiliary value sets.
fn apply_auxiliary(spec: &mut ScheduleSpec, min: Option<&FieldPattern>, hour: Option<&FieldPattern>) {
    if let Some(min) = min {
        match min {
            // A fixed minute constrains a seconds-grained schedule even
            // when it is 0, unlike the hour-grained default.
            FieldPattern::Value(v) => spec.minute_values = Some(FieldValues::List(vec![*v])),
            other => spec.minute_values = aux_values_ref(other),
        }
    }
    if let Some(hour) = hour {
        match hour {
            FieldPattern::Value(v) => spec.hour_values = Some(FieldValues::List(vec![*v])),
            other => spec.hour_values = aux_values_ref(other),
        }
    }
}

fn aux_values(pattern: &FieldPattern) -> Option<FieldValues> {
    match pattern {
        FieldPattern::List(entries) => Some(FieldValues::List(fields::expand_list(entries))),
        FieldPattern::Range { start, end, step } => Some(FieldValues::Range {
            start: *start,
            end: *end,
            step: *step,
        }),
        FieldPattern::Value(v) if *v != 0 => Some(FieldValues::List(vec![*v])),
        _ => None,
    }
}

fn aux_values_ref(pattern: &FieldPattern) -> Option<FieldValues> {
    match pattern {
        FieldPattern::List(entries) => Some(FieldValues::List(fields::expand_list(entries))),
        FieldPattern::Range { start, end, step } => Some(FieldValues::Range {
            start: *start,
            end: *end,
            step: *step,
        }),
        _ => None,
    }
}

fn apply_days(spec: &mut ScheduleSpec, dom: &FieldPattern, dow: &FieldPattern) -> Result<()> {
    spec.day_of_month = day_of_month(dom);
    apply_weekdays(spec, dow)
}

fn apply_weekdays(spec: &mut ScheduleSpec, dow: &FieldPattern) -> Result<()> {
    if !dow.is_unconstrained() {
        spec.days = weekday_constraint(dow)?;
    }
    Ok(())
}

fn day_of_month(dom: &FieldPattern) -> Option<DayOfMonth> {
    match dom {
        FieldPattern::Wildcard | FieldPattern::Step(_) => None,
        FieldPattern::Value(v) => Some(DayOfMonth::Single(*v)),
        FieldPattern::List(entries) => Some(DayOfMonth::List(fields::expand_list(entries))),
        FieldPattern::Range { start, end, step } => Some(DayOfMonth::Range {
            start: *start,
            end: *end,
            step: *step,
        }),
    }
}

/// Expand a weekday field to its value set and pick the simplest
/// constraint covering it. Cron's two spellings of Sunday collapse to 0.
fn weekday_constraint(dow: &FieldPattern) -> Result<DayConstraint> {
    let mut set: Vec<u32> = match dow {
        FieldPattern::Wildcard => return Ok(DayConstraint::Any),
        FieldPattern::Value(v) => vec![v % 7],
        FieldPattern::Step(step) => (0..7).step_by(*step as usize).collect(),
        FieldPattern::List(entries) => fields::expand_list(entries)
            .into_iter()
            .map(|v| v % 7)
            .collect(),
        FieldPattern::Range { start, end, step } => {
            let step = step.unwrap_or(1);
            let values = if start <= end {
                (*start..=*end).collect::<Vec<u32>>()
            } else {
                // Descending ranges wrap through the end of the week.
                (*start..=7).chain(0..=*end).collect()
            };
            values
                .into_iter()
                .step_by(step as usize)
                .map(|v| v % 7)
                .collect()
        }
    };
    set.sort_unstable();
    set.dedup();

    if set.len() == 7 {
        return Ok(DayConstraint::Any);
    }
    if set == [1, 2, 3, 4, 5] {
        return Ok(DayConstraint::Pattern(DayPattern::Weekdays));
    }
    if set == [0, 6] {
        return Ok(DayConstraint::Pattern(DayPattern::Weekends));
    }
    if set.len() == 1 {
        let day = Weekday::from_number(set[0])
            .ok_or_else(|| ScheduleError::range("weekday", set[0], 0, 7))?;
        return Ok(DayConstraint::Single(day));
    }
    if let Some((start, end)) = fields::circular_run(&set, 7) {
        let start = Weekday::from_number(start)
            .ok_or_else(|| ScheduleError::range("weekday", start, 0, 7))?;
        let end = Weekday::from_number(end)
            .ok_or_else(|| ScheduleError::range("weekday", end, 0, 7))?;
        return Ok(DayConstraint::Range(start, end));
    }
    let days = set
        .iter()
        .map(|&n| Weekday::from_number(n).ok_or_else(|| ScheduleError::range("weekday", n, 0, 7)))
        .collect::<Result<Vec<_>>>()?;
    Ok(DayConstraint::List(days))
}

fn month_spec(month: &FieldPattern) -> MonthSpec {
    let mut values: Vec<u32> = match month {
        FieldPattern::Wildcard => return MonthSpec::Any,
        FieldPattern::Value(v) => return MonthSpec::Single(*v),
        FieldPattern::Step(step) => (1..=12).step_by(*step as usize).collect(),
        FieldPattern::List(entries) => fields::expand_list(entries),
        FieldPattern::Range {
            start,
            end,
            step: None,
        } => return MonthSpec::Range(*start, *end),
        FieldPattern::Range {
            start,
            end,
            step: Some(step),
        } => (*start..=*end).step_by(*step as usize).collect(),
    };
    values.sort_unstable();
    values.dedup();
    if values.len() == 12 {
        return MonthSpec::Any;
    }
    if values.len() == 1 {
        return MonthSpec::Single(values[0]);
    }
    if values.windows(2).all(|w| w[1] == w[0] + 1) {
        return MonthSpec::Range(values[0], values[values.len() - 1]);
    }
    MonthSpec::List(values)
}
