//! Schedule to cron expression encoder
//!
//! Lowers a [`ScheduleSpec`] onto the field grid of a target
//! [`CronDialect`]. Constraints the dialect has no field or operator for
//! are rejected with [`ScheduleError::UnsupportedByDialect`] naming the
//! constraint, never silently dropped.

use crate::dialect::CronDialect;
use crate::fields;
use crate::spec::{
    DayConstraint, DayOfMonth, DayPattern, FieldValues, IntervalUnit, MonthSpec, ScheduleSpec,
    SpecialDay,
};
use crate::types::{Result, ScheduleError};

/// Encode a schedule as a cron expression in the given dialect.
pub fn encode(spec: &ScheduleSpec, dialect: CronDialect) -> Result<String> {
    check_dialect_support(spec, dialect)?;

    let mut fields: Vec<String> = Vec::new();
    if dialect.has_seconds() {
        fields.push(seconds_field(spec));
    }
    fields.push(minute_field(spec));
    fields.push(hour_field(spec));
    fields.push(day_of_month_field(spec, dialect));
    fields.push(month_field(spec));
    fields.push(day_of_week_field(spec, dialect));
    if dialect.has_year() {
        if let Some(year) = spec.year {
            fields.push(year.to_string());
        }
    }

    let expression = fields.join(" ");
    tracing::debug!(dialect = %dialect, %expression, "encoded schedule");
    Ok(expression)
}

fn check_dialect_support(spec: &ScheduleSpec, dialect: CronDialect) -> Result<()> {
    let interval_phrase = if spec.interval == 1 {
        format!("every {}", spec.unit.singular())
    } else {
        format!("every {} {}", spec.interval, spec.unit.plural())
    };

    match spec.unit {
        IntervalUnit::Seconds if !dialect.has_seconds() => {
            return Err(ScheduleError::UnsupportedByDialect(format!(
                "'{interval_phrase}' needs a seconds field, which the {dialect} dialect lacks"
            )));
        }
        IntervalUnit::Weeks | IntervalUnit::Months | IntervalUnit::Years if spec.interval > 1 => {
            return Err(ScheduleError::UnsupportedByDialect(format!(
                "'{interval_phrase}' has no cron equivalent; cron fields repeat within a single {}",
                match spec.unit {
                    IntervalUnit::Weeks => "week",
                    IntervalUnit::Months => "month",
                    _ => "year",
                }
            )));
        }
        _ => {}
    }

    if spec.special_day.is_some() && !dialect.has_day_operators() {
        return Err(ScheduleError::UnsupportedByDialect(format!(
            "advanced day-of-month operators need the extended dialect, not {dialect}"
        )));
    }
    if spec.second_values.is_some() && !dialect.has_seconds() {
        return Err(ScheduleError::UnsupportedByDialect(format!(
            "second values need a seconds field, which the {dialect} dialect lacks"
        )));
    }
    if spec.year.is_some() && !dialect.has_year() {
        return Err(ScheduleError::UnsupportedByDialect(format!(
            "a year constraint needs the extended dialect, not {dialect}"
        )));
    }
    Ok(())
}

fn seconds_field(spec: &ScheduleSpec) -> String {
    if let Some(values) = &spec.second_values {
        return fields::render_field_values(values);
    }
    match spec.unit {
        IntervalUnit::Seconds if spec.interval == 1 => "*".to_string(),
        IntervalUnit::Seconds => format!("*/{}", spec.interval),
        _ => "0".to_string(),
    }
}

fn minute_field(spec: &ScheduleSpec) -> String {
    if let Some(values) = &spec.minute_values {
        // A minute range paired with a minute interval is the combined
        // range+step form and renders as one field.
        if spec.unit == IntervalUnit::Minutes && spec.interval > 1 {
            if let FieldValues::Range { start, end, step: None } = values {
                return format!("{start}-{end}/{}", spec.interval);
            }
        }
        return fields::render_field_values(values);
    }
    match spec.unit {
        // A fixed time pins the minute of a seconds-grained schedule.
        IntervalUnit::Seconds => match &spec.time {
            Some(time) => time.minute.to_string(),
            None => "*".to_string(),
        },
        IntervalUnit::Minutes if spec.interval == 1 => "*".to_string(),
        IntervalUnit::Minutes => format!("*/{}", spec.interval),
        _ => match &spec.time {
            Some(time) => time.minute.to_string(),
            None => "0".to_string(),
        },
    }
}

fn hour_field(spec: &ScheduleSpec) -> String {
    if let Some(values) = &spec.hour_values {
        if spec.unit == IntervalUnit::Hours && spec.interval > 1 {
            if let FieldValues::Range { start, end, step: None } = values {
                return format!("{start}-{end}/{}", spec.interval);
            }
        }
        return fields::render_field_values(values);
    }
    match spec.unit {
        // Sub-hourly schedules still honor a fixed time's hour.
        IntervalUnit::Seconds | IntervalUnit::Minutes => match &spec.time {
            Some(time) => time.hour.to_string(),
            None => "*".to_string(),
        },
        IntervalUnit::Hours if spec.interval == 1 => "*".to_string(),
        IntervalUnit::Hours => format!("*/{}", spec.interval),
        _ => match &spec.time {
            Some(time) => time.hour.to_string(),
            None => "0".to_string(),
        },
    }
}

fn day_of_month_field(spec: &ScheduleSpec, dialect: CronDialect) -> String {
    if let Some(special) = &spec.special_day {
        match special {
            SpecialDay::LastDay => return "L".to_string(),
            SpecialDay::LastWeekday => return "LW".to_string(),
            SpecialDay::DaysBeforeEnd(n) => return format!("L-{n}"),
            SpecialDay::NearestWeekday(day) => return format!("{day}W"),
            // Weekday-side operators live in the day-of-week field.
            SpecialDay::NthWeekday { .. } | SpecialDay::LastOfWeekday(_) => return "?".to_string(),
        }
    }

    if let Some(dom) = &spec.day_of_month {
        return match dom {
            DayOfMonth::Single(day) => day.to_string(),
            DayOfMonth::List(days) => fields::compact_runs(days),
            DayOfMonth::Range { start, end, step } => match step {
                Some(step) => format!("{start}-{end}/{step}"),
                None => format!("{start}-{end}"),
            },
        };
    }

    match spec.unit {
        IntervalUnit::Days if spec.interval > 1 => format!("*/{}", spec.interval),
        // Monthly and yearly schedules default to the first of the month.
        IntervalUnit::Months | IntervalUnit::Years if spec.days.is_any() => "1".to_string(),
        _ => {
            if dialect.has_day_operators() && !spec.days.is_any() {
                "?".to_string()
            } else {
                "*".to_string()
            }
        }
    }
}

fn month_field(spec: &ScheduleSpec) -> String {
    match &spec.months {
        MonthSpec::Any => {
            if spec.unit == IntervalUnit::Years {
                "1".to_string()
            } else {
                "*".to_string()
            }
        }
        MonthSpec::Single(month) => month.to_string(),
        MonthSpec::Range(start, end) => format!("{start}-{end}"),
        MonthSpec::List(months) => {
            let mut sorted = months.clone();
            sorted.sort_unstable();
            sorted.dedup();
            fields::compact_runs(&sorted)
        }
    }
}

fn day_of_week_field(spec: &ScheduleSpec, dialect: CronDialect) -> String {
    if let Some(special) = &spec.special_day {
        match special {
            SpecialDay::NthWeekday { weekday, nth } => {
                return format!("{}#{nth}", weekday.number());
            }
            SpecialDay::LastOfWeekday(weekday) => return format!("{}L", weekday.number()),
            // Month-side operators pin the day-of-month field instead.
            _ => return "?".to_string(),
        }
    }

    if spec.days.is_any() {
        return if dialect.has_day_operators() {
            "?".to_string()
        } else {
            "*".to_string()
        };
    }

    match &spec.days {
        DayConstraint::Pattern(DayPattern::Weekends) => "0,6".to_string(),
        DayConstraint::Pattern(DayPattern::Weekdays) => "1-5".to_string(),
        days => {
            let set: Vec<u32> = days.expand().iter().map(|d| d.number()).collect();
            fields::render_weekday_set(&set)
        }
    }
}
