//! Timezone conversion for schedule times
//!
//! A schedule's time of day is a civil wall-clock time in its own zone
//! (UTC when unset). Conversion picks a concrete date with a [`Clock`],
//! maps the wall-clock time through both zones on that date, and writes
//! the result back as a plain time of day. The conversion is a snapshot:
//! the offset in effect on the clock's date is captured, it does not
//! track future DST transitions.

use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::spec::{ScheduleSpec, TimeOfDay};
use crate::types::{Result, ScheduleError};

/// Source of the current instant, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn zone(name: &str) -> Result<Tz> {
    Tz::from_str(name).map_err(|_| ScheduleError::UnknownTimezone(name.to_string()))
}

/// Re-express a schedule's time of day in another timezone.
///
/// A schedule without a time just gets the new zone recorded. The source
/// zone is the schedule's own `timezone`, defaulting to UTC.
pub fn convert_to_zone(
    spec: &ScheduleSpec,
    target: &str,
    clock: &dyn Clock,
) -> Result<ScheduleSpec> {
    let target_tz = zone(target)?;
    let mut out = spec.clone();

    let Some(time) = &spec.time else {
        out.timezone = Some(target.to_string());
        return Ok(out);
    };

    let source_tz = match &spec.timezone {
        Some(name) => zone(name)?,
        None => Tz::UTC,
    };

    let today = clock.now().with_timezone(&source_tz).date_naive();
    let naive = today
        .and_hms_opt(time.hour, time.minute, 0)
        .ok_or_else(|| ScheduleError::range("hour", time.hour, 0, 23))?;

    let source_instant = match source_tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        // Fall-back repeats the hour; take the first occurrence.
        LocalResult::Ambiguous(first, _) => first,
        // Spring-forward skips the hour; slide into the next one.
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            source_tz
                .from_local_datetime(&shifted)
                .earliest()
                .ok_or_else(|| {
                    ScheduleError::grammar(format!(
                        "time {}:{:02} does not exist in {source_tz}",
                        time.hour, time.minute
                    ))
                })?
        }
    };

    let converted = source_instant.with_timezone(&target_tz);
    out.time = Some(TimeOfDay::new(converted.hour(), converted.minute()));
    out.timezone = Some(target.to_string());

    tracing::debug!(
        from = %source_tz,
        to = %target_tz,
        date = %today,
        "converted schedule time"
    );
    Ok(out)
}
