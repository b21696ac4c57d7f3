//! Shared cron field machinery
//!
//! The field tokenizer is the single point of truth for *shape* (wildcard,
//! step, range, list, value); domain legality is checked separately so
//! out-of-domain numbers still tokenize. Rendering compacts consecutive
//! runs and, for weekday sets, allows a single wraparound descent.

use crate::spec::FieldValues;
use crate::types::{Result, ScheduleError};

/// The shape of one cron field
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldPattern {
    /// `*`
    Wildcard,
    /// `*/N`
    Step(u32),
    /// `a-b` or `a-b/s`
    Range {
        start: u32,
        end: u32,
        step: Option<u32>,
    },
    /// `a,b,c`, possibly with embedded sub-ranges, kept unexpanded until
    /// the bounds have been validated
    List(Vec<ListEntry>),
    /// A single fixed value
    Value(u32),
}

/// One element of a list field
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListEntry {
    Value(u32),
    Range { start: u32, end: u32, step: u32 },
}

impl FieldPattern {
    /// True for `*` (and the extended dialect's `?`, mapped before parsing)
    pub(crate) fn is_unconstrained(&self) -> bool {
        matches!(self, FieldPattern::Wildcard)
    }

    /// The single fixed value, if that is what this field holds
    pub(crate) fn fixed_value(&self) -> Option<u32> {
        match self {
            FieldPattern::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parse one whitespace-free cron field into its shape.
///
/// `resolve` maps a bare token to a number, which lets the month field
/// accept case-insensitive short names while every other field stays
/// numeric. Out-of-domain numbers are accepted here on purpose.
pub(crate) fn parse_field(
    text: &str,
    field: &'static str,
    resolve: impl Fn(&str) -> Option<u32>,
) -> Result<FieldPattern> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ScheduleError::grammar(format!("empty {field} field")));
    }
    if text == "*" {
        return Ok(FieldPattern::Wildcard);
    }
    if let Some(step_str) = text.strip_prefix("*/") {
        let step = parse_token(step_str, field, &resolve)?;
        if step == 0 {
            return Err(ScheduleError::grammar(format!(
                "step value cannot be 0 in {field} field"
            )));
        }
        return Ok(FieldPattern::Step(step));
    }

    if text.contains(',') {
        let mut entries = Vec::new();
        for part in text.split(',') {
            match split_range(part, field, &resolve)? {
                (start, Some(end), step) => entries.push(ListEntry::Range {
                    start,
                    end,
                    step: step.unwrap_or(1).max(1),
                }),
                (value, None, _) => entries.push(ListEntry::Value(value)),
            }
        }
        return Ok(FieldPattern::List(entries));
    }

    match split_range(text, field, &resolve)? {
        (start, Some(end), step) => Ok(FieldPattern::Range { start, end, step }),
        (value, None, _) => Ok(FieldPattern::Value(value)),
    }
}

/// Split `a-b/s`, `a-b`, or `a` into its numeric parts (shape only)
fn split_range(
    part: &str,
    field: &'static str,
    resolve: &impl Fn(&str) -> Option<u32>,
) -> Result<(u32, Option<u32>, Option<u32>)> {
    let part = part.trim();
    let (range_part, step) = match part.split_once('/') {
        Some((r, s)) => (r, Some(parse_token(s, field, resolve)?)),
        None => (part, None),
    };
    match range_part.split_once('-') {
        Some((a, b)) => Ok((
            parse_token(a, field, resolve)?,
            Some(parse_token(b, field, resolve)?),
            step,
        )),
        None => Ok((parse_token(range_part, field, resolve)?, None, step)),
    }
}

fn parse_token(
    token: &str,
    field: &'static str,
    resolve: &impl Fn(&str) -> Option<u32>,
) -> Result<u32> {
    let token = token.trim();
    resolve(token).ok_or_else(|| {
        ScheduleError::grammar(format!("invalid value '{token}' in {field} field"))
    })
}

/// Numeric token resolver used by every field except month
pub(crate) fn numeric(token: &str) -> Option<u32> {
    token.parse().ok()
}

/// Domain validation, separate from shape parsing.
///
/// `allow_wrap` permits descending ranges (weekday wraparound).
pub(crate) fn validate(
    pattern: &FieldPattern,
    field: &'static str,
    min: u32,
    max: u32,
    allow_wrap: bool,
) -> Result<()> {
    let check = |value: u32| -> Result<()> {
        if value < min || value > max {
            Err(ScheduleError::range(field, value, min, max))
        } else {
            Ok(())
        }
    };
    match pattern {
        FieldPattern::Wildcard => Ok(()),
        FieldPattern::Step(step) => check(*step),
        FieldPattern::Range { start, end, step } => {
            check(*start)?;
            check(*end)?;
            if let Some(step) = step {
                if *step == 0 {
                    return Err(ScheduleError::grammar(format!(
                        "step value cannot be 0 in {field} field"
                    )));
                }
            }
            if start > end && !allow_wrap {
                return Err(ScheduleError::grammar(format!(
                    "invalid range {start}-{end} in {field} field"
                )));
            }
            Ok(())
        }
        FieldPattern::List(entries) => {
            if entries.is_empty() {
                return Err(ScheduleError::grammar(format!("empty {field} list")));
            }
            for entry in entries {
                match entry {
                    ListEntry::Value(v) => check(*v)?,
                    ListEntry::Range { start, end, .. } => {
                        check(*start)?;
                        check(*end)?;
                        if start > end {
                            return Err(ScheduleError::grammar(format!(
                                "invalid range {start}-{end} in {field} field"
                            )));
                        }
                    }
                }
            }
            Ok(())
        }
        FieldPattern::Value(v) => check(*v),
    }
}

/// Expand a list field into its ascending, deduplicated value set.
///
/// Must only be called after `validate` has accepted the entries, which
/// keeps every sub-range inside a small known domain.
pub(crate) fn expand_list(entries: &[ListEntry]) -> Vec<u32> {
    let mut values = Vec::new();
    for entry in entries {
        match entry {
            ListEntry::Value(v) => values.push(*v),
            ListEntry::Range { start, end, step } => {
                let mut v = *start;
                while v <= *end {
                    values.push(v);
                    v = match v.checked_add(*step) {
                        Some(next) => next,
                        None => break,
                    };
                }
            }
        }
    }
    values.sort_unstable();
    values.dedup();
    values
}

/// Render a sorted set of values, compacting each run of consecutive
/// integers into a single `a-b` token.
pub(crate) fn compact_runs(values: &[u32]) -> String {
    let mut sorted: Vec<u32> = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let start = sorted[i];
        let mut end = start;
        while i + 1 < sorted.len() && sorted[i + 1] == end + 1 {
            end = sorted[i + 1];
            i += 1;
        }
        if end > start {
            parts.push(format!("{start}-{end}"));
        } else {
            parts.push(start.to_string());
        }
        i += 1;
    }
    parts.join(",")
}

/// Detect whether a set of values forms one consecutive run on a circle of
/// size `modulus`, allowing at most one wraparound descent.
///
/// Returns the `(start, end)` of the run. `{5, 6, 0, 1}` with modulus 7 is
/// the run `(5, 1)`, Friday through Monday.
pub(crate) fn circular_run(values: &[u32], modulus: u32) -> Option<(u32, u32)> {
    let mut sorted: Vec<u32> = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < 2 || sorted.len() as u32 >= modulus {
        return None;
    }
    if sorted.iter().any(|&v| v >= modulus) {
        return None;
    }

    // Count gaps on the circle; exactly one gap means one contiguous arc.
    let mut gap_after: Option<usize> = None;
    let mut gaps = 0;
    for i in 0..sorted.len() {
        let cur = sorted[i];
        let next = sorted[(i + 1) % sorted.len()];
        if (cur + 1) % modulus != next % modulus {
            gaps += 1;
            gap_after = Some(i);
        }
    }
    match (gaps, gap_after) {
        (1, Some(i)) => {
            let start = sorted[(i + 1) % sorted.len()];
            let end = sorted[i];
            Some((start, end))
        }
        _ => None,
    }
}

/// Render a weekday set, preferring a single (possibly wrapped) range over a
/// list when both describe the same set.
pub(crate) fn render_weekday_set(values: &[u32]) -> String {
    if values.len() == 1 {
        return values[0].to_string();
    }
    if let Some((start, end)) = circular_run(values, 7) {
        return format!("{start}-{end}");
    }
    compact_runs(values)
}

/// Render auxiliary field values in cron notation
pub(crate) fn render_field_values(values: &FieldValues) -> String {
    match values {
        FieldValues::List(list) => compact_runs(list),
        FieldValues::Range {
            start,
            end,
            step: Some(step),
        } => format!("{start}-{end}/{step}"),
        FieldValues::Range {
            start,
            end,
            step: None,
        } => format!("{start}-{end}"),
    }
}

/// Parse the phrase-side numeric notation ("0,15,30", "5-50/15", "9-17")
/// shared by the minute, hour, second, and day-of-month auxiliary fields.
pub(crate) fn parse_numeric_values(text: &str) -> Option<FieldValues> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.contains(',') {
        let values: Option<Vec<u32>> = text.split(',').map(|p| p.trim().parse().ok()).collect();
        return values.map(FieldValues::List);
    }
    if let Some((range, step)) = text.split_once('/') {
        let (start, end) = range.split_once('-')?;
        return Some(FieldValues::Range {
            start: start.trim().parse().ok()?,
            end: end.trim().parse().ok()?,
            step: Some(step.trim().parse().ok()?),
        });
    }
    if let Some((start, end)) = text.split_once('-') {
        return Some(FieldValues::Range {
            start: start.trim().parse().ok()?,
            end: end.trim().parse().ok()?,
            step: None,
        });
    }
    text.parse().ok().map(|v| FieldValues::List(vec![v]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_shapes() {
        assert_eq!(
            parse_field("*", "minute", numeric).unwrap(),
            FieldPattern::Wildcard
        );
        assert_eq!(
            parse_field("*/15", "minute", numeric).unwrap(),
            FieldPattern::Step(15)
        );
        assert_eq!(
            parse_field("0-30/5", "minute", numeric).unwrap(),
            FieldPattern::Range {
                start: 0,
                end: 30,
                step: Some(5)
            }
        );
        assert_eq!(
            parse_field("1,3-5", "day", numeric).unwrap(),
            FieldPattern::List(vec![
                ListEntry::Value(1),
                ListEntry::Range {
                    start: 3,
                    end: 5,
                    step: 1
                }
            ])
        );
        assert_eq!(
            parse_field("42", "minute", numeric).unwrap(),
            FieldPattern::Value(42)
        );
    }

    #[test]
    fn test_shape_parse_is_permissive() {
        // Out-of-domain values still tokenize; legality is a separate step.
        let pattern = parse_field("75", "minute", numeric).unwrap();
        assert_eq!(pattern, FieldPattern::Value(75));
        let err = validate(&pattern, "minute", 0, 59, false).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OutOfRange {
                field: "minute",
                value: 75,
                min: 0,
                max: 59
            }
        );
    }

    #[test]
    fn test_list_subranges_checked_before_expansion() {
        // Sub-range bounds are validated before any expansion, so absurd
        // endpoints fail cleanly instead of allocating or overflowing.
        let pattern = parse_field("0,4294967295-4294967295", "minute", numeric).unwrap();
        assert_eq!(
            validate(&pattern, "minute", 0, 59, false).unwrap_err(),
            ScheduleError::range("minute", 4_294_967_295, 0, 59)
        );
        let pattern = parse_field("0,1-4000000000", "minute", numeric).unwrap();
        assert_eq!(
            validate(&pattern, "minute", 0, 59, false).unwrap_err(),
            ScheduleError::range("minute", 4_000_000_000, 0, 59)
        );
    }

    #[test]
    fn test_expand_list() {
        let entries = vec![
            ListEntry::Value(1),
            ListEntry::Range {
                start: 3,
                end: 9,
                step: 3,
            },
            ListEntry::Value(3),
        ];
        assert_eq!(expand_list(&entries), vec![1, 3, 6, 9]);
    }

    #[test]
    fn test_validate_rejects_descending_list_subrange() {
        let pattern = parse_field("1,5-2", "minute", numeric).unwrap();
        assert!(validate(&pattern, "minute", 0, 59, false).is_err());
    }

    #[test]
    fn test_validate_rejects_descending_unless_wrapped() {
        let pattern = FieldPattern::Range {
            start: 5,
            end: 1,
            step: None,
        };
        assert!(validate(&pattern, "weekday", 0, 6, true).is_ok());
        assert!(validate(&pattern, "minute", 0, 59, false).is_err());
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(parse_field("*/0", "minute", numeric).is_err());
    }

    #[test]
    fn test_compact_runs() {
        assert_eq!(compact_runs(&[1, 2, 3, 4, 5]), "1-5");
        assert_eq!(compact_runs(&[1, 3, 5]), "1,3,5");
        assert_eq!(compact_runs(&[0, 1, 5, 9, 10, 11]), "0-1,5,9-11");
        assert_eq!(compact_runs(&[4]), "4");
    }

    #[test]
    fn test_circular_run_wraps_once() {
        // Friday..Monday
        assert_eq!(circular_run(&[0, 1, 5, 6], 7), Some((5, 1)));
        // Tuesday..Thursday, no wrap needed
        assert_eq!(circular_run(&[2, 3, 4], 7), Some((2, 4)));
        // Two separate arcs
        assert_eq!(circular_run(&[0, 2, 4], 7), None);
        // The full circle is not a run
        assert_eq!(circular_run(&[0, 1, 2, 3, 4, 5, 6], 7), None);
    }

    #[test]
    fn test_render_weekday_set() {
        assert_eq!(render_weekday_set(&[1, 2, 3, 4, 5]), "1-5");
        assert_eq!(render_weekday_set(&[0, 1, 5, 6]), "5-1");
        assert_eq!(render_weekday_set(&[1, 3, 5]), "1,3,5");
        assert_eq!(render_weekday_set(&[6]), "6");
    }

    #[test]
    fn test_parse_numeric_values() {
        assert_eq!(
            parse_numeric_values("0,15,30"),
            Some(FieldValues::List(vec![0, 15, 30]))
        );
        assert_eq!(
            parse_numeric_values("5-50/15"),
            Some(FieldValues::Range {
                start: 5,
                end: 50,
                step: Some(15)
            })
        );
        assert_eq!(
            parse_numeric_values("9-17"),
            Some(FieldValues::Range {
                start: 9,
                end: 17,
                step: None
            })
        );
        assert_eq!(parse_numeric_values("x"), None);
    }
}
