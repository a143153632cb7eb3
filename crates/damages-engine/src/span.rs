//! Resolve user-supplied boundaries into an elapsed-time span.
//!
//! Boundaries are interpreted in one reference timezone. A date-only start is
//! pinned to the first instant of that calendar day (local midnight, or the
//! end of the gap where a DST change skips midnight); a date-only end is pinned to the last instant of
//! that calendar day, so a span always covers its end day in full. A boundary
//! with a time of day is an exact instant. Each boundary picks its mode on its
//! own, so a date-only start may be paired with a timed end.
//!
//! Nothing here reads the system clock. "Use the current moment" is expressed
//! as [`Boundary::Instant`] with an anchor supplied by the caller.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::DamagesError;
use crate::unit::UnitBreakdown;

/// One side of a span as the caller supplied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// A calendar date with no time of day.
    Date(NaiveDate),
    /// A wall-clock date and time in the reference timezone.
    DateTime(NaiveDateTime),
    /// An absolute instant, typically "now".
    Instant(DateTime<Utc>),
}

impl Boundary {
    /// Build a boundary from a date and an optional time of day.
    pub fn from_parts(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        match time {
            Some(t) => Boundary::DateTime(date.and_time(t)),
            None => Boundary::Date(date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

/// A validated interval with `end >= start`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSpan {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeSpan {
    /// Build a span from two instants.
    ///
    /// # Errors
    ///
    /// Returns [`DamagesError::InvalidRange`] if `end` precedes `start`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, DamagesError> {
        if end < start {
            return Err(DamagesError::InvalidRange(format!(
                "end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Exact elapsed seconds, including the sub-second part.
    pub fn duration_seconds(&self) -> f64 {
        self.end
            .signed_duration_since(self.start)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn breakdown(&self) -> UnitBreakdown {
        UnitBreakdown::from_seconds(self.duration_seconds())
    }
}

/// Resolve a start and an end boundary in `tz` into a [`TimeSpan`].
///
/// # Errors
///
/// Returns [`DamagesError::InvalidRange`] if the resolved end precedes the
/// resolved start, or [`DamagesError::InvalidDatetime`] if a wall-clock time
/// does not exist in `tz` (it falls in a DST gap).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use damages_engine::span::{resolve_span, Boundary};
///
/// let day = NaiveDate::from_ymd_opt(2022, 7, 28).unwrap();
/// let span = resolve_span(Boundary::Date(day), Boundary::Date(day), chrono_tz::UTC).unwrap();
/// assert!((span.duration_seconds() - 86_399.999_999).abs() < 1e-6);
/// ```
pub fn resolve_span(start: Boundary, end: Boundary, tz: Tz) -> Result<TimeSpan, DamagesError> {
    let start_dt = resolve_boundary(start, Side::Start, tz)?;
    let end_dt = resolve_boundary(end, Side::End, tz)?;
    let span = TimeSpan::new(start_dt, end_dt)?;
    tracing::debug!(
        start = %span.start.to_rfc3339(),
        end = %span.end.to_rfc3339(),
        seconds = span.duration_seconds(),
        "resolved span"
    );
    Ok(span)
}

fn resolve_boundary(boundary: Boundary, side: Side, tz: Tz) -> Result<DateTime<Tz>, DamagesError> {
    match boundary {
        Boundary::Date(date) => match side {
            Side::Start => start_of_day(date, tz),
            Side::End => localize(date.and_time(end_of_day()), tz),
        },
        Boundary::DateTime(naive) => localize(naive, tz),
        Boundary::Instant(instant) => Ok(instant.with_timezone(&tz)),
    }
}

/// First instant of `date` in `tz`. Where a DST change skips local midnight,
/// the day starts at the first wall-clock minute after the gap.
fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>, DamagesError> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|minute| midnight + TimeDelta::minutes(minute))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .ok_or_else(|| {
            DamagesError::InvalidDatetime(format!("{date} has no local time in {}", tz.name()))
        })
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Last representable instant of a calendar day at microsecond resolution.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}

/// Attach `tz` to a wall-clock time. Ambiguous times (DST fall-back) take the
/// earlier instant; times inside a DST gap are rejected.
fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, DamagesError> {
    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        DamagesError::InvalidDatetime(format!("{naive} does not exist in {}", tz.name()))
    })
}

// ── Input parsing ───────────────────────────────────────────────────────────

/// Parse an IANA timezone name.
pub fn parse_timezone(s: &str) -> Result<Tz, DamagesError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| DamagesError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, DamagesError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| DamagesError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse a time of day: `"14:00"`, `"14:30:15"`, `"2pm"`, `"2:30 pm"`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, DamagesError> {
    parse_time_string(s)
        .ok_or_else(|| DamagesError::InvalidDatetime(format!("'{}': not a time of day", s)))
}

fn parse_time_string(s: &str) -> Option<NaiveTime> {
    let s = s.trim().to_lowercase();

    if let Ok(t) = NaiveTime::parse_from_str(&s, "%H:%M:%S") {
        return Some(t);
    }
    if let Ok(t) = NaiveTime::parse_from_str(&s, "%H:%M") {
        return Some(t);
    }

    let compact = s.replace(' ', "");
    let (time_part, is_pm) = if let Some(rest) = compact.strip_suffix("pm") {
        (rest, true)
    } else if let Some(rest) = compact.strip_suffix("am") {
        (rest, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = time_part.split(':').collect();
    let hour: u32 = parts.first()?.parse().ok()?;
    let minute: u32 = match parts.get(1) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let second: u32 = match parts.get(2) {
        Some(sec) => sec.parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour24 = match (hour, is_pm) {
        (12, true) => 12,
        (12, false) => 0,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveTime::from_hms_opt(hour24, minute, second)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn la() -> Tz {
        parse_timezone("America/Los_Angeles").unwrap()
    }

    // ── date-only mode ──────────────────────────────────────────────────

    #[test]
    fn test_same_day_date_only_is_full_day_minus_tick() {
        let day = date(2022, 7, 28);
        let span = resolve_span(Boundary::Date(day), Boundary::Date(day), la()).unwrap();
        assert!((span.duration_seconds() - 86_399.999_999).abs() < 1e-6);
        assert!(span.duration_seconds() > 0.0);
    }

    #[test]
    fn test_date_only_end_pinned_to_end_of_day() {
        let span = resolve_span(
            Boundary::Date(date(2022, 7, 28)),
            Boundary::Date(date(2022, 7, 30)),
            la(),
        )
        .unwrap();
        assert!(span.start().to_rfc3339().starts_with("2022-07-28T00:00:00"));
        assert!(span.end().to_rfc3339().starts_with("2022-07-30T23:59:59.999999"));
    }

    #[test]
    fn test_date_only_end_before_start_is_invalid_range() {
        let result = resolve_span(
            Boundary::Date(date(2022, 7, 28)),
            Boundary::Date(date(2022, 7, 27)),
            la(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, DamagesError::InvalidRange(_)), "got: {err}");
    }

    // ── timestamp mode ──────────────────────────────────────────────────

    #[test]
    fn test_timestamp_span_is_exact() {
        let d = date(2026, 3, 16);
        let span = resolve_span(
            Boundary::DateTime(d.and_time(time(9, 0))),
            Boundary::DateTime(d.and_time(time(17, 0))),
            chrono_tz::UTC,
        )
        .unwrap();
        assert_eq!(span.duration_seconds(), 28_800.0);
    }

    #[test]
    fn test_timestamp_end_before_start_is_invalid_range() {
        let d = date(2026, 3, 16);
        let result = resolve_span(
            Boundary::DateTime(d.and_time(time(17, 0))),
            Boundary::DateTime(d.and_time(time(9, 0))),
            chrono_tz::UTC,
        );
        assert!(matches!(result, Err(DamagesError::InvalidRange(_))));
    }

    #[test]
    fn test_zero_length_span_is_valid() {
        let at = date(2026, 3, 16).and_time(time(9, 0));
        let span =
            resolve_span(Boundary::DateTime(at), Boundary::DateTime(at), chrono_tz::UTC).unwrap();
        assert_eq!(span.duration_seconds(), 0.0);
    }

    #[test]
    fn test_span_across_spring_forward_counts_elapsed_time() {
        // March 8 2026: US spring forward, the local day is 23 hours long.
        let span = resolve_span(
            Boundary::DateTime(date(2026, 3, 8).and_time(time(0, 0))),
            Boundary::DateTime(date(2026, 3, 9).and_time(time(0, 0))),
            la(),
        )
        .unwrap();
        assert_eq!(span.duration_seconds(), 23.0 * 3600.0);
    }

    #[test]
    fn test_nonexistent_local_time_returns_error() {
        // 02:30 on March 8 2026 is skipped in Los Angeles.
        let result = resolve_span(
            Boundary::DateTime(date(2026, 3, 8).and_time(time(2, 30))),
            Boundary::Date(date(2026, 3, 9)),
            la(),
        );
        assert!(matches!(result, Err(DamagesError::InvalidDatetime(_))));
    }

    #[test]
    fn test_date_only_start_when_midnight_is_skipped() {
        // Santiago springs forward at local midnight on 2022-09-11; the day
        // begins at 01:00 -03.
        let santiago = parse_timezone("America/Santiago").unwrap();
        let day = date(2022, 9, 11);
        let span = resolve_span(Boundary::Date(day), Boundary::Date(day), santiago).unwrap();
        assert_eq!(span.start().to_rfc3339(), "2022-09-11T01:00:00-03:00");
        assert!((span.duration_seconds() - 82_799.999_999).abs() < 1e-6);
    }

    #[test]
    fn test_explicit_midnight_in_gap_is_still_rejected() {
        let santiago = parse_timezone("America/Santiago").unwrap();
        let result = resolve_span(
            Boundary::DateTime(date(2022, 9, 11).and_time(time(0, 0))),
            Boundary::Date(date(2022, 9, 11)),
            santiago,
        );
        assert!(matches!(result, Err(DamagesError::InvalidDatetime(_))));
    }

    #[test]
    fn test_ambiguous_local_time_takes_earlier_instant() {
        // 01:30 on November 1 2026 occurs twice in Los Angeles; PDT comes first.
        let start = resolve_span(
            Boundary::DateTime(date(2026, 11, 1).and_time(time(1, 30))),
            Boundary::Date(date(2026, 11, 1)),
            la(),
        )
        .unwrap();
        assert!(start.start().to_rfc3339().ends_with("-07:00"));
    }

    #[test]
    fn test_instant_end_uses_anchor() {
        let anchor = Utc.with_ymd_and_hms(2022, 7, 29, 7, 0, 0).unwrap();
        let span = resolve_span(
            Boundary::Date(date(2022, 7, 28)),
            Boundary::Instant(anchor),
            la(),
        )
        .unwrap();
        // Midnight PDT is 07:00 UTC, so exactly one day has elapsed.
        assert_eq!(span.duration_seconds(), 86_400.0);
    }

    #[test]
    fn test_from_parts_picks_mode() {
        let d = date(2022, 7, 28);
        assert_eq!(Boundary::from_parts(d, None), Boundary::Date(d));
        assert_eq!(
            Boundary::from_parts(d, Some(time(8, 15))),
            Boundary::DateTime(d.and_time(time(8, 15)))
        );
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_timezone_invalid() {
        let err = parse_timezone("Invalid/Zone").unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2022-07-28").unwrap(), date(2022, 7, 28));
        assert!(parse_date("07/28/2022").is_err());
    }

    #[test]
    fn test_parse_time_of_day_formats() {
        assert_eq!(parse_time_of_day("14:00").unwrap(), time(14, 0));
        assert_eq!(
            parse_time_of_day("14:30:15").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 15).unwrap()
        );
        assert_eq!(parse_time_of_day("2pm").unwrap(), time(14, 0));
        assert_eq!(parse_time_of_day("2:30 PM").unwrap(), time(14, 30));
        assert_eq!(parse_time_of_day("12am").unwrap(), time(0, 0));
        assert_eq!(parse_time_of_day("12pm").unwrap(), time(12, 0));
    }

    #[test]
    fn test_parse_time_of_day_rejects_garbage() {
        assert!(parse_time_of_day("noonish").is_err());
        assert!(parse_time_of_day("13pm").is_err());
        assert!(parse_time_of_day("25:00").is_err());
    }
}
