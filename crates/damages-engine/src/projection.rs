//! Future-window projection using a civil-year approximation.
//!
//! Years are converted at a flat 365.2425 days (the Gregorian mean year), so
//! leap days are smoothed across the window rather than placed on the calendar.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::DamagesError;
use crate::unit::SECONDS_PER_DAY;

/// Mean Gregorian year in days.
pub const CIVIL_YEAR_DAYS: f64 = 365.2425;

/// Extra time to add beyond the end of the past window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProjectionSpec {
    pub extra_days: f64,
    pub extra_years: f64,
}

impl ProjectionSpec {
    /// # Errors
    ///
    /// Returns [`DamagesError::InvalidProjection`] if either component is
    /// negative or not finite.
    pub fn new(extra_days: f64, extra_years: f64) -> Result<Self, DamagesError> {
        for (name, value) in [("days", extra_days), ("years", extra_years)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DamagesError::InvalidProjection(format!(
                    "extra {name} must be zero or more, got {value}"
                )));
            }
        }
        Ok(Self {
            extra_days,
            extra_years,
        })
    }

    pub fn extra_seconds(&self) -> f64 {
        project_seconds(self.extra_days, self.extra_years)
    }
}

/// Seconds covered by `extra_days` plus `extra_years` civil years.
///
/// ```
/// use damages_engine::projection::project_seconds;
///
/// assert_eq!(project_seconds(0.0, 1.0), 31_556_952.0);
/// ```
pub fn project_seconds(extra_days: f64, extra_years: f64) -> f64 {
    (extra_days + extra_years * CIVIL_YEAR_DAYS) * SECONDS_PER_DAY
}

/// A past window extended by a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub extra_seconds: f64,
    pub total_seconds: f64,
    pub projected_end: DateTime<Tz>,
}

/// Extend a base window ending at `base_end` by `spec`.
///
/// # Errors
///
/// Returns [`DamagesError::InvalidProjection`] if the projected end falls
/// outside the representable date range.
pub fn project(
    base_seconds: f64,
    base_end: &DateTime<Tz>,
    spec: &ProjectionSpec,
) -> Result<Projection, DamagesError> {
    let extra_seconds = spec.extra_seconds();
    let out_of_range =
        || DamagesError::InvalidProjection(format!("{extra_seconds} s past the end is out of range"));

    let delta = std::time::Duration::try_from_secs_f64(extra_seconds)
        .ok()
        .and_then(|d| TimeDelta::from_std(d).ok())
        .ok_or_else(out_of_range)?;
    let projected_end = base_end
        .checked_add_signed(delta)
        .ok_or_else(out_of_range)?;

    Ok(Projection {
        extra_seconds,
        total_seconds: base_seconds + extra_seconds,
        projected_end,
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
