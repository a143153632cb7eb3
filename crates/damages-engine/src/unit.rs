//! Time units and linear conversion between seconds and a unit count.
//!
//! Conversions never round. Rounding is a presentation concern handled by
//! [`crate::narrative`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DamagesError;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// A unit of elapsed time with a fixed seconds multiplier.
///
/// `Day` is 86 400 elapsed seconds. DST transitions are already accounted for
/// when the span is resolved, so a "day" here never stretches to 23 or 25 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Every unit, smallest first. This is the default scenario enumeration order.
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
    ];

    pub fn seconds_per_unit(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => SECONDS_PER_MINUTE,
            TimeUnit::Hour => SECONDS_PER_HOUR,
            TimeUnit::Day => SECONDS_PER_DAY,
        }
    }

    /// Singular label ("minute").
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
        }
    }

    /// Plural label ("minutes").
    pub fn plural(self) -> &'static str {
        match self {
            TimeUnit::Second => "seconds",
            TimeUnit::Minute => "minutes",
            TimeUnit::Hour => "hours",
            TimeUnit::Day => "days",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeUnit {
    type Err = DamagesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "second" | "seconds" | "sec" | "secs" | "s" => Ok(TimeUnit::Second),
            "minute" | "minutes" | "min" | "mins" | "m" => Ok(TimeUnit::Minute),
            "hour" | "hours" | "hr" | "hrs" | "h" => Ok(TimeUnit::Hour),
            "day" | "days" | "d" => Ok(TimeUnit::Day),
            _ => Err(DamagesError::UnknownUnit(format!("'{}'", s.trim()))),
        }
    }
}

/// Convert a duration in seconds into a count of `unit`.
pub fn to_unit(seconds: f64, unit: TimeUnit) -> f64 {
    seconds / unit.seconds_per_unit()
}

/// Convert a count of `unit` back into seconds.
pub fn from_unit(count: f64, unit: TimeUnit) -> f64 {
    count * unit.seconds_per_unit()
}

/// A duration expressed in every supported unit at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitBreakdown {
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub days: f64,
}

impl UnitBreakdown {
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds,
            minutes: to_unit(seconds, TimeUnit::Minute),
            hours: to_unit(seconds, TimeUnit::Hour),
            days: to_unit(seconds, TimeUnit::Day),
        }
    }

    /// The count for a single unit.
    pub fn get(&self, unit: TimeUnit) -> f64 {
        match unit {
            TimeUnit::Second => self.seconds,
            TimeUnit::Minute => self.minutes,
            TimeUnit::Hour => self.hours,
            TimeUnit::Day => self.days,
        }
    }

    /// Day count for presentation. Inclusive counting treats the first day as
    /// a whole day and adds exactly one; the underlying seconds are untouched.
    pub fn display_days(&self, inclusive: bool) -> f64 {
        if inclusive {
            self.days + 1.0
        } else {
            self.days
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
