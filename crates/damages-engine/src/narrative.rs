//! Plain-language rendering of computed values.
//!
//! Nothing here computes a duration or an amount; callers pass in the numbers
//! produced by [`crate::calculator`] and [`crate::span`].

use chrono::{DateTime, TimeZone};

use crate::span::TimeSpan;
use crate::unit::{to_unit, TimeUnit, UnitBreakdown};

/// `strftime` pattern used for every instant shown to a reader.
pub const DATETIME_FORMAT: &str = "%b %d, %Y, %I:%M %p %Z";

/// Format a number with `,` thousands separators and a fixed number of decimals.
///
/// ```
/// use damages_engine::narrative::format_grouped;
///
/// assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_grouped(999.5, 0), "1,000");
/// ```
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = digits.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a dollar amount: `$1,234.50`.
pub fn format_money(amount: f64) -> String {
    let grouped = format_grouped(amount, 2);
    match grouped.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${grouped}"),
    }
}

/// Format an instant for display, e.g. `Jul 28, 2022, 12:00 AM PDT`.
pub fn format_datetime<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format(DATETIME_FORMAT).to_string()
}

/// A unit count rounded for display, paired with the matching unit label.
///
/// The label is singular only when the displayed count is exactly `1`.
pub fn format_unit_count(count: f64, unit: TimeUnit) -> String {
    let shown = format_grouped(count, 0);
    let label = if shown == "1" {
        unit.label()
    } else {
        unit.plural()
    };
    format!("{shown} {label}")
}

/// Human-readable decomposition of whole seconds, e.g. "2 days, 3 hours, 15 minutes".
pub fn format_human_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let days = total / 86_400;
    let remainder = total % 86_400;
    let hours = remainder / 3_600;
    let remainder = remainder % 3_600;
    let minutes = remainder / 60;
    let secs = remainder % 60;

    let mut parts = Vec::new();
    for (n, unit) in [
        (days, TimeUnit::Day),
        (hours, TimeUnit::Hour),
        (minutes, TimeUnit::Minute),
        (secs, TimeUnit::Second),
    ] {
        if n > 0 {
            parts.push(format!("{} {}", n, if n == 1 { unit.label() } else { unit.plural() }));
        }
    }
    if parts.is_empty() {
        return format!("0 {}", TimeUnit::Second.plural());
    }
    parts.join(", ")
}

/// One-paragraph description of the past window and what it is worth.
///
/// With `inclusive_days` set, a closing sentence restates the window as a day
/// count that treats the first day as whole. The amount is never adjusted.
pub fn make_narrative(
    span: &TimeSpan,
    seconds: f64,
    unit: TimeUnit,
    rate_per_unit: f64,
    amount: f64,
    inclusive_days: bool,
) -> String {
    let count = to_unit(seconds, unit);
    let mut text = format!(
        "From {} to {}, that's approximately {} of continuous pain. \
         At {} per {}, the past pain-and-suffering equals {}.",
        format_datetime(span.start()),
        format_datetime(span.end()),
        format_unit_count(count, unit),
        format_money(rate_per_unit),
        unit.label(),
        format_money(amount),
    );
    if inclusive_days {
        let days = UnitBreakdown::from_seconds(seconds).display_days(true);
        text.push_str(&format!(
            " Counting the day of loss as a full day, the window spans {} days.",
            format_grouped(days, 2)
        ));
    }
    text
}

// ── Tests ───────────────────────────────────────────────────────────────────
