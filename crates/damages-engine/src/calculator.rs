//! Duration × rate arithmetic and its inverse.

use serde::{Deserialize, Serialize};

use crate::error::DamagesError;
use crate::unit::{to_unit, TimeUnit};

/// A named monetary amount charged per unit of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePreset {
    pub label: String,
    #[serde(rename = "amount")]
    pub amount_per_unit: f64,
}

impl RatePreset {
    pub fn new(label: impl Into<String>, amount_per_unit: f64) -> Self {
        Self {
            label: label.into(),
            amount_per_unit,
        }
    }
}

/// The rate applied to a computation: a named preset or a caller-chosen amount.
#[derive(Debug, Clone, PartialEq)]
pub enum Rate {
    Preset(RatePreset),
    Custom(f64),
}

impl Rate {
    /// Build a custom rate.
    ///
    /// # Errors
    ///
    /// Returns [`DamagesError::InvalidRate`] unless `amount` is finite and positive.
    pub fn custom(amount: f64) -> Result<Self, DamagesError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DamagesError::InvalidRate(format!(
                "custom rate must be a positive amount, got {amount}"
            )));
        }
        Ok(Rate::Custom(amount))
    }

    pub fn amount_per_unit(&self) -> f64 {
        match self {
            Rate::Preset(p) => p.amount_per_unit,
            Rate::Custom(amount) => *amount,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Rate::Preset(p) => &p.label,
            Rate::Custom(_) => "Custom",
        }
    }
}

/// Monetary amount for `seconds` of elapsed time at `rate_per_unit` per `unit`.
///
/// Expects a non-negative duration; spans are validated before they get here.
///
/// ```
/// use damages_engine::calculator::compute_amount;
/// use damages_engine::unit::TimeUnit;
///
/// assert_eq!(compute_amount(3600.0, TimeUnit::Hour, 0.25), 0.25);
/// assert_eq!(compute_amount(7200.0, TimeUnit::Minute, 1.0), 120.0);
/// ```
pub fn compute_amount(seconds: f64, unit: TimeUnit, rate_per_unit: f64) -> f64 {
    to_unit(seconds, unit) * rate_per_unit
}

/// Per-unit rate that turns `seconds` of elapsed time into `target_amount`.
///
/// # Errors
///
/// Returns [`DamagesError::DegenerateSolve`] when the span holds zero units,
/// instead of producing a non-finite rate.
pub fn solve_rate_for_target(
    seconds: f64,
    unit: TimeUnit,
    target_amount: f64,
) -> Result<f64, DamagesError> {
    let units = to_unit(seconds, unit);
    if units == 0.0 {
        tracing::warn!(%unit, target_amount, "rate solve requested for a zero-length span");
        return Err(DamagesError::DegenerateSolve(format!(
            "zero elapsed {}",
            unit.plural()
        )));
    }
    Ok(target_amount / units)
}

// ── Tests ───────────────────────────────────────────────────────────────────
