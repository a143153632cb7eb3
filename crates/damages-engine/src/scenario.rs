//! Nearest-match search over (time unit × rate preset) combinations.
//!
//! Every combination is evaluated eagerly; the grid is a few dozen rows at
//! most. Rows are ranked by absolute distance from the target with a stable
//! sort, so ties keep enumeration order (unit-major, preset-minor).

use serde::{Deserialize, Serialize};

use crate::calculator::{compute_amount, RatePreset};
use crate::error::DamagesError;
use crate::unit::TimeUnit;

/// Number of rows in the default top view.
pub const DEFAULT_TOP_K: usize = 20;

/// What to do with a target amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Rank preset combinations by distance from the target.
    #[default]
    SearchCombos,
    /// Solve the exact per-unit rate for the chosen unit.
    SolveRate,
}

/// A caller-specified dollar figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetSpec {
    pub amount: f64,
    pub mode: TargetMode,
}

impl TargetSpec {
    /// # Errors
    ///
    /// Returns [`DamagesError::InvalidTarget`] if `amount` is negative or not finite.
    pub fn new(amount: f64, mode: TargetMode) -> Result<Self, DamagesError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DamagesError::InvalidTarget(format!(
                "target must be zero or more, got {amount}"
            )));
        }
        Ok(Self { amount, mode })
    }
}

/// One evaluated combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRow {
    /// Position in enumeration order (unit-major, preset-minor).
    pub index: usize,
    pub unit: TimeUnit,
    pub rate_label: String,
    pub rate_per_unit: f64,
    pub amount: f64,
    pub absolute_delta: f64,
    /// Absent when the target is zero.
    pub percent_delta: Option<f64>,
}

/// The ranked result of a scenario search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSearch {
    pub target_amount: f64,
    pub top_k: usize,
    ranked: Vec<ScenarioRow>,
}

impl ScenarioSearch {
    /// The closest `top_k` rows.
    pub fn top(&self) -> &[ScenarioRow] {
        &self.ranked[..self.top_k.min(self.ranked.len())]
    }

    /// Every row, closest first.
    pub fn ranked(&self) -> &[ScenarioRow] {
        &self.ranked
    }

    /// Every row in enumeration order.
    pub fn in_enumeration_order(&self) -> Vec<ScenarioRow> {
        let mut rows = self.ranked.clone();
        rows.sort_by_key(|row| row.index);
        rows
    }

    /// The single closest row, if any.
    pub fn best(&self) -> Option<&ScenarioRow> {
        self.ranked.first()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Evaluate every unit/preset combination against `target_amount`.
///
/// An empty `units` or `presets` slice yields an empty search, not an error.
pub fn closest_scenarios(
    seconds: f64,
    target_amount: f64,
    units: &[TimeUnit],
    presets: &[RatePreset],
    top_k: usize,
) -> ScenarioSearch {
    let mut ranked: Vec<ScenarioRow> = units
        .iter()
        .flat_map(|&unit| presets.iter().map(move |preset| (unit, preset)))
        .enumerate()
        .map(|(index, (unit, preset))| {
            let amount = compute_amount(seconds, unit, preset.amount_per_unit);
            let absolute_delta = (amount - target_amount).abs();
            let percent_delta = if target_amount != 0.0 {
                Some(absolute_delta / target_amount * 100.0)
            } else {
                None
            };
            ScenarioRow {
                index,
                unit,
                rate_label: preset.label.clone(),
                rate_per_unit: preset.amount_per_unit,
                amount,
                absolute_delta,
                percent_delta,
            }
        })
        .collect();

    // `sort_by` is stable; equal deltas stay in enumeration order.
    ranked.sort_by(|a, b| a.absolute_delta.total_cmp(&b.absolute_delta));

    tracing::debug!(
        rows = ranked.len(),
        top_k,
        target_amount,
        best_delta = ranked.first().map(|r| r.absolute_delta),
        "scenario search complete"
    );

    ScenarioSearch {
        target_amount,
        top_k,
        ranked,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
