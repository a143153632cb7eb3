//! The end-to-end evaluation: request in, report out.
//!
//! [`DamagesEngine`] owns an immutable [`EngineConfig`] and runs one request
//! at a time to completion: resolve the span, convert, calculate, optionally
//! project, search or solve against a target, then narrate. It keeps no state
//! between calls, so one engine can serve any number of requests.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::calculator::{compute_amount, solve_rate_for_target, Rate};
use crate::config::EngineConfig;
use crate::error::DamagesError;
use crate::narrative::make_narrative;
use crate::projection::{project, ProjectionSpec};
use crate::scenario::{closest_scenarios, ScenarioRow, ScenarioSearch, TargetMode, TargetSpec};
use crate::span::{resolve_span, Boundary, TimeSpan};
use crate::unit::{TimeUnit, UnitBreakdown};

/// Where the past window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSpec {
    /// A calendar date, with an optional time of day.
    At {
        date: NaiveDate,
        time: Option<NaiveTime>,
    },
    /// The `now` anchor passed to [`DamagesEngine::evaluate`].
    Now,
}

/// Which rate to apply.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RateChoice {
    /// The configuration's default preset.
    #[default]
    ConfigDefault,
    /// A preset from the engine configuration, by label.
    Preset(String),
    /// An arbitrary positive amount per unit.
    Custom(f64),
}

/// Everything a caller supplies for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end: EndSpec,
    /// Overrides the configured reference timezone.
    pub timezone: Option<Tz>,
    pub unit: TimeUnit,
    pub rate: RateChoice,
    pub target: Option<TargetSpec>,
    pub projection: Option<ProjectionSpec>,
    /// Display-only: add one to shown day counts.
    pub inclusive_days: bool,
    /// Overrides the configured top-K for scenario search.
    pub top_k: Option<usize>,
}

impl EvaluationRequest {
    /// A request with per-minute counting at the default preset.
    pub fn new(start_date: NaiveDate, end: EndSpec) -> Self {
        Self {
            start_date,
            start_time: None,
            end,
            timezone: None,
            unit: TimeUnit::Minute,
            rate: RateChoice::default(),
            target: None,
            projection: None,
            inclusive_days: false,
            top_k: None,
        }
    }
}

/// Outcome of solving for a rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RateSolution {
    Solved { rate: f64 },
    Unsolvable { reason: String },
}

/// Unit counts for the past window and, with a projection, the total window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub base: UnitBreakdown,
    pub total: Option<UnitBreakdown>,
    /// Base day count as displayed (inclusive counting applied).
    pub display_days: f64,
    pub display_total_days: Option<f64>,
}

/// The output contract consumed by rendering and export.
#[derive(Debug, Clone, Serialize)]
pub struct DamagesReport {
    pub timezone: String,
    /// Start of the past window (RFC 3339 with offset).
    pub start: String,
    /// End of the past window (RFC 3339 with offset).
    pub end: String,
    pub unit: TimeUnit,
    pub rate_label: String,
    pub rate_per_unit: f64,
    pub inclusive_days: bool,
    pub base_duration_seconds: f64,
    pub amount_now: f64,
    pub projection: Option<ProjectionSpec>,
    pub total_duration_seconds: Option<f64>,
    pub projected_end: Option<String>,
    pub amount_total: Option<f64>,
    pub breakdown: Breakdown,
    pub target: Option<TargetSpec>,
    pub top_scenarios: Option<Vec<ScenarioRow>>,
    pub solved_rate: Option<RateSolution>,
    pub narrative: String,
    pub generated_at: String,

    #[serde(skip)]
    span: TimeSpan,
    #[serde(skip)]
    projected_end_at: Option<DateTime<Tz>>,
    #[serde(skip)]
    generated_at_local: DateTime<Tz>,
    #[serde(skip)]
    scenario_search: Option<ScenarioSearch>,
}

impl DamagesReport {
    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn projected_end_at(&self) -> Option<&DateTime<Tz>> {
        self.projected_end_at.as_ref()
    }

    pub fn generated_at_local(&self) -> &DateTime<Tz> {
        &self.generated_at_local
    }

    /// The full ranked scenario set, when a combination search ran.
    pub fn scenario_search(&self) -> Option<&ScenarioSearch> {
        self.scenario_search.as_ref()
    }
}

/// Stateless evaluator bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct DamagesEngine {
    config: EngineConfig,
}

impl DamagesEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a [`RateChoice`] against the configured presets.
    pub fn resolve_rate(&self, choice: &RateChoice) -> Result<Rate, DamagesError> {
        match choice {
            RateChoice::ConfigDefault => {
                Ok(Rate::Preset(self.config.default_rate_preset()?.clone()))
            }
            RateChoice::Preset(label) => Ok(Rate::Preset(self.config.preset(label)?.clone())),
            RateChoice::Custom(amount) => Rate::custom(*amount),
        }
    }

    /// Run one request to completion.
    ///
    /// `now` anchors [`EndSpec::Now`] and the report's generation timestamp.
    ///
    /// # Errors
    ///
    /// Validation errors stop the pipeline before any amount is computed:
    /// [`DamagesError::InvalidRange`] when the end precedes the start,
    /// [`DamagesError::UnknownPreset`] / [`DamagesError::InvalidRate`] for a bad
    /// rate, [`DamagesError::InvalidDatetime`] for a wall-clock time that does
    /// not exist. A zero-length span with a rate solve is not an error; it is
    /// reported as [`RateSolution::Unsolvable`].
    pub fn evaluate(
        &self,
        request: &EvaluationRequest,
        now: DateTime<Utc>,
    ) -> Result<DamagesReport, DamagesError> {
        let tz = request.timezone.unwrap_or(self.config.timezone);
        let rate = self.resolve_rate(&request.rate)?;
        let top_k = match request.top_k {
            Some(0) => {
                return Err(DamagesError::Config("top_k must be at least 1".to_string()));
            }
            Some(k) => k,
            None => self.config.top_k,
        };

        let start = Boundary::from_parts(request.start_date, request.start_time);
        let end = match request.end {
            EndSpec::At { date, time } => Boundary::from_parts(date, time),
            EndSpec::Now => Boundary::Instant(now),
        };
        let span = resolve_span(start, end, tz)?;

        let unit = request.unit;
        let rate_per_unit = rate.amount_per_unit();
        let base_seconds = span.duration_seconds();
        let amount_now = compute_amount(base_seconds, unit, rate_per_unit);

        let projection = request
            .projection
            .as_ref()
            .map(|spec| project(base_seconds, span.end(), spec))
            .transpose()?;
        let total_seconds = projection.as_ref().map(|p| p.total_seconds);
        let amount_total = total_seconds.map(|s| compute_amount(s, unit, rate_per_unit));

        let base = UnitBreakdown::from_seconds(base_seconds);
        let total = total_seconds.map(UnitBreakdown::from_seconds);
        let breakdown = Breakdown {
            display_days: base.display_days(request.inclusive_days),
            display_total_days: total.map(|t| t.display_days(request.inclusive_days)),
            base,
            total,
        };

        let mut scenario_search = None;
        let mut solved_rate = None;
        if let Some(target) = &request.target {
            match target.mode {
                TargetMode::SearchCombos => {
                    scenario_search = Some(closest_scenarios(
                        base_seconds,
                        target.amount,
                        &self.config.units,
                        &self.config.presets,
                        top_k,
                    ));
                }
                TargetMode::SolveRate => {
                    solved_rate = Some(match solve_rate_for_target(base_seconds, unit, target.amount) {
                        Ok(rate) => RateSolution::Solved { rate },
                        Err(err @ DamagesError::DegenerateSolve(_)) => RateSolution::Unsolvable {
                            reason: err.to_string(),
                        },
                        Err(err) => return Err(err),
                    });
                }
            }
        }

        let narrative = make_narrative(
            &span,
            base_seconds,
            unit,
            rate_per_unit,
            amount_now,
            request.inclusive_days,
        );
        let generated_at_local = now.with_timezone(&tz);

        tracing::debug!(
            timezone = tz.name(),
            %unit,
            rate = rate_per_unit,
            base_seconds,
            amount_now,
            "evaluation complete"
        );

        Ok(DamagesReport {
            timezone: tz.name().to_string(),
            start: span.start().to_rfc3339(),
            end: span.end().to_rfc3339(),
            unit,
            rate_label: rate.label().to_string(),
            rate_per_unit,
            inclusive_days: request.inclusive_days,
            base_duration_seconds: base_seconds,
            amount_now,
            projection: request.projection,
            total_duration_seconds: total_seconds,
            projected_end: projection.as_ref().map(|p| p.projected_end.to_rfc3339()),
            amount_total,
            breakdown,
            target: request.target,
            top_scenarios: scenario_search.as_ref().map(|s| s.top().to_vec()),
            solved_rate,
            narrative,
            generated_at: generated_at_local.to_rfc3339(),
            span,
            projected_end_at: projection.map(|p| p.projected_end),
            generated_at_local,
            scenario_search,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
