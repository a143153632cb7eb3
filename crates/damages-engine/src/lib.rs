//! # damages-engine
//!
//! Deterministic time-to-money computation.
//!
//! Turns an elapsed span into a monetary amount at a per-unit rate, solves
//! the rate needed to reach a target, and ranks "clean" unit/preset
//! combinations by how close they land to a target. Every function takes
//! explicit inputs; the caller supplies the "now" anchor, so nothing here
//! reads the system clock or performs I/O beyond the export writers.
//!
//! ## Modules
//!
//! - [`span`] — Start/end boundaries → validated [`TimeSpan`]
//! - [`unit`] — Time units and seconds ↔ unit conversion
//! - [`calculator`] — Amount from duration × rate, and the inverse rate solve
//! - [`projection`] — Future window using the 365.2425-day civil year
//! - [`scenario`] — Nearest-match search over unit × preset combinations
//! - [`narrative`] — Plain-language sentence and money formatting
//! - [`config`] — Immutable engine configuration (timezone, units, presets)
//! - [`report`] — End-to-end evaluation producing a [`DamagesReport`]
//! - [`export`] — CSV rows and flat summary for document generators
//! - [`error`] — Error types

pub mod calculator;
pub mod config;
pub mod error;
pub mod export;
pub mod narrative;
pub mod projection;
pub mod report;
pub mod scenario;
pub mod span;
pub mod unit;

pub use calculator::{compute_amount, solve_rate_for_target, Rate, RatePreset};
pub use config::{coin_presets, EngineConfig, DEFAULT_PRESET, DEFAULT_TIMEZONE};
pub use error::{DamagesError, Result};
pub use export::{scenarios_csv_string, summary_fields, write_scenarios_csv, SummaryField};
pub use narrative::{format_money, make_narrative};
pub use projection::{project, project_seconds, Projection, ProjectionSpec, CIVIL_YEAR_DAYS};
pub use report::{
    Breakdown, DamagesEngine, DamagesReport, EndSpec, EvaluationRequest, RateChoice, RateSolution,
};
pub use scenario::{
    closest_scenarios, ScenarioRow, ScenarioSearch, TargetMode, TargetSpec, DEFAULT_TOP_K,
};
pub use span::{resolve_span, Boundary, TimeSpan};
pub use unit::{to_unit, TimeUnit, UnitBreakdown};
