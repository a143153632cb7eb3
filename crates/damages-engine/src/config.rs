//! Engine configuration: reference timezone, unit grid and rate presets.
//!
//! An [`EngineConfig`] is an immutable value handed to
//! [`crate::report::DamagesEngine::new`]. It can be built in code or loaded
//! from TOML:
//!
//! ```toml
//! timezone = "America/Los_Angeles"
//! top_k = 20
//! units = ["second", "minute", "hour", "day"]
//! default_preset = "Penny"
//!
//! [[presets]]
//! label = "Penny"
//! amount = 0.01
//! ```
//!
//! Keys left out of the file keep their default values. When the file
//! replaces the preset table without naming `default_preset`, the default is
//! "Dollar" if the new table has it, otherwise the first preset.

use std::collections::HashSet;
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::calculator::RatePreset;
use crate::error::DamagesError;
use crate::scenario::DEFAULT_TOP_K;
use crate::span::parse_timezone;
use crate::unit::TimeUnit;

/// Zone used when neither the configuration nor the request names one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// Preset applied when a request does not name a rate.
pub const DEFAULT_PRESET: &str = "Dollar";

/// The coin presets: Penny, Nickel, Dime, Quarter, Dollar.
pub fn coin_presets() -> Vec<RatePreset> {
    vec![
        RatePreset::new("Penny", 0.01),
        RatePreset::new("Nickel", 0.05),
        RatePreset::new("Dime", 0.10),
        RatePreset::new("Quarter", 0.25),
        RatePreset::new("Dollar", 1.00),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub timezone: Tz,
    /// Units enumerated by scenario search, in order.
    pub units: Vec<TimeUnit>,
    /// Named presets, in order. Also the lookup table for preset names.
    pub presets: Vec<RatePreset>,
    /// Label of the preset used when a request names no rate.
    pub default_preset: String,
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            units: TimeUnit::ALL.to_vec(),
            presets: coin_presets(),
            default_preset: DEFAULT_PRESET.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// On-disk shape of the configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    timezone: Option<String>,
    top_k: Option<usize>,
    units: Option<Vec<TimeUnit>>,
    presets: Option<Vec<RatePreset>>,
    default_preset: Option<String>,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DamagesError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DamagesError::Config`] for malformed TOML or values that fail
    /// [`EngineConfig::validate`], and [`DamagesError::InvalidTimezone`] for an
    /// unknown zone name.
    pub fn from_toml_str(content: &str) -> Result<Self, DamagesError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| DamagesError::Config(format!("TOML parsing error: {e}")))?;

        let defaults = Self::default();
        let presets = file.presets.unwrap_or(defaults.presets);
        let default_preset = match file.default_preset {
            Some(label) => label,
            None => fallback_preset(&presets),
        };
        let config = Self {
            timezone: match file.timezone {
                Some(name) => parse_timezone(&name)?,
                None => defaults.timezone,
            },
            units: file.units.unwrap_or(defaults.units),
            presets,
            default_preset,
            top_k: file.top_k.unwrap_or(defaults.top_k),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check preset amounts, preset label uniqueness, the default preset and
    /// `top_k`.
    pub fn validate(&self) -> Result<(), DamagesError> {
        if self.top_k == 0 {
            return Err(DamagesError::Config("top_k must be at least 1".to_string()));
        }
        let mut seen = HashSet::new();
        for preset in &self.presets {
            if preset.label.trim().is_empty() {
                return Err(DamagesError::Config("preset label is empty".to_string()));
            }
            if !preset.amount_per_unit.is_finite() || preset.amount_per_unit <= 0.0 {
                return Err(DamagesError::Config(format!(
                    "preset '{}' must have a positive amount, got {}",
                    preset.label, preset.amount_per_unit
                )));
            }
            if !seen.insert(preset.label.to_lowercase()) {
                return Err(DamagesError::Config(format!(
                    "duplicate preset '{}'",
                    preset.label
                )));
            }
        }
        if !self.presets.is_empty() && self.preset(&self.default_preset).is_err() {
            return Err(DamagesError::Config(format!(
                "default_preset '{}' is not one of the presets",
                self.default_preset
            )));
        }
        Ok(())
    }

    /// The preset applied when a request names no rate.
    pub fn default_rate_preset(&self) -> Result<&RatePreset, DamagesError> {
        self.preset(&self.default_preset)
    }

    /// Look up a preset by label, ignoring case.
    pub fn preset(&self, label: &str) -> Result<&RatePreset, DamagesError> {
        let wanted = label.trim();
        self.presets
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = self.presets.iter().map(|p| p.label.as_str()).collect();
                DamagesError::UnknownPreset(format!("'{}' (known: {})", wanted, known.join(", ")))
            })
    }
}

fn fallback_preset(presets: &[RatePreset]) -> String {
    presets
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(DEFAULT_PRESET))
        .or_else(|| presets.first())
        .map_or_else(|| DEFAULT_PRESET.to_string(), |p| p.label.clone())
}

// ── Tests ───────────────────────────────────────────────────────────────────
