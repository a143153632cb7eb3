use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use damages_engine::span::{parse_date, parse_time_of_day, parse_timezone};
use damages_engine::{
    EndSpec, EvaluationRequest, ProjectionSpec, RateChoice, TargetMode, TargetSpec, TimeUnit,
};

#[derive(Parser, Debug)]
#[command(
    name = "damages",
    version,
    about = "Convert time lived with pain into a dollar figure at a per-unit rate"
)]
pub struct Cli {
    /// Date of loss (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: NaiveDate,

    /// Start time of day (e.g. 08:30 or 8:30am); omitted means midnight
    #[arg(long, value_parser = parse_time_of_day)]
    pub start_time: Option<NaiveTime>,

    /// End date (YYYY-MM-DD); omitted means the current moment
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// End time of day; omitted means the end date is counted in full
    #[arg(long, value_parser = parse_time_of_day, requires = "end")]
    pub end_time: Option<NaiveTime>,

    /// IANA timezone for the boundaries (default from config)
    #[arg(long, value_parser = parse_timezone)]
    pub timezone: Option<Tz>,

    /// Time unit the rate applies to
    #[arg(long, default_value = "minute")]
    pub unit: TimeUnit,

    /// Named rate preset (default: the configured default preset, Dollar)
    #[arg(long, conflicts_with = "rate")]
    pub preset: Option<String>,

    /// Custom rate per unit, in dollars
    #[arg(long)]
    pub rate: Option<f64>,

    /// Target total in dollars
    #[arg(long)]
    pub target: Option<f64>,

    /// What to do with the target
    #[arg(long, value_enum, default_value_t = TargetModeArg::Combos)]
    pub target_mode: TargetModeArg,

    /// Future days to add after the end
    #[arg(long)]
    pub future_days: Option<f64>,

    /// Future years to add after the end (365.2425 days each)
    #[arg(long)]
    pub future_years: Option<f64>,

    /// Count the day of loss as a full day in displayed day counts
    #[arg(long)]
    pub inclusive_days: bool,

    /// Number of target-match scenarios to show
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the top target-match scenarios to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// TOML configuration file (timezone, units, presets, top_k)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Evaluate as of this instant (RFC 3339) instead of the system clock
    #[arg(long, value_parser = parse_instant)]
    pub as_of: Option<DateTime<Utc>>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetModeArg {
    /// Rank preset combinations by distance from the target
    Combos,
    /// Solve the exact rate for the chosen unit
    Solve,
}

impl From<TargetModeArg> for TargetMode {
    fn from(arg: TargetModeArg) -> Self {
        match arg {
            TargetModeArg::Combos => TargetMode::SearchCombos,
            TargetModeArg::Solve => TargetMode::SolveRate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("'{s}': {e}"))
}

impl Cli {
    /// Build the engine request from the parsed flags.
    pub fn to_request(&self) -> Result<EvaluationRequest> {
        if self.csv.is_some()
            && (self.target.is_none() || self.target_mode != TargetModeArg::Combos)
        {
            bail!("--csv needs a scenario search: pass --target with --target-mode combos");
        }

        let end = match self.end {
            Some(date) => EndSpec::At {
                date,
                time: self.end_time,
            },
            None => EndSpec::Now,
        };

        let mut request = EvaluationRequest::new(self.start, end);
        request.start_time = self.start_time;
        request.timezone = self.timezone;
        request.unit = self.unit;
        request.inclusive_days = self.inclusive_days;
        request.top_k = self.top_k;

        request.rate = match (&self.preset, self.rate) {
            (Some(label), _) => RateChoice::Preset(label.clone()),
            (None, Some(amount)) => RateChoice::Custom(amount),
            (None, None) => RateChoice::default(),
        };

        if let Some(amount) = self.target {
            request.target = Some(TargetSpec::new(amount, self.target_mode.into())?);
        }

        if self.future_days.is_some() || self.future_years.is_some() {
            request.projection = Some(ProjectionSpec::new(
                self.future_days.unwrap_or(0.0),
                self.future_years.unwrap_or(0.0),
            )?);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["damages"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--start", "2022-07-28"]);
        let request = cli.to_request().unwrap();
        assert_eq!(request.end, EndSpec::Now);
        assert_eq!(request.unit, TimeUnit::Minute);
        assert_eq!(request.rate, RateChoice::ConfigDefault);
        assert!(request.target.is_none());
        assert!(request.projection.is_none());
    }

    #[test]
    fn test_full_request() {
        let cli = parse(&[
            "--start",
            "2022-07-28",
            "--start-time",
            "8:30am",
            "--end",
            "2023-01-01",
            "--end-time",
            "17:00",
            "--timezone",
            "America/New_York",
            "--unit",
            "hour",
            "--rate",
            "2.5",
            "--target",
            "400000",
            "--target-mode",
            "solve",
            "--future-years",
            "2",
            "--inclusive-days",
        ]);
        let request = cli.to_request().unwrap();
        assert_eq!(request.start_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(request.unit, TimeUnit::Hour);
        assert_eq!(request.rate, RateChoice::Custom(2.5));
        assert_eq!(request.target.unwrap().mode, TargetMode::SolveRate);
        assert_eq!(request.projection.unwrap().extra_years, 2.0);
        assert_eq!(request.projection.unwrap().extra_days, 0.0);
        assert!(request.inclusive_days);
        assert_eq!(request.timezone.unwrap().name(), "America/New_York");
    }

    #[test]
    fn test_preset_conflicts_with_rate() {
        let result = Cli::try_parse_from([
            "damages",
            "--start",
            "2022-07-28",
            "--preset",
            "Dime",
            "--rate",
            "0.5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_end_time_requires_end() {
        let result =
            Cli::try_parse_from(["damages", "--start", "2022-07-28", "--end-time", "10:00"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_requires_combo_search() {
        let cli = parse(&["--start", "2022-07-28", "--csv", "out.csv"]);
        assert!(cli.to_request().is_err());
        let cli = parse(&["--start", "2022-07-28", "--csv", "out.csv", "--target", "100"]);
        assert!(cli.to_request().is_ok());
    }

    #[test]
    fn test_negative_target_rejected() {
        let cli = parse(&["--start", "2022-07-28", "--target=-5"]);
        assert!(cli.to_request().is_err());
    }
}
