//! `damages` — time × money damages calculator.

mod args;
mod logging;
mod render;

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use damages_engine::{
    summary_fields, write_scenarios_csv, DamagesEngine, DamagesReport, EngineConfig, SummaryField,
};
use serde::Serialize;

use crate::args::{Cli, OutputFormat};

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a DamagesReport,
    summary: Vec<SummaryField>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("evaluation failed: {e:?}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    tracing::debug!(timezone = config.timezone.name(), presets = config.presets.len(), "config loaded");

    let request = cli.to_request()?;
    let now = cli.as_of.unwrap_or_else(Utc::now);
    let engine = DamagesEngine::new(config);
    let report = engine.evaluate(&request, now)?;
    tracing::info!(amount_now = report.amount_now, unit = %report.unit, "computed past amount");

    if let Some(path) = &cli.csv {
        let rows = report.top_scenarios.as_deref().unwrap_or_default();
        let file = File::create(path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        write_scenarios_csv(rows, BufWriter::new(file))
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!(rows = rows.len(), path = %path.display(), "scenarios exported");
    }

    match cli.format {
        OutputFormat::Text => print!("{}", render::render_text(&report)?),
        OutputFormat::Json => {
            let output = JsonOutput {
                report: &report,
                summary: summary_fields(&report),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
