//! Export shapes for downstream document generators.
//!
//! Two views of a [`DamagesReport`]: a row-per-scenario CSV table, and a flat
//! list of labelled values for a summary document. Neither computes anything;
//! numbers in the CSV are written unrounded, and summary values are formatted
//! strings ready to print.

use std::io;

use serde::Serialize;

use crate::error::Result;
use crate::narrative::{format_datetime, format_money};
use crate::report::{DamagesReport, RateSolution};
use crate::scenario::ScenarioRow;
use crate::unit::TimeUnit;

#[derive(Debug, Serialize)]
struct ScenarioCsvRow<'a> {
    #[serde(rename = "Time Unit")]
    unit: TimeUnit,
    #[serde(rename = "Coin")]
    rate_label: &'a str,
    #[serde(rename = "Rate (per unit)")]
    rate_per_unit: f64,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Abs Δ from target")]
    absolute_delta: f64,
    #[serde(rename = "% Δ")]
    percent_delta: Option<f64>,
}

impl<'a> From<&'a ScenarioRow> for ScenarioCsvRow<'a> {
    fn from(row: &'a ScenarioRow) -> Self {
        Self {
            unit: row.unit,
            rate_label: &row.rate_label,
            rate_per_unit: row.rate_per_unit,
            amount: row.amount,
            absolute_delta: row.absolute_delta,
            percent_delta: row.percent_delta,
        }
    }
}

/// Write scenario rows as CSV with a header line. An absent percent delta is
/// an empty cell.
pub fn write_scenarios_csv<W: io::Write>(rows: &[ScenarioRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(CSV_HEADERS)?;
    }
    for row in rows {
        wtr.serialize(ScenarioCsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

const CSV_HEADERS: [&str; 6] = [
    "Time Unit",
    "Coin",
    "Rate (per unit)",
    "Amount",
    "Abs Δ from target",
    "% Δ",
];

/// Scenario rows as a CSV string.
pub fn scenarios_csv_string(rows: &[ScenarioRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_scenarios_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// One labelled line of a summary document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryField {
    pub key: String,
    pub value: String,
}

impl SummaryField {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Flat key/value summary of a report.
pub fn summary_fields(report: &DamagesReport) -> Vec<SummaryField> {
    let span = report.span();
    let unit = report.unit;
    let mut fields = vec![
        SummaryField::new("Start", format_datetime(span.start())),
        SummaryField::new("End", format_datetime(span.end())),
        SummaryField::new(
            "Unit & Rate",
            format!("{unit} @ {}/{unit}", format_money(report.rate_per_unit)),
        ),
        SummaryField::new("Past Amount", format_money(report.amount_now)),
        SummaryField::new(
            "Future Added",
            match &report.projection {
                Some(p) => format!("{} years, {} days", p.extra_years, p.extra_days),
                None => "None".to_string(),
            },
        ),
        SummaryField::new(
            "Past + Future Amount",
            report
                .amount_total
                .map(format_money)
                .unwrap_or_else(|| "—".to_string()),
        ),
        SummaryField::new(
            "Inclusive days",
            if report.inclusive_days { "Yes" } else { "No" },
        ),
    ];
    match &report.solved_rate {
        Some(RateSolution::Solved { rate }) => {
            fields.push(SummaryField::new(
                "Solved Rate",
                format!("{} per {unit}", format_money(*rate)),
            ));
        }
        Some(RateSolution::Unsolvable { reason }) => {
            fields.push(SummaryField::new("Solved Rate", reason.clone()));
        }
        None => {}
    }
    fields.push(SummaryField::new(
        "Generated",
        format_datetime(report.generated_at_local()),
    ));
    fields
}

// ── Tests ───────────────────────────────────────────────────────────────────
