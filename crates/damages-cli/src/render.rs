//! Plain-text rendering of a report for the terminal.

use std::fmt::{self, Write};

use damages_engine::narrative::{format_datetime, format_grouped, format_human_duration};
use damages_engine::{format_money, DamagesReport, RateSolution, ScenarioRow, UnitBreakdown};

pub fn render_text(report: &DamagesReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let rate = format_money(report.rate_per_unit);
    let unit = report.unit;

    writeln!(out, "Time × Money Damages Summary")?;
    writeln!(out)?;
    writeln!(
        out,
        "Past Pain @ {rate}/{unit}: {}",
        format_money(report.amount_now)
    )?;
    if let (Some(total), Some(p)) = (report.amount_total, &report.projection) {
        writeln!(
            out,
            "Past + Future ({}y, {}d) @ {rate}/{unit}: {}",
            p.extra_years,
            p.extra_days,
            format_money(total)
        )?;
    }
    writeln!(
        out,
        "Amounts are rounded to 2 decimals for display; internal math retains full precision."
    )?;

    writeln!(out)?;
    writeln!(out, "Time Breakdown")?;
    let span = report.span();
    writeln!(out, "  Past window")?;
    writeln!(out, "    Start:   {}", format_datetime(span.start()))?;
    writeln!(out, "    End:     {}", format_datetime(span.end()))?;
    writeln!(
        out,
        "    Elapsed: {}",
        format_human_duration(report.base_duration_seconds)
    )?;
    write_breakdown(
        &mut out,
        &report.breakdown.base,
        report.breakdown.display_days,
        report.inclusive_days,
    )?;

    if let (Some(total), Some(days), Some(end)) = (
        &report.breakdown.total,
        report.breakdown.display_total_days,
        report.projected_end_at(),
    ) {
        writeln!(out, "  Past + Future window")?;
        writeln!(out, "    Projected end: {}", format_datetime(end))?;
        write_breakdown(&mut out, total, days, report.inclusive_days)?;
    }

    if let Some(rows) = &report.top_scenarios {
        writeln!(out)?;
        writeln!(out, "Targeting")?;
        out.push_str(&render_scenarios(rows)?);
        writeln!(
            out,
            "Closest 'clean' combinations across presets and time units for the past window."
        )?;
    }

    if let (Some(solution), Some(target)) = (&report.solved_rate, &report.target) {
        writeln!(out)?;
        writeln!(out, "Targeting")?;
        match solution {
            RateSolution::Solved { rate } => {
                writeln!(
                    out,
                    "To hit {} using {unit}, use a rate of {} per {unit} (past window only).",
                    format_money(target.amount),
                    format_money(*rate)
                )?;
            }
            RateSolution::Unsolvable { reason } => {
                writeln!(out, "{reason}")?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Narrative")?;
    writeln!(out, "{}", report.narrative)?;
    Ok(out)
}

fn write_breakdown(
    out: &mut String,
    breakdown: &UnitBreakdown,
    days: f64,
    inclusive: bool,
) -> fmt::Result {
    writeln!(out, "    Seconds: {}", format_grouped(breakdown.seconds, 0))?;
    writeln!(out, "    Minutes: {}", format_grouped(breakdown.minutes, 0))?;
    writeln!(out, "    Hours:   {}", format_grouped(breakdown.hours, 0))?;
    writeln!(
        out,
        "    Days:    {}{}",
        format_grouped(days, 2),
        if inclusive { " (inclusive)" } else { "" }
    )
}

/// Scenario rows as an aligned table. A missing percent delta renders blank.
pub fn render_scenarios(rows: &[ScenarioRow]) -> Result<String, fmt::Error> {
    let header = [
        "Time Unit",
        "Coin",
        "Rate (per unit)",
        "Amount",
        "Abs Δ from target",
        "% Δ",
    ];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.unit.to_string(),
                row.rate_label.clone(),
                format_money(row.rate_per_unit),
                format_money(row.amount),
                format_money(row.absolute_delta),
                row.percent_delta
                    .map(|p| format!("{p:.2}%"))
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells = header.map(String::from);
    for line in std::iter::once(&header_cells).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let pad = w - cell.chars().count();
                if i < 2 {
                    format!("{cell}{}", " ".repeat(pad))
                } else {
                    format!("{}{cell}", " ".repeat(pad))
                }
            })
            .collect();
        writeln!(out, "  {}", padded.join("  ").trim_end())?;
    }
    Ok(out)
}
