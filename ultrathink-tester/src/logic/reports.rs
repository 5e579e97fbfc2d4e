use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use ultrathink_game::constants::INITIAL_FUNDS;
use ultrathink_game::numbers::{group_thousands, i64_to_f64, signed_dollars};

use super::{PlaythroughRecord, StrategyAggregate};

const CSV_HEADER: &str =
    "strategy,mode,seed,seed_code,status,survived,total,final_value,profit,actions,title";

#[derive(Serialize)]
struct JsonReport<'a> {
    aggregates: &'a [StrategyAggregate],
    records: &'a [PlaythroughRecord],
}

fn dollars(value: f64) -> String {
    // Means are reported to the whole dollar.
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    format!("${}", group_thousands(rounded))
}

pub fn generate_console_report(
    out: &mut dyn Write,
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Strategy Sweep Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;

    let total_runs: usize = aggregates.iter().map(|a| a.runs).sum();
    writeln!(out, "Total runs: {total_runs}")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for agg in aggregates {
        let rugged = if agg.rugged == 0 {
            agg.rugged.to_string().green()
        } else {
            agg.rugged.to_string().red()
        };
        writeln!(out, "{} [{}]", agg.strategy.label().bold(), agg.mode)?;
        writeln!(
            out,
            "   Completed: {}/{} ({:.1}%)  Rugged: {rugged}  Perfect: {}",
            agg.completed, agg.runs, agg.completion_pct, agg.perfect_runs
        )?;
        writeln!(
            out,
            "   Mean survived: {:.2}  Mean value: {}  Best: ${}",
            agg.mean_survived,
            dollars(agg.mean_final_value),
            group_thousands(agg.best_value)
        )?;
        writeln!(out)?;
    }

    if let (Some(best), Some(worst)) = (
        aggregates
            .iter()
            .max_by(|a, b| a.mean_final_value.total_cmp(&b.mean_final_value)),
        aggregates
            .iter()
            .min_by(|a, b| a.mean_final_value.total_cmp(&b.mean_final_value)),
    ) {
        writeln!(out, "{}", "💰 Value Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "================".yellow())?;
        writeln!(
            out,
            "Richest: {} ({})",
            best.strategy.label().green(),
            dollars(best.mean_final_value)
        )?;
        writeln!(
            out,
            "Poorest: {} ({})",
            worst.strategy.label().yellow(),
            dollars(worst.mean_final_value)
        )?;
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    aggregates: &[StrategyAggregate],
    records: &[PlaythroughRecord],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(&JsonReport {
        aggregates,
        records,
    })?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# ULTRATHINK Strategy Sweep\n")?;
    if aggregates.is_empty() {
        writeln!(out, "_No runs executed._")?;
        return Ok(());
    }

    writeln!(
        out,
        "| Strategy | Mode | Runs | Completed | Rugged | Perfect | Mean survived | Mean value | Mean P&L | Best |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
    for agg in aggregates {
        let mean_profit = agg.mean_final_value - i64_to_f64(INITIAL_FUNDS);
        #[allow(clippy::cast_possible_truncation)]
        let profit_label = signed_dollars(mean_profit.round() as i64);
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.2} | {} | {} | ${} |",
            agg.strategy.label(),
            agg.mode,
            agg.runs,
            agg.completed,
            agg.rugged,
            agg.perfect_runs,
            agg.mean_survived,
            dollars(agg.mean_final_value),
            profit_label,
            group_thousands(agg.best_value)
        )?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, records: &[PlaythroughRecord]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            record.strategy.key(),
            record.mode,
            record.seed,
            record.seed_code,
            record.status,
            record.survived,
            record.total,
            record.final_value,
            record.profit(),
            record.actions,
            record.title
        )?;
    }
    Ok(())
}
