mod logic;
mod util;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;
use ultrathink_game::ScenarioMode;

use logic::{
    GameplayStrategy, PlaythroughRecord, SeedInfo, SimulationConfig, StrategyAggregate,
    TesterAssets, aggregate, resolve_seed_inputs, simulate, validate_strategy_invariants,
};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Authored case deck
    Catalog,
    /// Curve-sampled random decks
    Random,
    /// Run both deck sources
    Both,
}

impl ModeArg {
    fn modes(self) -> Vec<ScenarioMode> {
        match self {
            Self::Catalog => vec![ScenarioMode::Catalog],
            Self::Random => vec![ScenarioMode::Random],
            Self::Both => vec![ScenarioMode::Catalog, ScenarioMode::Random],
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ultrathink-tester", version = "0.1.0")]
#[command(about = "Automated strategy sweeps for the ULTRATHINK game engine")]
struct Args {
    /// Seeds to run: integers or UT- replay codes (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Runs per seed and strategy; later iterations derive fresh seeds
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Strategies to run (comma-separated keys, or "all")
    #[arg(long, default_value = "all")]
    strategies: String,

    /// Deck source
    #[arg(long, value_enum, default_value_t = ModeArg::Both)]
    mode: ModeArg,

    /// Tokens per random deck
    #[arg(long, default_value_t = 5)]
    tokens: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner(&args);

    let start_time = Instant::now();
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let strategies = expand_strategies(&args.strategies)?;
    let assets = TesterAssets::load_default()?;
    log::info!(
        "catalog fingerprint {:016x}, {} entries",
        assets.catalog().fingerprint(),
        assets.catalog().len()
    );

    let records = run_sweep(&args, &assets, &seed_infos, &strategies);
    let aggregates = aggregate(&records);

    write_reports(&args, &aggregates, &records, start_time)?;
    validate_strategy_invariants(&records)?;

    Ok(())
}

fn announce_banner(args: &Args) {
    let lines = [
        "🧠 ULTRATHINK Strategy Tester".bright_cyan().bold().to_string(),
        "=============================".cyan().to_string(),
        format!("Started {}", Utc::now().format("%Y-%m-%dT%H:%M:%SZ")),
    ];
    for line in lines {
        // Machine-readable reports keep stdout clean.
        if args.report == "console" && args.output.is_none() {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
}

fn expand_strategies(arg: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for key in split_csv(arg) {
        if key.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        let Ok(strategy) = key.parse::<GameplayStrategy>() else {
            let known: Vec<&str> = GameplayStrategy::ALL.iter().map(|s| s.key()).collect();
            bail!("Unknown strategy: {key} (expected one of {})", known.join(", "));
        };
        strategies.push(strategy);
    }
    strategies.sort();
    strategies.dedup();
    if strategies.is_empty() {
        strategies.extend(GameplayStrategy::ALL);
    }
    Ok(strategies)
}

fn run_sweep(
    args: &Args,
    assets: &TesterAssets,
    seed_infos: &[SeedInfo],
    strategies: &[GameplayStrategy],
) -> Vec<PlaythroughRecord> {
    let iterations = args.iterations.max(1);
    let mut records = Vec::new();
    for mode in args.mode.modes() {
        for &strategy in strategies {
            for seed_info in seed_infos {
                for iteration in 0..iterations {
                    let seed = seed_info.iteration_seed(iteration);
                    let config = SimulationConfig::new(mode, strategy, seed)
                        .with_tokens(args.tokens)
                        .with_decisions(args.verbose);
                    let record = simulate(assets, config);
                    if args.verbose {
                        report_run(&record, seed_info, iteration);
                    }
                    records.push(record);
                }
            }
        }
    }
    records
}

fn report_run(record: &PlaythroughRecord, seed_info: &SeedInfo, iteration: usize) {
    let status = if record.is_rugged() {
        "RUGGED".red()
    } else {
        "DONE".green()
    };
    eprintln!(
        "{status} [{} {} #{iteration} {}] {}/{} ${} {}",
        record.strategy.key(),
        record.mode,
        seed_info.display_code(),
        record.survived,
        record.total,
        record.final_value,
        record.title.dimmed()
    );
    for decision in &record.decisions {
        eprintln!(
            "     token {} {} {} -> {} ({})",
            decision.token_index + 1,
            decision.announcement_id,
            decision.action,
            decision.chart_value,
            decision.rationale.as_deref().unwrap_or("-")
        );
    }
}

fn write_reports(
    args: &Args,
    aggregates: &[StrategyAggregate],
    records: &[PlaythroughRecord],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, aggregates, records)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, aggregates)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, records)?,
        _ => {
            let duration = start_time.elapsed();
            logic::reports::generate_console_report(&mut output_target, aggregates, duration)?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            seeds: "7".to_string(),
            iterations: 2,
            strategies: "always-sell,greedy".to_string(),
            mode: ModeArg::Random,
            tokens: 3,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    #[test]
    fn strategies_expand_and_dedupe() {
        let all = expand_strategies("all").unwrap();
        assert_eq!(all, GameplayStrategy::ALL.to_vec());
        let some = expand_strategies("greedy, coin, greedy").unwrap();
        assert_eq!(some, vec![GameplayStrategy::Greedy, GameplayStrategy::Coin]);
        assert!(expand_strategies("moonshot").is_err());
        assert_eq!(expand_strategies("").unwrap().len(), 6);
    }

    #[test]
    fn sweep_covers_every_combination() {
        let args = base_args();
        let assets = TesterAssets::load_default().unwrap();
        let seeds = resolve_seed_inputs(&split_csv(&args.seeds)).unwrap();
        let strategies = expand_strategies(&args.strategies).unwrap();
        let records = run_sweep(&args, &assets, &seeds, &strategies);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.total == 3));
        assert_eq!(records[0].seed, 7);
        validate_strategy_invariants(&records).unwrap();
    }

    #[test]
    fn both_modes_expand() {
        assert_eq!(ModeArg::Both.modes().len(), 2);
        assert_eq!(ModeArg::Catalog.modes(), vec![ScenarioMode::Catalog]);
    }

    #[test]
    fn writes_csv_report_to_file() {
        let path = std::env::temp_dir().join(format!(
            "ultrathink-report-{}.csv",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        let mut args = base_args();
        args.report = "csv".to_string();
        args.output = Some(path.clone());
        let assets = TesterAssets::load_default().unwrap();
        let seeds = resolve_seed_inputs(&split_csv(&args.seeds)).unwrap();
        let records = run_sweep(&args, &assets, &seeds, &[GameplayStrategy::AlwaysSell]);
        write_reports(&args, &aggregate(&records), &records, Instant::now()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), records.len() + 1);
    }
}
