use std::path::PathBuf;

use clap::Parser;

use landlord_bench::config::{BenchmarkConfig, SeedRange};
use landlord_bench::logging::init_logging;
use landlord_bench::tournament::TournamentRunner;
use landlord_core::model::mode::GameMode;

/// Seats the configured bots around one table per seed and reports how
/// often the landlord and the peasants win.
#[derive(Debug, Parser)]
#[command(name = "landlord-bench", version, about = "Dou Dizhu bot tournament")]
struct Cli {
    /// YAML file naming the agents and output paths.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Table size; the config must list one agent per seat.
    #[arg(long, value_name = "three|four")]
    mode: Option<GameMode>,

    /// Deal seeds to play, one hand each: `START..END`, `START..=END` or `SEED`.
    #[arg(long, value_name = "RANGE")]
    seeds: Option<SeedRange>,

    /// Seat rotations per deal, up to one per seat.
    #[arg(long, value_name = "COUNT")]
    rotations: Option<usize>,

    /// Check the configuration and stop.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;
    if let Some(mode) = cli.mode {
        config.deals.mode = mode;
    }
    if let Some(seeds) = cli.seeds {
        config.deals.seeds = seeds;
    }
    if let Some(rotations) = cli.rotations {
        config.deals.rotations = Some(rotations);
    }
    config.validate()?;

    let outputs = config.resolved_outputs();
    let runner = TournamentRunner::new(config.clone(), outputs.clone())?;
    if cli.validate_only {
        println!(
            "{}: {} hands x {} rotations at a {} table",
            config.run_id,
            config.deals.hands(),
            config.deals.rotation_count(),
            config.deals.mode
        );
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs, &config.run_id)?;
    let summary = runner.run()?;

    print!("{}", summary.standings);
    println!("rows: {}", summary.jsonl_path.display());
    println!("summary: {}", summary.summary_path.display());
    if let Some(path) = summary.telemetry_path {
        println!("telemetry: {}", path.display());
    }
    Ok(())
}
