use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use survey_sim::config::SimulationConfig;
use survey_sim::constants::{DEFAULT_EVOLVE_SEED, DEFAULT_WEEKS};
use survey_sim::env_config::{init_base_path, init_logging, init_rayon_threads};
use survey_sim::evolution::evolve_cohort;
use survey_sim::storage::{read_records, select_baselines, write_jsonl};
use survey_sim::Result;

/// Expand baseline records into weekly trajectories.
#[derive(Parser)]
#[command(name = "survey-evolve", version)]
struct Args {
    #[arg(long, default_value = "resultdata.jsonl")]
    input: PathBuf,
    /// Rewritten on every run
    #[arg(long, default_value = "resultdata_longitudinal.jsonl")]
    output: PathBuf,
    /// Total weeks including the baseline
    #[arg(long, default_value_t = DEFAULT_WEEKS)]
    weeks: u32,
    #[arg(long, default_value_t = DEFAULT_EVOLVE_SEED)]
    seed: u64,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    init_base_path()?;
    let config = SimulationConfig::load(args.config.as_deref())?;
    init_rayon_threads();

    let catalog = config.catalog()?;
    let set = read_records(&args.input)?;
    let baselines = select_baselines(&set.records);
    tracing::info!(
        rows = set.records.len(),
        skipped = set.skipped,
        participants = baselines.len(),
        weeks = args.weeks,
        seed = args.seed,
        "evolving cohort"
    );

    let start = Instant::now();
    let batch = evolve_cohort(&catalog, &baselines, args.weeks, args.seed, &config.transitions);
    let elapsed = start.elapsed();

    write_jsonl(&args.output, &batch.records)?;

    println!(
        "Evolved {} participants x {} weeks = {} records in {:.1} ms -> {}",
        baselines.len(),
        args.weeks,
        batch.records.len(),
        elapsed.as_secs_f64() * 1000.0,
        args.output.display()
    );
    if !batch.anomalies.is_empty() {
        println!(
            "{} participant(s) with unknown profile labels were carried forward unchanged:",
            batch.anomalies.len()
        );
        for a in &batch.anomalies {
            println!("  id={} label={:?}", a.id, a.label);
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    if let Err(e) = run(Args::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
