use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use survey_sim::analysis::{aggregate_scores, save_report, MeanStd};
use survey_sim::config::SimulationConfig;
use survey_sim::env_config::{init_base_path, init_logging, init_rayon_threads};
use survey_sim::scoring::score_records;
use survey_sim::storage::{read_records, write_jsonl};
use survey_sim::Result;

/// Score every record, flag it, and aggregate by (profile, week).
#[derive(Parser)]
#[command(name = "survey-score", version)]
struct Args {
    #[arg(long, default_value = "resultdata_longitudinal.jsonl")]
    input: PathBuf,
    /// Receives scores.jsonl and aggregates.json
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn fmt_ms(ms: &MeanStd) -> String {
    format!("{:.3}±{:.3}", ms.mean, ms.std)
}

fn run(args: Args) -> Result<()> {
    init_base_path()?;
    let config = SimulationConfig::load(args.config.as_deref())?;
    init_rayon_threads();

    let catalog = config.catalog()?;
    let set = read_records(&args.input)?;
    tracing::info!(records = set.records.len(), skipped = set.skipped, "scoring");

    let start = Instant::now();
    let scored = score_records(&catalog, &set.records, &config.thresholds);
    let report = aggregate_scores(&scored);
    let elapsed = start.elapsed();

    let scores_path = args.output_dir.join("scores.jsonl");
    let aggregates_path = args.output_dir.join("aggregates.json");
    write_jsonl(&scores_path, &scored)?;
    save_report(&report, &aggregates_path)?;

    println!(
        "Scored {} records in {:.1} ms",
        scored.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    println!("Profiles: {:?}", report.profiles);
    println!("Weeks: {:?}", report.weeks);
    println!();
    for g in report.last_week_per_profile() {
        println!(
            "{:18} week={} n={:<5} health={} extreme={} lie={} entropy={} sick={:.1}% lying={:.1}%",
            g.profile,
            g.time_step,
            g.records,
            fmt_ms(&g.health),
            fmt_ms(&g.extreme),
            fmt_ms(&g.lie),
            fmt_ms(&g.entropy),
            g.sick_rate * 100.0,
            g.lying_rate * 100.0,
        );
    }
    println!();
    println!("Scores: {}", scores_path.display());
    println!("Aggregates: {}", aggregates_path.display());
    Ok(())
}

fn main() {
    init_logging();
    if let Err(e) = run(Args::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
