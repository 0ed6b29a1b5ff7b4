use std::path::PathBuf;

use clap::Parser;

use survey_sim::analysis::{question_statistics, save_report};
use survey_sim::config::SimulationConfig;
use survey_sim::env_config::{init_base_path, init_logging};
use survey_sim::storage::read_records;
use survey_sim::Result;

/// Per-question answer distributions across every record in a file.
#[derive(Parser)]
#[command(name = "survey-questions", version)]
struct Args {
    #[arg(long, default_value = "resultdata.jsonl")]
    input: PathBuf,
    /// Also write the statistics as pretty JSON
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    init_base_path()?;
    // Only validated here; distributions are not catalog-bound
    SimulationConfig::load(args.config.as_deref())?;

    let set = read_records(&args.input)?;
    let stats = question_statistics(&set.records);
    if stats.is_empty() {
        println!("No valid answers found in {}.", args.input.display());
        return Ok(());
    }

    println!(
        "Loaded {} records from {}.",
        set.records.len(),
        args.input.display()
    );
    println!("Found {} questions.\n", stats.len());
    for q in &stats {
        println!("Question: {}", q.id);
        println!("  N = {}", q.n);
        println!("  Distribution (1..5 counts): {}", q.distribution_string());
        if let Some(label) = q.mode_label() {
            println!("  Most common = {label}");
        }
        println!("  Average = {:.3}", q.mean);
        println!("  Median  = {:.3}", q.median);
        println!("  Std dev = {:.3}\n", q.std_dev);
    }

    if let Some(path) = &args.output {
        save_report(&stats, path)?;
        println!("Statistics: {}", path.display());
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
