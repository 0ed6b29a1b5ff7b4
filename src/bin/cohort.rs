use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use survey_sim::cohort::{generate_cohort, LyingModel};
use survey_sim::config::SimulationConfig;
use survey_sim::constants::DEFAULT_COHORT_SEED;
use survey_sim::env_config::{init_base_path, init_logging, init_rayon_threads};
use survey_sim::storage::{append_jsonl, write_jsonl};
use survey_sim::types::Profile;
use survey_sim::Result;

/// Generate week-1 answer sets for a synthetic cohort.
#[derive(Parser)]
#[command(name = "survey-cohort", version)]
struct Args {
    /// Number of participants; profiles cycle HT, HL, IT, IL
    #[arg(long, default_value_t = 1000)]
    participants: usize,
    #[arg(long, default_value_t = DEFAULT_COHORT_SEED)]
    seed: u64,
    #[arg(long, default_value = "resultdata.jsonl")]
    output: PathBuf,
    /// Overrides `lying_model` from the config file
    #[arg(long)]
    lying_model: Option<LyingModel>,
    /// Replace the output file instead of appending to it
    #[arg(long)]
    truncate: bool,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    init_base_path()?;
    let config = SimulationConfig::load(args.config.as_deref())?;
    init_rayon_threads();

    let catalog = config.catalog()?;
    let model = args.lying_model.unwrap_or(config.lying_model);
    tracing::info!(
        participants = args.participants,
        seed = args.seed,
        lying_model = %model,
        questions = catalog.len(),
        "generating cohort"
    );

    let start = Instant::now();
    let records = generate_cohort(&catalog, args.participants, args.seed, model);
    let elapsed = start.elapsed();

    if args.truncate {
        write_jsonl(&args.output, &records)?;
    } else {
        append_jsonl(&args.output, &records)?;
    }

    println!(
        "Generated {} participants in {:.1} ms -> {}",
        records.len(),
        elapsed.as_secs_f64() * 1000.0,
        args.output.display()
    );
    for profile in Profile::ALL {
        let n = records.iter().filter(|r| r.name == profile.as_str()).count();
        println!("  {:18} {:>6}", profile.as_str(), n);
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
