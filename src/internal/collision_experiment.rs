//! Compares average collision counts of folding-hash tables across capacities
//! and key widths.

use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use foldchain::{
    ChartSink, ConsoleSink, ExperimentConfig, ExperimentRunner, IcNumberGenerator, KeyWidth,
    LogSink, Result, logger::initialize_logger,
};

/// Command line of the collision experiment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rounds averaged per key width
    #[arg(short, long, default_value_t = 10)]
    rounds: usize,

    /// Keys inserted per round
    #[arg(short, long, default_value_t = 1000)]
    batch_size: usize,

    /// Table capacities to compare
    #[arg(short, long = "capacity", value_delimiter = ',', default_values_t = [1009, 2003])]
    capacities: Vec<usize>,

    /// Key widths to simulate, 12 or 16 digits
    #[arg(
        short = 'w',
        long = "key-width",
        value_delimiter = ',',
        default_values_t = [KeyWidth::Twelve, KeyWidth::Sixteen]
    )]
    key_widths: Vec<KeyWidth>,

    /// Seed for reproducible runs, each key width uses `seed + position`
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fill each round's tables on worker threads
    #[arg(long)]
    parallel: bool,

    /// Directory receiving one collision chart per key width
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Do not print the text report
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

/// Runs the experiment once per requested key width
fn run(args: &Args) -> Result<()> {
    let config = ExperimentConfig {
        rounds: args.rounds,
        batch_size: args.batch_size,
        capacities: args.capacities.clone(),
        parallel: args.parallel,
    };
    config.validate()?;

    if let Some(dir) = &args.chart_dir {
        fs::create_dir_all(dir)?;
    }

    for (offset, &width) in (0u64..).zip(&args.key_widths) {
        let mut keys = match args.seed {
            Some(seed) => IcNumberGenerator::new(width, seed.wrapping_add(offset)),
            None => IcNumberGenerator::from_entropy(width),
        };

        let console =
            (!args.quiet).then(|| ConsoleSink::stdout(format!("IC Length {}", width.digits())));
        let chart = args.chart_dir.as_ref().map(|dir| {
            ChartSink::new(
                dir.join(format!("collisions_{}.png", width.digits())),
                format!("Collisions per round, {}-digit keys", width.digits()),
            )
        });
        let log = LogSink::new(format!("{}-digit", width.digits()));

        let mut runner = ExperimentRunner::new((log, (console, chart)));
        let results = runner.run_config(&config, &mut keys)?;

        if let Some(best) = results.iter().min_by(|a, b| a.average().total_cmp(&b.average())) {
            log::info!(
                "{}-digit keys: fewest collisions with table size {} ({:.2} on average)",
                width.digits(),
                best.capacity(),
                best.average()
            );
        }
    }
    Ok(())
}

/// Parses arguments, runs the experiment and maps failures to a non-zero exit code
fn main() -> ExitCode {
    let args = Args::parse();
    initialize_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("collision experiment failed: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
