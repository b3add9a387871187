//! Reads a 3-uniform hypergraph and prints its minimum cut value followed by
//! the number of distinct minimum cuts found within the time budget.

use clap::Parser;
use hypercut::graph::{exact_min_cut, HypergraphInput, HypergraphMinCut, MinCutConfig};
use hypercut::{Error, Result};
use log::{info, warn};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "hypercut")]
#[command(about = "Randomized minimum cut of a 3-uniform hypergraph", long_about = None)]
struct Cli {
    /// Time budget in seconds; no trial starts after it runs out
    #[arg(short, long, default_value_t = 2.0)]
    seconds: f64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many trials even if time remains
    #[arg(short, long)]
    trials: Option<usize>,

    /// Worker threads running independent trials
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,

    /// Input file (standard input when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Cross-check against exhaustive enumeration (small inputs only)
    #[arg(long)]
    verify: bool,

    /// Print the edges of every minimum cut found
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<HypergraphInput> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    text.parse()
}

fn run(cli: Cli) -> Result<()> {
    let time_budget = Duration::try_from_secs_f64(cli.seconds).map_err(|_| {
        Error::InvalidInput(format!("invalid time budget: {} seconds", cli.seconds))
    })?;

    let mut config = MinCutConfig::default()
        .with_time_budget(time_budget)
        .with_threads(cli.threads);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(trials) = cli.trials {
        config = config.with_max_trials(trials);
    }

    let input = read_input(cli.input.as_ref())?;
    info!(
        "read hypergraph with {} vertices and {} edges",
        input.vertices,
        input.edges.len()
    );

    let report = HypergraphMinCut::new(config).run(&input)?;
    info!("{} trials in {:?}", report.trials, report.elapsed);
    println!("{}", report);

    if cli.verbose {
        for edges in report.witnesses.values() {
            let line: Vec<String> = edges.iter().map(|e| e.to_string()).collect();
            println!("cut: {}", line.join(" "));
        }
    }

    if cli.verify {
        let exact = exact_min_cut(&input)?;
        if exact.min_cut == report.min_cut && exact.distinct_cuts == report.distinct_cuts {
            eprintln!("verified: {} {}", exact.min_cut, exact.distinct_cuts);
        } else {
            warn!(
                "randomized result {} differs from exact {} {}",
                report, exact.min_cut, exact.distinct_cuts
            );
            eprintln!("mismatch: exact {} {}", exact.min_cut, exact.distinct_cuts);
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
