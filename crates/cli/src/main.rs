//! Memory hierarchy timing model CLI.
//!
//! This binary drives a [`MemorySystem`] from a text trace. It provides:
//! 1. **Trace replay:** Feed every access of a trace through the hierarchy and report statistics.
//! 2. **Configuration dump:** Print the default configuration as JSON, as a starting point for edits.
//!
//! Logging is controlled through `RUST_LOG` (e.g. `RUST_LOG=memsys_core=debug`).

mod replay;
mod report;
mod trace;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memsys_core::{Config, MemorySystem};

use crate::report::REPORT_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Multi-level memory hierarchy timing model",
    long_about = "Replay a memory access trace through a configurable cache hierarchy.\n\nTrace lines have the form `<core> <I|L|S> <address>` (`R` and `W` are accepted for L and S); `#` starts a comment.\n\nExamples:\n  memsim run --trace traces/mcf.txt\n  memsim run --trace traces/mix.txt --config percore_dynamic.json --json\n  memsim config > default.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print statistics.
    Run {
        /// Trace file to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration file (defaults to the built-in hierarchy).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print statistics as JSON instead of a text report.
        #[arg(long)]
        json: bool,

        /// Report sections to print (summary, accesses, caches, dram, partition).
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            trace,
            config,
            json,
            sections,
        } => cmd_run(&trace, config.as_deref(), json, &sections),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&Config::default())?);
            Ok(())
        }
    }
}

/// Loads the configuration file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    Config::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Replays `trace_path` through a freshly built memory system.
///
/// See [`replay::replay`] for how the clock advances.
fn cmd_run(trace_path: &Path, config: Option<&Path>, json: bool, sections: &[String]) -> Result<()> {
    if let Some(unknown) = sections
        .iter()
        .find(|s| !REPORT_SECTIONS.contains(&s.as_str()))
    {
        bail!(
            "unknown report section {unknown:?} (expected one of {})",
            REPORT_SECTIONS.join(", ")
        );
    }

    let config = load_config(config)?;
    let mut memsys = MemorySystem::new(&config)?;

    let file = File::open(trace_path)
        .with_context(|| format!("failed to open trace {}", trace_path.display()))?;

    tracing::info!(trace = %trace_path.display(), "replaying trace");
    let start = Instant::now();
    let records = trace::records(BufReader::new(file))
        .map(|record| record.with_context(|| format!("in trace {}", trace_path.display())));
    let cycle = replay::replay(&mut memsys, records)?;
    let elapsed = start.elapsed();

    let stats = memsys.stats();
    tracing::info!(
        accesses = stats.accesses.total_count(),
        cycles = cycle,
        "trace complete"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        report::print_sections(&stats, cycle, elapsed, sections);
    }
    Ok(())
}
