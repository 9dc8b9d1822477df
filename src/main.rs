//! Raven CLI - Command-line tool for Raven engine XMLB files.
//!
//! This is the main entry point for the Raven command-line application.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};

use raven::batch;
use raven::prelude::*;

/// Raven - compile JSON/XML to XMLB and decompile XMLB back to text
#[derive(Parser)]
#[command(name = "raven")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file or glob pattern (e.g. "json/*.json")
    input: String,

    /// Output path; `*` is replaced by each input's file stem
    /// (e.g. "data/*.xmlb")
    output: String,

    /// Decompile XMLB to text instead of compiling text to XMLB
    #[arg(short, long)]
    decompile: bool,

    /// Write compact text without indentation
    #[arg(long)]
    no_indent: bool,

    /// Number of worker threads for batches (1 converts sequentially)
    #[arg(short, long, env = "RAVEN_JOBS")]
    jobs: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let direction = if cli.decompile {
        Direction::Decompile
    } else {
        Direction::Compile
    };
    let options = ConvertOptions {
        layout: if cli.no_indent {
            Layout::Compact
        } else {
            Layout::Pretty
        },
    };

    let jobs = batch::plan(&cli.input, &cli.output)?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = cli.jobs {
        pool = pool.num_threads(threads);
    }
    let pool = pool.build().context("Failed to start worker threads")?;

    let pb = if jobs.len() > 1 {
        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let start = Instant::now();
    let report = pool.install(|| {
        batch::run(&jobs, direction, &options, |job, result| {
            if result.is_ok() {
                info!("{} -> {}", job.input.display(), job.output.display());
            }
            pb.inc(1);
        })
    });
    pb.finish_and_clear();

    if jobs.len() > 1 {
        println!(
            "Converted {}/{} files in {:?}",
            report.converted,
            report.total(),
            start.elapsed()
        );
    }

    let total = report.total();
    let mut failures = report.failures;
    if total == 1 {
        if let Some(e) = failures.pop() {
            return Err(e.into());
        }
    }
    for e in &failures {
        eprintln!("Error: {}", e);
    }
    if !failures.is_empty() {
        anyhow::bail!("{} of {} files failed", failures.len(), total);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}
