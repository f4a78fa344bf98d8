//! Lazybook - Benchmark Entry Point
//!
//! Generates a seeded workload, times every operation of the selected book at
//! each requested size, and writes the results as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::info;

use lazybook::harness::{save_csv, Benchmark, DEFAULT_SIZES};
use lazybook::workload::OrderGenerator;
use lazybook::BookKind;

#[derive(Debug, Parser)]
#[command(name = "lazybook", about = "Order book benchmark: naive vs optimized")]
struct Args {
    /// Book implementation: naive or optimized
    #[arg(long, default_value = "naive")]
    book: BookKind,

    /// Also time lookup, price-level and best-price queries
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    include_queries: bool,

    /// Operation counts, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    sizes: Vec<usize>,

    /// Workload seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// CSV output path [default: benchmark_results_<book>.csv]
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("benchmark_results_{}.csv", args.book)));

    let largest = args.sizes.iter().copied().max().unwrap_or(0);
    info!(book = %args.book, orders = largest, seed = args.seed, "generating workload");
    let orders = OrderGenerator::new()
        .gen_book_orders(largest, args.seed)
        .context("failed to generate workload")?;

    let benchmark = Benchmark::new(args.book, args.include_queries, args.sizes);
    let records = benchmark
        .run(&orders)
        .with_context(|| format!("benchmark of {} book failed", args.book))?;

    save_csv(&records, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), records = records.len(), "saved results");

    Ok(())
}
