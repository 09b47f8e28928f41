use clap::Parser;
use tracing_subscriber::EnvFilter;

use rowset_bench::{fixtures, mem, BenchmarkRunner, DEFAULT_LIMIT, MAX_LIMIT};

// Install the counting allocator so memory deltas in the report are real.
#[global_allocator]
static ALLOC: mem::CountingAllocator = mem::CountingAllocator;

/// Benchmark host-side vs store-side aggregation strategies for a
/// product/images/reviews join.
#[derive(Parser, Debug)]
#[command(name = "rowset-bench", version)]
struct Cli {
    /// Number of products to fetch (clamped to 1..=2000).
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Unmeasured full passes before the measured runs.
    #[arg(long, default_value_t = 1)]
    warmup: u32,

    /// Seed for the synthetic catalog.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // e.g., RUST_LOG=info
        .init();

    let cli = Cli::parse();

    // Catalog always holds MAX_LIMIT products; --limit picks the page size,
    // so changing it never changes the underlying data.
    let catalog = fixtures::seed_catalog(MAX_LIMIT, cli.seed);
    let runner = BenchmarkRunner::new(catalog)?;
    let report = runner.run(cli.limit, cli.warmup)?;

    print!("{report}");
    Ok(())
}
