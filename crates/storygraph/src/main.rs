//! Storygraph CLI binary.

use anyhow::Result;
use storygraph::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Entry point.
///
/// Commands run one store operation at a time and block on file I/O, so a
/// current-thread runtime is all the concurrency this binary needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Filtering is driven by RUST_LOG when set, e.g.
    // RUST_LOG=storygraph=debug,storygraph_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storygraph=info,storygraph_jsonl=info")),
        )
        .with_target(false)
        .init();

    tracing::debug!("Starting storygraph CLI");

    Cli::parse_args().execute().await
}
