//! CLI command handlers

pub mod commands;

pub use commands::{run, RunOptions};

use tracing_subscriber::EnvFilter;

/// Exit status of a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status when any error stopped the run
pub const EXIT_FAILURE: u8 = 100;

/// Install the stdout tracing subscriber (`RUST_LOG` wins over `verbose`)
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose { "xltxt=debug" } else { "xltxt=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}
