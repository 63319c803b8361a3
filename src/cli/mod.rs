//! Command line interface.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command};
pub use commands::{execute_command, load_effective_config};
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(args.verbose);
    execute_command(args).await
}

/// `RUST_LOG` wins; otherwise `--verbose` selects `debug` over `info`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}
