mod build_project;
mod cli_args;

pub use build_project::{BuildOutcome, BuildProject, BuildProjectError};
pub use cli_args::CliArgs;

use clap::Parser;
use webdist_diagnostics::enable_tracing_by_env;

pub async fn run_cli() -> miette::Result<()> {
    enable_tracing_by_env();
    CliArgs::parse().run().await
}
