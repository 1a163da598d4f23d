use crate::{BuildOutcome, BuildProject};
use clap::Parser;
use miette::Context;
use pipe_trait::Pipe;
use std::{path::PathBuf, time::Duration};
use webdist_materializer::{BuildConfig, DryRunReport, MaterializeReport, NodeModulesLocator};

/// Copy the distributable output of npm dependencies next to the project's own output.
#[derive(Debug, Parser)]
#[clap(name = "webdist")]
#[clap(bin_name = "webdist")]
#[clap(version)]
#[clap(about = "Copy the distributable output of npm dependencies for the browser")]
pub struct CliArgs {
    /// Set working directory.
    #[clap(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,

    /// Deadline in seconds of the copy of a single dependency.
    #[clap(
        long,
        value_name = "SECONDS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub copy_timeout: u64,

    /// Print what would be copied and written without touching the filesystem.
    #[clap(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Settings derived from the arguments.
    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            project_root: self.dir.clone(),
            copy_timeout: self.copy_timeout.pipe(Duration::from_secs),
            dry_run: self.dry_run,
        }
    }

    /// Execute the command
    pub async fn run(self) -> miette::Result<()> {
        let config = self.config();
        let locator = NodeModulesLocator::new(config.project_root());

        let outcome = BuildProject { config: &config, locator: &locator }
            .run()
            .await
            .wrap_err("build the browser distribution")?;

        match outcome {
            BuildOutcome::Built(report) => print_built(&report),
            BuildOutcome::DryRun(report) => print_dry_run(&report),
        }

        Ok(())
    }
}

fn print_built(report: &MaterializeReport) {
    for copy in &report.copies {
        println!("{} → {} ({} files)", copy.identifier, copy.to.display(), copy.file_count);
    }
    println!("Wrote {}", report.manifest_path.display());
}

fn print_dry_run(report: &DryRunReport) {
    for (plan, source_dir) in &report.copies {
        println!(
            "{} ({}): {} → {}",
            plan.identifier,
            plan.representative,
            source_dir.display(),
            plan.target_dir.display(),
        );
    }
    println!("Would write {}:", report.manifest_path.display());
    println!("{}", report.manifest);
}
