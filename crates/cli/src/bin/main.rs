use miette::{Context, IntoDiagnostic};
use std::time::Duration;
use webdist_diagnostics::Result;

/// How long to wait for copy tasks that outlived their deadline before exiting.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

pub fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
        .wrap_err("create the async runtime")?;
    let result = runtime.block_on(webdist_cli::run_cli());
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}
