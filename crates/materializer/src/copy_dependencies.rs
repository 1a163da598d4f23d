use crate::CopyPlan;
use derive_more::{Display, Error};
use futures_util::future;
use miette::Diagnostic;
use pipe_trait::Pipe;
use std::{path::PathBuf, time::Duration};
use tokio::task::{self, JoinError};
use webdist_fs::{copy_dir_recursive, CopyDirError};
use webdist_package_manifest::PackageManifestError;
use webdist_resolver::Identifier;

/// Error of copying the output of a single dependency.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum CopyDependencyError {
    #[display("Can't find the output of {name:?} (identifier {identifier}): {error}")]
    #[diagnostic(code(webdist_materializer::load_manifest))]
    LoadManifest {
        identifier: Identifier,
        name: String,
        #[error(source)]
        error: PackageManifestError,
    },

    #[display("Can't copy {from:?} to {to:?}: {error}")]
    #[diagnostic(code(webdist_materializer::copy))]
    Copy {
        identifier: Identifier,
        from: PathBuf,
        to: PathBuf,
        #[error(source)]
        error: CopyDirError,
    },

    #[display("Copying into {to:?} did not finish within {timeout:?}")]
    #[diagnostic(
        code(webdist_materializer::timeout),
        help("Raise the deadline with --copy-timeout if the dependency is very large.")
    )]
    Timeout { identifier: Identifier, to: PathBuf, timeout: Duration },

    #[display("The task copying into {to:?} stopped unexpectedly: {error}")]
    #[diagnostic(code(webdist_materializer::task_failed))]
    TaskFailed {
        identifier: Identifier,
        to: PathBuf,
        #[error(source)]
        error: JoinError,
    },
}

impl CopyDependencyError {
    /// Identifier whose copy failed.
    pub fn identifier(&self) -> &'_ Identifier {
        match self {
            CopyDependencyError::LoadManifest { identifier, .. }
            | CopyDependencyError::Copy { identifier, .. }
            | CopyDependencyError::Timeout { identifier, .. }
            | CopyDependencyError::TaskFailed { identifier, .. } => identifier,
        }
    }
}

/// Outcome of a successful copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub identifier: Identifier,
    pub from: PathBuf,
    pub to: PathBuf,
    pub file_count: usize,
}

impl CopyPlan {
    /// Locate the source directory and copy it to [`target_dir`](Self::target_dir).
    ///
    /// This function is blocking.
    pub fn execute(self) -> Result<CopyReport, CopyDependencyError> {
        let from = self.source_dir()?;
        let CopyPlan { identifier, target_dir: to, .. } = self;
        tracing::info!(target: "webdist::copy", %identifier, ?from, ?to, "Copy dependency");
        match copy_dir_recursive(&from, &to) {
            Ok(file_count) => Ok(CopyReport { identifier, from, to, file_count }),
            Err(error) => Err(CopyDependencyError::Copy { identifier, from, to, error }),
        }
    }
}

/// This subroutine copies the output of every planned dependency concurrently.
///
/// One blocking task is spawned per plan. All tasks are awaited before returning,
/// a failing task does not stop the others.
#[must_use]
pub struct CopyDependencies {
    pub plans: Vec<CopyPlan>,
    pub timeout: Duration,
}

impl CopyDependencies {
    /// Execute the subroutine.
    ///
    /// Returns one outcome per plan, in plan order.
    pub async fn run(self) -> Vec<Result<CopyReport, CopyDependencyError>> {
        let CopyDependencies { plans, timeout } = self;

        plans
            .into_iter()
            .map(|plan| async move {
                let identifier = plan.identifier.clone();
                let to = plan.target_dir.clone();
                let handle = task::spawn_blocking(move || plan.execute());
                match tokio::time::timeout(timeout, handle).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(error)) => {
                        Err(CopyDependencyError::TaskFailed { identifier, to, error })
                    }
                    Err(_) => Err(CopyDependencyError::Timeout { identifier, to, timeout }),
                }
            })
            .pipe(future::join_all)
            .await
    }
}
