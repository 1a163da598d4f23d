use derive_more::{Display, Error};
use miette::Diagnostic;
use webdist_lockfile::{LoadLockfileError, Lockfile};
use webdist_materializer::{
    BuildConfig, DependencyLocator, DryRunReport, Materialize, MaterializeError, MaterializeReport,
};
use webdist_package_manifest::{PackageManifest, PackageManifestError};
use webdist_resolver::{resolve, ResolveError};

/// Error type of [`BuildProject`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum BuildProjectError {
    #[diagnostic(transparent)]
    LoadLockfile(#[error(source)] LoadLockfileError),

    #[diagnostic(transparent)]
    Resolve(#[error(source)] ResolveError),

    #[diagnostic(transparent)]
    LoadManifest(#[error(source)] PackageManifestError),

    #[diagnostic(transparent)]
    Materialize(#[error(source)] MaterializeError),
}

/// Result of a successful [`BuildProject`].
#[derive(Debug)]
pub enum BuildOutcome {
    Built(MaterializeReport),
    DryRun(DryRunReport),
}

/// This subroutine does everything `webdist` is supposed to do.
///
/// **Brief overview:**
/// * Load `package-lock.json` and resolve an identifier for every non-dev dependency.
/// * Load `package.json` to find the output directory of the project.
/// * Copy the output of every dependency there and write `path-to-module.json`.
#[must_use]
pub struct BuildProject<'a, Locator>
where
    Locator: DependencyLocator + ?Sized,
{
    pub config: &'a BuildConfig,
    pub locator: &'a Locator,
}

impl<'a, Locator> BuildProject<'a, Locator>
where
    Locator: DependencyLocator + ?Sized,
{
    /// Execute the subroutine.
    pub async fn run(self) -> Result<BuildOutcome, BuildProjectError> {
        let BuildProject { config, locator } = self;
        let project_root = config.project_root();

        tracing::info!(target: "webdist::build", ?project_root, "Start build");

        let lockfile =
            Lockfile::load_from_dir(project_root).map_err(BuildProjectError::LoadLockfile)?;
        let resolution =
            resolve(lockfile.dependency_records()).map_err(BuildProjectError::Resolve)?;

        let output_dir = PackageManifest::load_from_dir(project_root)
            .and_then(|manifest| manifest.distributable_dir())
            .map_err(BuildProjectError::LoadManifest)?;
        tracing::debug!(target: "webdist::build", ?output_dir, "Found the output directory");

        let materialize =
            Materialize { config, locator, resolution: &resolution, output_dir: &output_dir };

        let outcome = if config.dry_run {
            materialize.dry_run().map(BuildOutcome::DryRun)
        } else {
            materialize.run().await.map(BuildOutcome::Built)
        }
        .map_err(BuildProjectError::Materialize)?;

        tracing::info!(target: "webdist::build", "Complete build");
        Ok(outcome)
    }
}
