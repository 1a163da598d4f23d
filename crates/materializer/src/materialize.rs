use crate::{
    plan_copies, render_manifest, BuildConfig, CopyDependencies, CopyDependencyError, CopyPlan,
    CopyReport, DependencyLocator, WriteManifest, WriteManifestError,
};
use derive_more::{Display, Error};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use webdist_resolver::Resolution;

/// Error type of [`Materialize`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum MaterializeError {
    #[display("Failed to copy {failed} of {total} dependencies")]
    #[diagnostic(code(webdist_materializer::copy_failures))]
    CopyFailures {
        failed: usize,
        total: usize,
        #[related]
        errors: Vec<CopyDependencyError>,
    },

    #[diagnostic(transparent)]
    WriteManifest(#[error(source)] WriteManifestError),
}

/// Summary of a successful [`Materialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub copies: Vec<CopyReport>,
    pub manifest_path: PathBuf,
}

/// What [`Materialize::run`] would do, computed by [`Materialize::dry_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunReport {
    /// Every plan with the directory that would be copied.
    pub copies: Vec<(CopyPlan, PathBuf)>,
    pub manifest_path: PathBuf,
    /// Content that would be written to [`manifest_path`](Self::manifest_path).
    pub manifest: String,
}

/// This subroutine lays out the resolved dependencies for the browser.
///
/// **Brief overview:**
/// * Pick the first dependency of each identifier.
/// * Find its installed root with [`locator`](Self::locator) and read its `package.json`.
/// * Copy the directory of its entry point to `<output dir>/<identifier>`,
///   all identifiers concurrently.
/// * Once every copy succeeded, replace `path-to-module.json` in the project root.
#[must_use]
pub struct Materialize<'a, Locator>
where
    Locator: DependencyLocator + ?Sized,
{
    pub config: &'a BuildConfig,
    pub locator: &'a Locator,
    pub resolution: &'a Resolution,
    /// Directory containing the project's own entry point.
    pub output_dir: &'a Path,
}

impl<'a, Locator> Materialize<'a, Locator>
where
    Locator: DependencyLocator + ?Sized,
{
    /// List what [`run`](Self::run) would copy.
    pub fn plan(&self) -> Vec<CopyPlan> {
        plan_copies(self.resolution, self.locator, self.output_dir)
    }

    /// Read the manifests of the representatives and render `path-to-module.json`
    /// without writing anything.
    pub fn dry_run(&self) -> Result<DryRunReport, MaterializeError> {
        let plans = self.plan();
        let total = plans.len();

        let mut copies = Vec::with_capacity(total);
        let mut errors = Vec::new();
        for plan in plans {
            match plan.source_dir() {
                Ok(source_dir) => copies.push((plan, source_dir)),
                Err(error) => errors.push(error),
            }
        }
        if !errors.is_empty() {
            return Err(MaterializeError::CopyFailures { failed: errors.len(), total, errors });
        }

        let manifest_path = self.config.manifest_path();
        let manifest = render_manifest(&self.resolution.name_to_identifier)
            .map_err(|error| WriteManifestError::Serialize {
                manifest_path: manifest_path.clone(),
                error,
            })
            .map_err(MaterializeError::WriteManifest)?;

        Ok(DryRunReport { copies, manifest_path, manifest })
    }

    /// Execute the subroutine.
    pub async fn run(self) -> Result<MaterializeReport, MaterializeError> {
        let plans = self.plan();
        let Materialize { config, resolution, .. } = self;
        let total = plans.len();

        tracing::info!(target: "webdist::materialize", total, "Start copying");

        let (copies, errors): (Vec<_>, Vec<_>) =
            CopyDependencies { plans, timeout: config.copy_timeout }
                .run()
                .await
                .into_iter()
                .partition(Result::is_ok);
        let copies: Vec<CopyReport> = copies.into_iter().flat_map(Result::ok).collect();
        let errors: Vec<CopyDependencyError> = errors.into_iter().flat_map(Result::err).collect();

        if !errors.is_empty() {
            for error in &errors {
                tracing::error!(
                    target: "webdist::materialize",
                    identifier = %error.identifier(),
                    %error,
                    "Copy failed"
                );
            }
            return Err(MaterializeError::CopyFailures { failed: errors.len(), total, errors });
        }

        tracing::info!(target: "webdist::materialize", total, "Complete copying");

        let manifest_path = config.manifest_path();
        WriteManifest {
            name_to_identifier: &resolution.name_to_identifier,
            manifest_path: &manifest_path,
        }
        .run()
        .map_err(MaterializeError::WriteManifest)?;

        Ok(MaterializeReport { copies, manifest_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeModulesLocator;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;
    use webdist_lockfile::DependencyRecord;
    use webdist_resolver::resolve;
    use webdist_testing_utils::{fixture::write_installed_package, fs::get_all_files};

    fn record<'a>(name: &'a str, version_spec: &'a str) -> DependencyRecord<'a> {
        DependencyRecord { name, version_spec, is_dev: false }
    }

    #[tokio::test]
    async fn copies_representatives_then_writes_manifest() {
        let dir = tempdir().unwrap();
        let config = BuildConfig::new(dir.path().to_path_buf());
        let locator = NodeModulesLocator::new(dir.path());
        let output_dir = dir.path().join("dist");

        write_installed_package(
            locator.modules_dir(),
            "left-pad",
            "index.js",
            &[("index.js", "export default 1"), ("lib/pad.js", "export {}")],
        );
        write_installed_package(
            locator.modules_dir(),
            "foo",
            "dist/foo.js",
            &[("dist/foo.js", "foo"), ("src/foo.ts", "not copied")],
        );
        write_installed_package(
            locator.modules_dir(),
            "foo-extra",
            "dist/extra.js",
            &[("dist/extra.js", "never copied, shares the commit of foo")],
        );

        let resolution = resolve([
            record("left-pad", "1.3.0"),
            record("foo", "git+ssh://x#deadbeef"),
            record("foo-extra", "git+ssh://x#deadbeef"),
        ])
        .unwrap();

        let report = Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: &output_dir,
        }
        .run()
        .await
        .unwrap();

        assert_eq!(report.copies.len(), 2);
        assert_eq!(report.manifest_path, dir.path().join("path-to-module.json"));
        insta::assert_debug_snapshot!(get_all_files(&output_dir), @r###"
        [
            "deadbeef/foo.js",
            "left-pad/index.js",
            "left-pad/lib/pad.js",
            "left-pad/package.json",
        ]
        "###);
        assert_eq!(
            fs::read_to_string(&report.manifest_path).unwrap(),
            concat!(
                "{\n",
                "\t\"left-pad\": \"left-pad\",\n",
                "\t\"foo\": \"deadbeef\",\n",
                "\t\"foo-extra\": \"deadbeef\"\n",
                "}",
            ),
        );
    }

    #[tokio::test]
    async fn copy_failure_skips_manifest() {
        let dir = tempdir().unwrap();
        let config = BuildConfig::new(dir.path().to_path_buf());
        let locator = NodeModulesLocator::new(dir.path());
        let output_dir = dir.path().join("dist");
        fs::write(config.manifest_path(), "{}").unwrap();

        write_installed_package(locator.modules_dir(), "ok", "index.js", &[("index.js", "ok")]);
        let resolution = resolve([record("missing", "1.0.0"), record("ok", "1.0.0")]).unwrap();

        let error = Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: &output_dir,
        }
        .run()
        .await
        .unwrap_err();

        let MaterializeError::CopyFailures { failed, total, errors } = &error else {
            panic!("expected copy failures, got {error:?}");
        };
        assert_eq!((*failed, *total), (1, 2));
        assert_eq!(errors[0].identifier().as_str(), "missing");
        // the other dependency is still attempted
        assert!(output_dir.join("ok/index.js").is_file());
        // the previous manifest is left untouched
        assert_eq!(fs::read_to_string(config.manifest_path()).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_copy_skips_manifest() {
        use webdist_testing_utils::fixture::{make_fifo, write_file};

        let dir = tempdir().unwrap();
        let mut config = BuildConfig::new(dir.path().to_path_buf());
        config.copy_timeout = std::time::Duration::from_millis(500);
        let locator = NodeModulesLocator::new(dir.path());
        let output_dir = dir.path().join("dist");

        write_installed_package(locator.modules_dir(), "ok", "index.js", &[("index.js", "ok")]);
        // reading this manifest blocks until something writes to it
        let stuck_manifest = locator.modules_dir().join("stuck/package.json");
        make_fifo(&stuck_manifest);
        let resolution = resolve([record("stuck", "1.0.0"), record("ok", "1.0.0")]).unwrap();

        let result = Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: &output_dir,
        }
        .run()
        .await;

        // release the abandoned task so that the runtime can shut down
        write_file(&stuck_manifest, "{}");

        let Err(MaterializeError::CopyFailures { failed: 1, total: 2, errors }) = &result else {
            panic!("expected one copy failure, got {result:?}");
        };
        assert!(matches!(errors[0], CopyDependencyError::Timeout { .. }), "{:?}", errors[0]);
        assert!(output_dir.join("ok/index.js").is_file());
        assert!(!config.manifest_path().exists());
    }

    #[tokio::test]
    async fn custom_locator() {
        let dir = tempdir().unwrap();
        let vendor_dir = dir.path().join("vendor");
        let config = BuildConfig::new(dir.path().to_path_buf());
        let output_dir = dir.path().join("public");
        write_installed_package(&vendor_dir, "lib", "out/lib.js", &[("out/lib.js", "lib")]);

        let locator = |name: &str| vendor_dir.join(name);
        let resolution = resolve([record("lib", "git+https://host/lib.git#c0ffee")]).unwrap();
        Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: &output_dir,
        }
        .run()
        .await
        .unwrap();

        assert_eq!(fs::read_to_string(output_dir.join("c0ffee/lib.js")).unwrap(), "lib");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = BuildConfig::new(dir.path().to_path_buf());
        let locator = NodeModulesLocator::new(dir.path());
        let output_dir = dir.path().join("dist");
        write_installed_package(locator.modules_dir(), "a", "lib/a.js", &[("lib/a.js", "a")]);
        let resolution = resolve([record("a", "git+ssh://x#f00d")]).unwrap();

        let report = Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: &output_dir,
        }
        .dry_run()
        .unwrap();

        let (plan, source_dir) = &report.copies[0];
        assert_eq!(plan.target_dir, output_dir.join("f00d"));
        assert_eq!(source_dir, &locator.modules_dir().join("a/lib"));
        assert_eq!(report.manifest, "{\n\t\"a\": \"f00d\"\n}");
        assert!(!output_dir.exists());
        assert!(!config.manifest_path().exists());
    }

    #[test]
    fn dry_run_reports_missing_dependencies() {
        let dir = tempdir().unwrap();
        let config = BuildConfig::new(dir.path().to_path_buf());
        let locator = NodeModulesLocator::new(dir.path());
        let resolution = resolve([record("a", "1.0.0"), record("b", "1.0.0")]).unwrap();

        let error = Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: &dir.path().join("dist"),
        }
        .dry_run()
        .unwrap_err();

        assert!(matches!(error, MaterializeError::CopyFailures { failed: 2, total: 2, .. }));
    }

    #[test]
    fn plan_does_not_touch_the_filesystem() {
        let config = BuildConfig::new(PathBuf::from("/nonexistent"));
        let locator = NodeModulesLocator::new(config.project_root());
        let resolution = resolve([record("a", "1.0.0")]).unwrap();
        let plans = Materialize {
            config: &config,
            locator: &locator,
            resolution: &resolution,
            output_dir: Path::new("/nonexistent/dist"),
        }
        .plan();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].target_dir, Path::new("/nonexistent/dist/a"));
    }
}
