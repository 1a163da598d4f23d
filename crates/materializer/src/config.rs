use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Settings of a single build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory containing `package.json`, `package-lock.json` and `node_modules`.
    pub project_root: PathBuf,
    /// Deadline of the copy of a single dependency.
    pub copy_timeout: Duration,
    /// Compute and print what would be done without writing anything.
    pub dry_run: bool,
}

impl BuildConfig {
    /// Base file name of the name-to-identifier manifest.
    pub const MANIFEST_FILE_NAME: &'static str = "path-to-module.json";

    /// Default value of [`copy_timeout`](Self::copy_timeout).
    pub const DEFAULT_COPY_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(project_root: PathBuf) -> Self {
        BuildConfig { project_root, copy_timeout: Self::DEFAULT_COPY_TIMEOUT, dry_run: false }
    }

    /// Location of `path-to-module.json`.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(Self::MANIFEST_FILE_NAME)
    }

    pub fn project_root(&self) -> &'_ Path {
        &self.project_root
    }
}
