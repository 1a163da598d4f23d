use crate::{CopyDependencyError, DependencyLocator};
use std::path::{Path, PathBuf};
use webdist_package_manifest::PackageManifest;
use webdist_resolver::{Identifier, Resolution};

/// What to copy for a single identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    pub identifier: Identifier,
    /// The dependency whose output is copied.
    pub representative: String,
    /// Installed root of [`representative`](Self::representative).
    pub package_dir: PathBuf,
    /// `<output dir>/<identifier>`.
    pub target_dir: PathBuf,
}

impl CopyPlan {
    /// Read the representative's `package.json` to find its distributable output directory.
    pub fn source_dir(&self) -> Result<PathBuf, CopyDependencyError> {
        PackageManifest::load_from_dir(&self.package_dir)
            .and_then(|manifest| manifest.distributable_dir())
            .map_err(|error| CopyDependencyError::LoadManifest {
                identifier: self.identifier.clone(),
                name: self.representative.clone(),
                error,
            })
    }
}

/// List one [`CopyPlan`] per distinct identifier, in lockfile order.
///
/// Nothing is read from the filesystem.
pub fn plan_copies<Locator>(
    resolution: &Resolution,
    locator: &Locator,
    output_dir: &Path,
) -> Vec<CopyPlan>
where
    Locator: DependencyLocator + ?Sized,
{
    resolution
        .representatives()
        .map(|(identifier, representative)| CopyPlan {
            identifier: identifier.clone(),
            representative: representative.to_string(),
            package_dir: locator.locate(representative),
            target_dir: output_dir.join(identifier.as_str()),
        })
        .collect()
}
