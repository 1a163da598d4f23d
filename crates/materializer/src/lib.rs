mod config;
mod copy_dependencies;
mod copy_plan;
mod locator;
mod materialize;
mod write_manifest;

pub use config::BuildConfig;
pub use copy_dependencies::{CopyDependencies, CopyDependencyError, CopyReport};
pub use copy_plan::{plan_copies, CopyPlan};
pub use locator::{DependencyLocator, NodeModulesLocator};
pub use materialize::{DryRunReport, Materialize, MaterializeError, MaterializeReport};
pub use write_manifest::{render_manifest, WriteManifest, WriteManifestError};
