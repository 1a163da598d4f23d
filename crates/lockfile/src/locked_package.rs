use serde::Deserialize;

const MODULES_DIR_PREFIX: &str = "node_modules/";

/// Entry of the `packages` section of `package-lock.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedPackage {
    pub version: Option<String>,
    pub resolved: Option<String>,
    #[serde(default)]
    pub dev: bool,
}

impl LockedPackage {
    /// Version spec equivalent to the `version` field of the `dependencies` section.
    ///
    /// Source-control dependencies keep their commit in `resolved`, so `resolved` is
    /// preferred when it has a fragment.
    pub fn version_spec(&self) -> &str {
        match (&self.resolved, &self.version) {
            (Some(resolved), _) if resolved.contains('#') => resolved.as_str(),
            (_, Some(version)) => version.as_str(),
            (Some(resolved), None) => resolved.as_str(),
            (None, None) => "",
        }
    }
}

/// Extract the package name from a top-level install path such as `node_modules/@scope/name`.
///
/// Returns `None` for the root project (`""`) and for nested installs.
pub(crate) fn top_level_name(install_path: &str) -> Option<&str> {
    let name = install_path.strip_prefix(MODULES_DIR_PREFIX)?;
    let nested = name.contains(&format!("/{MODULES_DIR_PREFIX}"));
    (!name.is_empty() && !nested).then_some(name)
}
