use serde::Deserialize;

/// Entry of the `dependencies` section of `package-lock.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedDependency {
    /// Either a version (`1.3.0`) or a source URL which may carry a fragment
    /// (`git+ssh://git@github.com/org/repo.git#<commit>`).
    pub version: String,
    #[serde(default)]
    pub dev: bool,
}
