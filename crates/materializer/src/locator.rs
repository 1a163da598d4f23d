use std::path::{Path, PathBuf};

/// Find where a dependency is installed.
pub trait DependencyLocator {
    /// Root directory of the installed dependency, the one containing its `package.json`.
    fn locate(&self, name: &str) -> PathBuf;
}

/// Dependencies installed by npm at `<project root>/node_modules/<name>`.
#[derive(Debug, Clone)]
pub struct NodeModulesLocator {
    modules_dir: PathBuf,
}

impl NodeModulesLocator {
    pub const MODULES_DIR_NAME: &'static str = "node_modules";

    pub fn new(project_root: &Path) -> Self {
        NodeModulesLocator { modules_dir: project_root.join(Self::MODULES_DIR_NAME) }
    }

    pub fn modules_dir(&self) -> &'_ Path {
        &self.modules_dir
    }
}

impl DependencyLocator for NodeModulesLocator {
    fn locate(&self, name: &str) -> PathBuf {
        self.modules_dir.join(name)
    }
}

impl<Locate> DependencyLocator for Locate
where
    Locate: Fn(&str) -> PathBuf,
{
    fn locate(&self, name: &str) -> PathBuf {
        self(name)
    }
}
