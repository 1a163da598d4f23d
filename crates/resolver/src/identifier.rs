use derive_more::{AsRef, Display};
use serde::Serialize;
use std::path::{Component, Path};

/// Name of the output directory of a dependency.
///
/// It is the fragment of the version spec (usually a commit hash) when there is one,
/// otherwise the name of the dependency.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, AsRef, Serialize)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Derive the identifier of a dependency from its name and version spec.
    ///
    /// The result is only empty when `name` is empty and `version_spec` has no fragment.
    pub fn derive(name: &str, version_spec: &str) -> Self {
        let fragment = version_spec.rsplit_once('#').map(|(_, fragment)| fragment);
        match fragment {
            Some(fragment) if !fragment.is_empty() => Identifier(fragment.to_string()),
            _ => Identifier(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &'_ str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether joining `text` onto a directory always lands strictly inside that directory.
///
/// Only non-empty relative paths made of normal components qualify: no root, no prefix,
/// no `.` and no `..`.
pub fn is_nested_path(text: &str) -> bool {
    !text.is_empty()
        && Path::new(text).components().all(|component| matches!(component, Component::Normal(_)))
}
