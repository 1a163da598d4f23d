/// A top-level dependency as recorded in the lockfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRecord<'a> {
    pub name: &'a str,
    /// Version or source URL, possibly with a `#fragment`.
    pub version_spec: &'a str,
    pub is_dev: bool,
}
