mod dependency_record;
mod load_lockfile;
mod locked_dependency;
mod locked_package;
mod ordered_entries;

pub use dependency_record::DependencyRecord;
pub use load_lockfile::LoadLockfileError;
pub use locked_dependency::LockedDependency;
pub use locked_package::LockedPackage;
pub use ordered_entries::OrderedEntries;

use serde::Deserialize;

/// Content of a `package-lock.json` file.
///
/// Only the fields needed to lay out dependencies for the browser are modeled,
/// everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    pub lockfile_version: Option<u32>,
    /// Top-level dependencies (lockfile version 1 and 2).
    pub dependencies: Option<OrderedEntries<LockedDependency>>,
    /// Install locations (lockfile version 2 and 3).
    pub packages: Option<OrderedEntries<LockedPackage>>,
}

impl Lockfile {
    /// Base file name of the lockfile.
    pub const FILE_NAME: &'static str = "package-lock.json";

    /// List the top-level dependencies in lockfile order.
    ///
    /// The `dependencies` section is used when present. Otherwise top-level entries of
    /// the `packages` section (`node_modules/<name>`) are used.
    /// Duplicate names are kept so that callers can reject them.
    pub fn dependency_records(&self) -> Vec<DependencyRecord<'_>> {
        if let Some(dependencies) = &self.dependencies {
            return dependencies
                .iter()
                .map(|(name, dependency)| DependencyRecord {
                    name,
                    version_spec: &dependency.version,
                    is_dev: dependency.dev,
                })
                .collect();
        }

        self.packages
            .iter()
            .flat_map(|packages| packages.iter())
            .filter_map(|(install_path, package)| {
                let name = locked_package::top_level_name(install_path)?;
                Some(DependencyRecord {
                    name,
                    version_spec: package.version_spec(),
                    is_dev: package.dev,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use text_block_macros::text_block;

    fn records(lockfile: &Lockfile) -> Vec<(&str, &str, bool)> {
        lockfile
            .dependency_records()
            .into_iter()
            .map(|record| (record.name, record.version_spec, record.is_dev))
            .collect()
    }

    #[test]
    fn dependencies_section_in_order() {
        let lockfile: Lockfile = serde_json::from_str(text_block! {
            r#"{"#
            r#"  "lockfileVersion": 1,"#
            r#"  "dependencies": {"#
            r#"    "zeta": { "version": "1.0.0", "resolved": "https://example.com/zeta.tgz" },"#
            r#"    "alpha": { "version": "git+ssh://git@host/org/alpha.git#abc123" },"#
            r#"    "jest": { "version": "29.0.0", "dev": true }"#
            r#"  }"#
            r#"}"#
        })
        .unwrap();

        assert_eq!(lockfile.lockfile_version, Some(1));
        assert_eq!(
            records(&lockfile),
            [
                ("zeta", "1.0.0", false),
                ("alpha", "git+ssh://git@host/org/alpha.git#abc123", false),
                ("jest", "29.0.0", true),
            ],
        );
    }

    #[test]
    fn duplicate_names_are_kept() {
        let lockfile: Lockfile = serde_json::from_str(
            r#"{ "dependencies": { "a": { "version": "1.0.0" }, "a": { "version": "2.0.0" } } }"#,
        )
        .unwrap();
        assert_eq!(records(&lockfile), [("a", "1.0.0", false), ("a", "2.0.0", false)]);
    }

    #[test]
    fn packages_section_is_the_fallback() {
        let lockfile: Lockfile = serde_json::from_str(text_block! {
            r#"{"#
            r#"  "lockfileVersion": 3,"#
            r#"  "packages": {"#
            r#"    "": { "name": "app", "version": "0.0.0" },"#
            r#"    "node_modules/channel": {"#
            r#"      "version": "1.0.0","#
            r#"      "resolved": "git+ssh://git@github.com/org/channel.git#d4fa4734""#
            r#"    },"#
            r#"    "node_modules/@scope/pkg": { "version": "2.0.0" },"#
            r#"    "node_modules/@scope/pkg/node_modules/nested": { "version": "3.0.0" },"#
            r#"    "node_modules/typescript": { "version": "5.0.0", "dev": true }"#
            r#"  }"#
            r#"}"#
        })
        .unwrap();

        assert_eq!(
            records(&lockfile),
            [
                ("channel", "git+ssh://git@github.com/org/channel.git#d4fa4734", false),
                ("@scope/pkg", "2.0.0", false),
                ("typescript", "5.0.0", true),
            ],
        );
    }

    #[test]
    fn dependencies_section_wins_over_packages() {
        let lockfile: Lockfile = serde_json::from_str(
            r#"{
                "dependencies": { "a": { "version": "1.0.0" } },
                "packages": { "node_modules/b": { "version": "1.0.0" } }
            }"#,
        )
        .unwrap();
        assert_eq!(records(&lockfile), [("a", "1.0.0", false)]);
    }

    #[test]
    fn no_dependencies_at_all() {
        let lockfile: Lockfile = serde_json::from_str(r#"{ "name": "app" }"#).unwrap();
        assert!(records(&lockfile).is_empty());
    }
}
