use derive_more::{Display, Error};
use miette::Diagnostic;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use webdist_fs::{replace_file, ReplaceFileError};
use webdist_resolver::NameToIdentifier;

/// Error type of [`WriteManifest`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum WriteManifestError {
    #[display("Can't serialize {manifest_path:?}: {error}")]
    #[diagnostic(code(webdist_materializer::serialize_manifest))]
    Serialize {
        manifest_path: PathBuf,
        #[error(source)]
        error: serde_json::Error,
    },

    #[display("Can't create {manifest_path:?}: {error}")]
    #[diagnostic(code(webdist_materializer::write_manifest))]
    Write {
        manifest_path: PathBuf,
        #[error(source)]
        error: ReplaceFileError,
    },
}

/// Serialize the name-to-identifier map as a tab-indented JSON object in insertion order.
pub fn render_manifest(name_to_identifier: &NameToIdentifier) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    name_to_identifier.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer).expect("serde_json only emits UTF-8"))
}

/// This subroutine writes `path-to-module.json`, replacing any previous version.
#[must_use]
pub struct WriteManifest<'a> {
    pub name_to_identifier: &'a NameToIdentifier,
    pub manifest_path: &'a Path,
}

impl<'a> WriteManifest<'a> {
    /// Execute the subroutine.
    pub fn run(self) -> Result<(), WriteManifestError> {
        let WriteManifest { name_to_identifier, manifest_path } = self;

        let content = render_manifest(name_to_identifier).map_err(|error| {
            WriteManifestError::Serialize { manifest_path: manifest_path.to_path_buf(), error }
        })?;

        let replaced = replace_file(manifest_path, content.as_bytes()).map_err(|error| {
            WriteManifestError::Write { manifest_path: manifest_path.to_path_buf(), error }
        })?;

        tracing::info!(
            target: "webdist::manifest",
            ?manifest_path,
            replaced,
            entries = name_to_identifier.len(),
            "Wrote manifest"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;
    use webdist_lockfile::DependencyRecord;
    use webdist_resolver::resolve;

    fn name_to_identifier() -> NameToIdentifier {
        let record = |name, version_spec| DependencyRecord { name, version_spec, is_dev: false };
        resolve([record("left-pad", "1.3.0"), record("foo", "git+ssh://x#deadbeef")])
            .unwrap()
            .name_to_identifier
    }

    #[test]
    fn tab_indented_in_insertion_order() {
        let content = render_manifest(&name_to_identifier()).unwrap();
        assert_eq!(content, "{\n\t\"left-pad\": \"left-pad\",\n\t\"foo\": \"deadbeef\"\n}");
    }

    #[test]
    fn empty_map() {
        assert_eq!(render_manifest(&NameToIdentifier::default()).unwrap(), "{}");
    }

    #[test]
    fn replaces_stale_manifest() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join("path-to-module.json");
        fs::write(&manifest_path, "{\n\t\"stale\": \"entry\",\n\t\"other\": \"entry\"\n}").unwrap();

        let name_to_identifier = name_to_identifier();
        WriteManifest { name_to_identifier: &name_to_identifier, manifest_path: &manifest_path }
            .run()
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({ "left-pad": "left-pad", "foo": "deadbeef" }));
    }

    #[test]
    fn write_failure_is_an_error() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join("missing-dir/path-to-module.json");
        let name_to_identifier = name_to_identifier();
        let error = WriteManifest {
            name_to_identifier: &name_to_identifier,
            manifest_path: &manifest_path,
        }
        .run()
        .unwrap_err();
        assert!(matches!(error, WriteManifestError::Write { .. }));
        assert!(error.to_string().contains("path-to-module.json"));
    }
}
