use derive_more::{Display, Error};
use miette::Diagnostic;
use pipe_trait::Pipe;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use webdist_fs::{read_text_file, ReadTextFileError};

/// Fields that may name the browser-consumable entry point, in order of preference.
pub const ENTRY_POINT_FIELDS: [&str; 2] = ["main", "browser"];

#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum PackageManifestError {
    #[display("No package.json was found at {path:?}")]
    #[diagnostic(code(webdist_package_manifest::not_found))]
    NotFound {
        path: PathBuf,
        #[error(source)]
        error: ReadTextFileError,
    },

    #[display("Failed to read package.json: {_0}")]
    #[diagnostic(code(webdist_package_manifest::read_file))]
    ReadFile(#[error(source)] ReadTextFileError),

    #[display("Failed to parse {path:?} as JSON: {error}")]
    #[diagnostic(code(webdist_package_manifest::parse_json))]
    ParseJson {
        path: PathBuf,
        #[error(source)]
        error: serde_json::Error,
    },

    #[display("{path:?} declares no entry point")]
    #[diagnostic(
        code(webdist_package_manifest::no_entry_point),
        help("Set \"main\" or \"browser\" to the path of the built entry file.")
    )]
    NoEntryPoint { path: PathBuf },
}

/// Content of the `package.json` files and its path.
#[derive(Debug)]
pub struct PackageManifest {
    path: PathBuf,
    value: Value,
}

impl PackageManifest {
    /// Base file name of the manifest.
    pub const FILE_NAME: &'static str = "package.json";

    /// Load the manifest at `path`.
    pub fn from_path(path: PathBuf) -> Result<PackageManifest, PackageManifestError> {
        let content = match read_text_file(&path) {
            Ok(content) => content,
            Err(error) if error.is_not_found() => {
                return PackageManifestError::NotFound { path, error }.pipe(Err)
            }
            Err(error) => return error.pipe(PackageManifestError::ReadFile).pipe(Err),
        };
        let value = content
            .pipe_as_ref(serde_json::from_str)
            .map_err(|error| PackageManifestError::ParseJson { path: path.clone(), error })?;
        Ok(PackageManifest { path, value })
    }

    /// Load the `package.json` inside `package_dir`.
    pub fn load_from_dir(package_dir: &Path) -> Result<PackageManifest, PackageManifestError> {
        package_dir.join(PackageManifest::FILE_NAME).pipe(PackageManifest::from_path)
    }

    /// Directory that contains the manifest.
    pub fn package_dir(&self) -> &'_ Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The declared entry point: the first non-empty string among `main` and `browser`.
    pub fn entry_point(&self) -> Result<&'_ str, PackageManifestError> {
        ENTRY_POINT_FIELDS
            .iter()
            .flat_map(|field| self.value.get(field))
            .flat_map(Value::as_str)
            .find(|entry| !entry.is_empty())
            .ok_or_else(|| PackageManifestError::NoEntryPoint { path: self.path.clone() })
    }

    /// Directory containing the entry point, resolved against the package directory.
    pub fn distributable_dir(&self) -> Result<PathBuf, PackageManifestError> {
        let entry_point = join_lexically(self.package_dir(), self.entry_point()?);
        entry_point
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(entry_point)
            .pipe(Ok)
    }
}

/// Join `relative` onto `base`, resolving `.` and `..` without touching the filesystem.
fn join_lexically(base: &Path, relative: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::ParentDir => {
                joined.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    joined
}
