use crate::Lockfile;
use derive_more::{Display, Error};
use pipe_trait::Pipe;
use std::path::{Path, PathBuf};
use webdist_diagnostics::miette::{self, Diagnostic};
use webdist_fs::{read_text_file, ReadTextFileError};

/// Error when reading lockfile from the filesystem.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum LoadLockfileError {
    #[display("No package-lock.json was found at {path:?}")]
    #[diagnostic(
        code(webdist_lockfile::not_found),
        help("Install the dependencies with npm first so that the lockfile is generated.")
    )]
    NotFound {
        path: PathBuf,
        #[error(source)]
        error: ReadTextFileError,
    },

    #[display("Failed to read lockfile content: {_0}")]
    #[diagnostic(code(webdist_lockfile::read_file))]
    ReadFile(#[error(source)] ReadTextFileError),

    #[display("Failed to parse {path:?} as JSON: {error}")]
    #[diagnostic(code(webdist_lockfile::parse_json))]
    ParseJson {
        path: PathBuf,
        #[error(source)]
        error: serde_json::Error,
    },
}

impl Lockfile {
    /// Load `package-lock.json` from the project directory.
    pub fn load_from_dir(project_dir: &Path) -> Result<Self, LoadLockfileError> {
        let path = project_dir.join(Lockfile::FILE_NAME);
        let content = match read_text_file(&path) {
            Ok(content) => content,
            Err(error) if error.is_not_found() => {
                return LoadLockfileError::NotFound { path, error }.pipe(Err)
            }
            Err(error) => return error.pipe(LoadLockfileError::ReadFile).pipe(Err),
        };
        content
            .pipe_as_ref(serde_json::from_str)
            .map_err(|error| LoadLockfileError::ParseJson { path, error })
    }
}
