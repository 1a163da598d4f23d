use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Error type of [`replace_file`].
#[derive(Debug, Display, Error, Diagnostic)]
pub enum ReplaceFileError {
    #[display("Failed to remove the existing file at {file_path:?}: {error}")]
    #[diagnostic(code(webdist_fs::remove_file))]
    RemoveFile {
        file_path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to write to file at {file_path:?}: {error}")]
    #[diagnostic(code(webdist_fs::write_file))]
    WriteFile {
        file_path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
}

/// Write `content` to `file_path`, removing whatever file was there before.
///
/// Returns whether a previous file was removed.
pub fn replace_file(file_path: &Path, content: &[u8]) -> Result<bool, ReplaceFileError> {
    let removed = match fs::remove_file(file_path) {
        Ok(()) => true,
        Err(error) if error.kind() == io::ErrorKind::NotFound => false,
        Err(error) => {
            return Err(ReplaceFileError::RemoveFile { file_path: file_path.to_path_buf(), error })
        }
    };

    fs::write(file_path, content).map_err(|error| ReplaceFileError::WriteFile {
        file_path: file_path.to_path_buf(),
        error,
    })?;

    Ok(removed)
}
