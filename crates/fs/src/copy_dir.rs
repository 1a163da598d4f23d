use derive_more::{Display, Error};
use miette::Diagnostic;
use pipe_trait::Pipe;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Error type of [`copy_dir_recursive`].
#[derive(Debug, Display, Error, Diagnostic)]
pub enum CopyDirError {
    #[display("Source directory {source_dir:?} does not exist or is not a directory")]
    #[diagnostic(code(webdist_fs::source_not_dir))]
    SourceNotDir { source_dir: PathBuf },

    #[display("Can't copy {source_dir:?} into {target_dir:?}, which is inside it")]
    #[diagnostic(
        code(webdist_fs::target_inside_source),
        help("Make sure the entry point of the dependency is not the root of the project.")
    )]
    TargetInsideSource { source_dir: PathBuf, target_dir: PathBuf },

    #[display("Failed to resolve the real path of {path:?}: {error}")]
    #[diagnostic(code(webdist_fs::canonicalize))]
    Canonicalize {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to walk {source_dir:?}: {error}")]
    #[diagnostic(code(webdist_fs::walk_dir))]
    WalkDir {
        source_dir: PathBuf,
        #[error(source)]
        error: walkdir::Error,
    },

    #[display("Failed to create directory at {dir:?}: {error}")]
    #[diagnostic(code(webdist_fs::create_dir))]
    CreateDir {
        dir: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to remove stale entry at {path:?}: {error}")]
    #[diagnostic(code(webdist_fs::remove_stale))]
    RemoveStale {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to copy {from:?} to {to:?}: {error}")]
    #[diagnostic(code(webdist_fs::copy_file))]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[error(source)]
        error: io::Error,
    },
}

/// Resolve the real path of `path`, which may not exist yet.
///
/// The longest existing ancestor is canonicalized and the missing components are appended.
fn canonicalize_partially(path: &Path) -> io::Result<PathBuf> {
    let mut missing = Vec::new();
    let mut existing = path;
    loop {
        match fs::canonicalize(existing) {
            Ok(real_path) => {
                return missing
                    .iter()
                    .rev()
                    .fold(real_path, |real_path, component| real_path.join(component))
                    .pipe(Ok);
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(file_name)) = (existing.parent(), existing.file_name())
                else {
                    return Err(error);
                };
                missing.push(file_name);
                existing = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            }
            Err(error) => return Err(error),
        }
    }
}

/// Remove whatever occupies `path` unless it is already of the wanted kind.
fn clear_target(path: &Path, want_dir: bool) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error),
    };
    match (metadata.is_dir(), want_dir) {
        (true, true) => Ok(()),
        (true, false) => fs::remove_dir_all(path),
        (false, _) => fs::remove_file(path),
    }
}

/// Recursively copy the contents of `source_dir` into `target_dir`.
///
/// * Missing directories (including `target_dir` itself) are created.
/// * Existing files are replaced, files that exist only in `target_dir` are kept.
/// * Symbolic links inside `source_dir` are followed, their content is copied.
/// * Files are reflinked when the filesystem supports it, copied otherwise.
/// * `target_dir` must not resolve to `source_dir` or a directory inside it.
///
/// Returns the number of copied files.
pub fn copy_dir_recursive(source_dir: &Path, target_dir: &Path) -> Result<usize, CopyDirError> {
    if !source_dir.is_dir() {
        return Err(CopyDirError::SourceNotDir { source_dir: source_dir.to_path_buf() });
    }

    let canonicalize = |path: &Path| {
        canonicalize_partially(path)
            .map_err(|error| CopyDirError::Canonicalize { path: path.to_path_buf(), error })
    };
    if canonicalize(target_dir)?.starts_with(canonicalize(source_dir)?) {
        return Err(CopyDirError::TargetInsideSource {
            source_dir: source_dir.to_path_buf(),
            target_dir: target_dir.to_path_buf(),
        });
    }

    let mut file_count = 0;
    for entry in WalkDir::new(source_dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|error| CopyDirError::WalkDir {
            source_dir: source_dir.to_path_buf(),
            error,
        })?;
        let suffix = entry
            .path()
            .strip_prefix(source_dir)
            .expect("walkdir entries are inside the walked directory");
        let target = target_dir.join(suffix);

        if entry.file_type().is_dir() {
            clear_target(&target, true)
                .map_err(|error| CopyDirError::RemoveStale { path: target.clone(), error })?;
            fs::create_dir_all(&target)
                .map_err(|error| CopyDirError::CreateDir { dir: target, error })?;
            continue;
        }

        clear_target(&target, false)
            .map_err(|error| CopyDirError::RemoveStale { path: target.clone(), error })?;
        reflink_copy::reflink_or_copy(entry.path(), &target).map_err(|error| {
            CopyDirError::CopyFile { from: entry.path().to_path_buf(), to: target.clone(), error }
        })?;
        tracing::trace!(target: "webdist::copy", from = ?entry.path(), to = ?target, "Copied file");
        file_count += 1;
    }

    file_count.pipe(Ok)
}
