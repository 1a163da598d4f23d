use serde_json::{json, Value};
use std::{fs, path::Path};

/// Write `value` as JSON to `path`, creating parent directories.
pub fn write_json(path: &Path, value: &Value) {
    write_file(path, value.to_string());
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(path, content).expect("write fixture file");
}

/// Create `<modules_dir>/<name>` with a `package.json` whose `main` is `main`,
/// and the given files (paths relative to the package directory).
pub fn write_installed_package(modules_dir: &Path, name: &str, main: &str, files: &[(&str, &str)]) {
    let package_dir = modules_dir.join(name);
    write_json(&package_dir.join("package.json"), &json!({ "name": name, "main": main }));
    for (suffix, content) in files {
        write_file(&package_dir.join(suffix), content);
    }
}

/// Write `package.json` and `package-lock.json` of a project.
///
/// `dependencies` is the `dependencies` section of the lockfile.
pub fn write_project(project_dir: &Path, main: &str, dependencies: Value) {
    write_json(&project_dir.join("package.json"), &json!({ "name": "app", "main": main }));
    write_json(
        &project_dir.join("package-lock.json"),
        &json!({ "name": "app", "lockfileVersion": 1, "dependencies": dependencies }),
    );
}

/// Create a named pipe at `path`, creating parent directories.
///
/// Opening it for reading blocks until a writer opens it, e.g. with [`write_file`].
#[cfg(unix)]
pub fn make_fifo(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    let status = std::process::Command::new("mkfifo").arg(path).status().expect("run mkfifo");
    assert!(status.success(), "mkfifo {path:?} exited with {status}");
}
