use assert_cmd::prelude::*;
use command_extra::CommandExtra;
use std::{fs, path::PathBuf, process::Command};
use tempfile::{tempdir, TempDir};

/// Create a `webdist` command whose current directory is an empty temporary workspace.
pub fn webdist_with_temp_cwd() -> (Command, TempDir, PathBuf) {
    let root = tempdir().expect("create temporary directory");
    let workspace = root.path().join("workspace");
    fs::create_dir(&workspace).expect("create temporary workspace for webdist");
    let command = Command::cargo_bin("webdist")
        .expect("find the webdist binary")
        .with_current_dir(&workspace);
    (command, root, workspace)
}
