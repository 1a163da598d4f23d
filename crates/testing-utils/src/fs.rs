use std::path::Path;
use walkdir::WalkDir;

fn normalized_suffix(path: &Path, prefix: &Path) -> String {
    path.strip_prefix(prefix)
        .expect("strip prefix from path")
        .to_str()
        .expect("convert suffix to UTF-8")
        .replace('\\', "/")
}

/// List every file under `root`, sorted, as `/`-separated paths relative to `root`.
pub fn get_all_files(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.expect("access entry"))
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| normalized_suffix(entry.path(), root))
        .collect()
}

/// List every file under `root` together with its content.
pub fn get_all_file_contents(root: &Path) -> Vec<(String, Vec<u8>)> {
    get_all_files(root)
        .into_iter()
        .map(|suffix| {
            let content = std::fs::read(root.join(&suffix)).expect("read file content");
            (suffix, content)
        })
        .collect()
}
