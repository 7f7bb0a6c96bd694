//! Source file enumeration

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_skipped_dir(path: &Path) -> bool {
    path.components().any(|c| {
        matches!(
            c.as_os_str().to_str(),
            Some("bin" | "obj" | ".git" | "node_modules")
        )
    })
}

/// All files under `root` with the given extension, sorted
pub fn find_source_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let files: BTreeSet<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .filter(|e| !is_skipped_dir(e.path().strip_prefix(root).unwrap_or(e.path())))
        .map(|e| e.into_path())
        .collect();

    files.into_iter().collect()
}

/// Directories under `root` whose name contains `marker`, sorted
pub fn find_marker_dirs(root: &Path, marker: &str) -> Vec<PathBuf> {
    if marker.is_empty() {
        return Vec::new();
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter(|e| e.file_name().to_string_lossy().contains(marker))
        .map(|e| e.into_path())
        .collect()
}

/// Source files found under any of the given directories, without duplicates
pub fn find_source_files_in(dirs: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let files: BTreeSet<PathBuf> = dirs
        .iter()
        .flat_map(|dir| find_source_files(dir, extension))
        .collect();
    files.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_find_source_files_filters_extension_and_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "App/Program.cs");
        touch(dir.path(), "App.DAL/QueryObjects/UserQueryObject.cs");
        touch(dir.path(), "App.DAL/readme.md");
        touch(dir.path(), "App.DAL/obj/Generated.cs");

        let files = find_source_files(dir.path(), "cs");
        let relative: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            relative,
            vec!["App/Program.cs", "App.DAL/QueryObjects/UserQueryObject.cs"]
        );
    }

    #[test]
    fn test_find_marker_dirs_and_dedup() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "App.DAL/Inner.DAL/Entity.cs");
        touch(dir.path(), "App.BL/Service.cs");

        let dirs = find_marker_dirs(dir.path(), "DAL");
        assert_eq!(dirs.len(), 2);

        let files = find_source_files_in(&dirs, "cs");
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("App.DAL/Inner.DAL/Entity.cs"));
    }

    #[test]
    fn test_empty_marker_matches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_marker_dirs(dir.path(), "").is_empty());
    }
}
