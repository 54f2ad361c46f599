//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use walkdir::WalkDir;

/// File extension of Android shared libraries.
pub const SHARED_LIB_EXT: &str = "so";

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// List shared-library file names directly inside a directory.
///
/// Non-recursive; returns bare file names in sorted order. Used to pick
/// up build products from a CMake build directory.
pub fn list_shared_libraries(dir: &Path) -> Result<Vec<String>> {
    let pattern = dir.join(format!("*.{}", SHARED_LIB_EXT));
    let pattern_str = pattern.to_string_lossy();

    let mut names = Vec::new();
    for entry in glob(&pattern_str)
        .with_context(|| format!("invalid glob pattern: {}", pattern_str))?
    {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        names.push(name.to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Recursively find shared-library files under a directory.
///
/// Returns absolute paths in filesystem traversal order; callers must
/// not rely on any ordering beyond "each match exactly once".
pub fn walk_shared_libraries(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SHARED_LIB_EXT)
        {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_shared_libraries_is_flat() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("libfoo.so"), b"").unwrap();
        fs::write(tmp.path().join("libbar.so"), b"").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/libdeep.so"), b"").unwrap();

        let names = list_shared_libraries(tmp.path()).unwrap();
        assert_eq!(names, vec!["libbar.so", "libfoo.so"]);
    }

    #[test]
    fn test_walk_shared_libraries_recurses() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("liba.so"), b"").unwrap();
        fs::create_dir_all(tmp.path().join("nested/dir")).unwrap();
        fs::write(tmp.path().join("nested/dir/libb.so"), b"").unwrap();
        fs::write(tmp.path().join("nested/readme.md"), b"").unwrap();

        let mut paths = walk_shared_libraries(tmp.path()).unwrap();
        paths.sort();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("liba.so") || paths[1].ends_with("liba.so"));
        assert!(paths.iter().any(|p| p.ends_with("nested/dir/libb.so")));
    }

    #[test]
    fn test_ensure_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/c");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());

        // Second call is a no-op.
        ensure_dir(&dir).unwrap();
    }
}
