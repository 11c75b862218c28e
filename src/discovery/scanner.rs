//! File system scanner for discovering atlas configs.
//!
//! Recursively scans directories for `atlas.yaml`, `atlas.yml`,
//! `atlas.json` and `*.atlas.yaml` / `*.atlas.json` files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Scan a directory for atlas config files, sorted by path.
///
/// Hidden directories (`.git`, `.Master`, ...) are skipped; configs there
/// are usually shared layouts rather than runnable atlases.
pub fn find_configs(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_atlas_config(e.path()))
        .map(|e| e.into_path())
        .collect();

    found.sort();
    found
}

/// Check whether a file name marks an atlas config.
pub fn is_atlas_config(path: &Path) -> bool {
    let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
        return false;
    };

    matches!(filename, "atlas.yaml" | "atlas.yml" | "atlas.json")
        || filename.ends_with(".atlas.yaml")
        || filename.ends_with(".atlas.yml")
        || filename.ends_with(".atlas.json")
}

fn is_hidden(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_atlas_config() {
        assert!(is_atlas_config(Path::new("atlas.yaml")));
        assert!(is_atlas_config(Path::new("dir/atlas.json")));
        assert!(is_atlas_config(Path::new("slots.atlas.yml")));
        assert!(is_atlas_config(Path::new("gold.atlas.json")));
        assert!(!is_atlas_config(Path::new("atlas.png")));
        assert!(!is_atlas_config(Path::new("layout.yaml")));
    }

    #[test]
    fn test_find_configs_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("thorne/gold")).unwrap();
        fs::create_dir_all(dir.path().join(".Master")).unwrap();

        fs::write(dir.path().join("atlas.yaml"), "").unwrap();
        fs::write(dir.path().join("thorne/gold/slots.atlas.yaml"), "").unwrap();
        fs::write(dir.path().join("thorne/notes.yaml"), "").unwrap();
        fs::write(dir.path().join(".Master/atlas.yaml"), "").unwrap();

        let found = find_configs(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| !p.to_string_lossy().contains(".Master")));
    }

    #[test]
    fn test_find_configs_missing_root() {
        let dir = tempdir().unwrap();
        assert!(find_configs(&dir.path().join("nope")).is_empty());
    }
}
