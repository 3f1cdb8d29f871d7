//! Document loading: file text → generic JSON value tree.
//!
//! JSON parsing is an external concern as far as the analyzer goes; this is
//! the whole of the seam. Errors stay stringly-typed at this layer — the
//! loader turns them into `InvalidDocument` diagnostics.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Read and parse one schema document.
pub fn load_document(path: &Path) -> Result<Value, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| format!("failed to read file: {error}"))?;
    serde_json::from_str(&text).map_err(|error| format!("invalid JSON: {error}"))
}

/// Only `*.json` files are considered schema documents.
pub fn is_schema_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Directory entries sorted by file name, for deterministic traversal.
pub fn collect_sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_schema_file() {
        assert!(is_schema_file(Path::new("card.json")));
        assert!(is_schema_file(Path::new("card.schema.json")));
        assert!(!is_schema_file(Path::new("notes.txt")));
        assert!(!is_schema_file(Path::new("README")));
    }

    #[test]
    fn test_load_document_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_document(&path).is_err());
    }

    #[test]
    fn test_collect_sorted_entries_is_name_ordered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let names: Vec<String> = collect_sorted_entries(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.json", "b.json", "c"]);
    }
}
