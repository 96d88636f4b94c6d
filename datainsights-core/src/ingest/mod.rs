//! Ingestion of analytics export files
//!
//! Export files (Layer 0) are discovered with a glob pattern and decoded into
//! [`SessionRecord`]s. Each file is read whole; files are independent of
//! each other.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use datainsights_core::ingest;
//!
//! for path in ingest::discover_files(&dir, "**/*.json")? {
//!     let records = ingest::read_records(&path)?;
//!     println!("{}: {} records", path.display(), records.len());
//! }
//! ```

use crate::error::{Error, Result};
use crate::types::SessionRecord;
use std::path::{Path, PathBuf};

/// Find export files under `dir` matching `pattern`.
///
/// Only regular files are returned, sorted by path so runs process files in
/// a stable order.
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Discovery(format!(
            "source directory {} does not exist or is not a directory",
            dir.display()
        )));
    }

    // The directory is literal text; only `pattern` may contain wildcards.
    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern_str = Path::new(&root).join(pattern);

    let entries = glob::glob(&pattern_str.to_string_lossy())
        .map_err(|e| Error::Discovery(format!("invalid glob pattern {:?}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable path during discovery");
            }
        }
    }
    files.sort();

    tracing::info!(
        dir = %dir.display(),
        pattern,
        count = files.len(),
        "Discovered source files"
    );

    Ok(files)
}

/// Read one export file: a JSON array of session records.
pub fn read_records(path: &Path) -> Result<Vec<SessionRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: format!("failed to read file: {}", e),
    })?;

    let records: Vec<SessionRecord> = serde_json::from_str(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: format!("failed to decode session records: {}", e),
    })?;

    tracing::debug!(path = %path.display(), records = records.len(), "Read session records");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("2024/02")).unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("2024/02/c.json"), "[]").unwrap();

        let files = discover_files(dir.path(), "**/*.json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("2024/02/c.json"),
                PathBuf::from("a.json"),
                PathBuf::from("b.json"),
            ]
        );
    }

    #[test]
    fn test_discover_directory_with_glob_metacharacters() {
        let dir = TempDir::new().unwrap();
        let exports = dir.path().join("exports[2024]");
        fs::create_dir_all(&exports).unwrap();
        fs::write(exports.join("a.json"), "[]").unwrap();
        // would match `exports[2024]` if the brackets were read as a class
        fs::create_dir_all(dir.path().join("exports2")).unwrap();
        fs::write(dir.path().join("exports2/b.json"), "[]").unwrap();

        let files = discover_files(&exports, "**/*.json").unwrap();

        assert_eq!(files, vec![exports.join("a.json")]);
    }

    #[test]
    fn test_discover_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("folder.json")).unwrap();
        assert!(discover_files(dir.path(), "*.json").unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = discover_files(&dir.path().join("nope"), "*.json");
        assert!(matches!(result, Err(Error::Discovery(_))));
    }

    #[test]
    fn test_read_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(
            &path,
            r#"[{"Country":"US","Sessions":2,"ScreenPageViews":1,"EngagementRate":"0.5","date":"20240101"},
                {"Country":"FR","Sessions":1}]"#,
        )
        .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, "US");
        assert_eq!(records[1].sessions, 1);
    }

    #[test]
    fn test_read_records_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, r#"{"Country":"US"}"#).unwrap();

        match read_records(&path) {
            Err(Error::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_records(&dir.path().join("missing.json")),
            Err(Error::Parse { .. })
        ));
    }
}
