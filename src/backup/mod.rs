//! RES backup reading
//!
//! Extracts the flat list of filtered subreddits from a Reddit Enhancement
//! Suite settings backup. The backup is the source of truth for desired
//! state; it is read once per invocation and never written.

use crate::domain::{Result, SyncError};
use std::fs;
use std::path::Path;

/// Nested field path holding the filter entries inside the backup document.
/// Each entry is a tuple whose first element is the subreddit name.
const FILTER_FIELD_PATH: [&str; 4] = ["data", "RESoptions.filteReddit", "subreddits", "value"];

/// Extract the ordered list of filtered subreddit names from a RES backup.
///
/// Names are trimmed; entries with a missing or blank first element are
/// skipped, matching the truthiness filter RES itself applies.
pub fn extract_subreddits(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(SyncError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let document: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| SyncError::Format(format!("{}: {e}", path.display())))?;

    let mut cursor = &document;
    for field in FILTER_FIELD_PATH {
        cursor = cursor.get(field).ok_or_else(|| {
            SyncError::Format(format!("{}: missing field '{field}'", path.display()))
        })?;
    }

    let entries = cursor.as_array().ok_or_else(|| {
        SyncError::Format(format!("{}: filter list is not a sequence", path.display()))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let Some(first) = entry.get(0) else {
            continue;
        };
        if let Some(name) = first.as_str() {
            let name = name.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }

    tracing::debug!("extracted {} subreddits from {}", names.len(), path.display());
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_backup(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("RES.json");
        fs::write(&path, body).expect("write backup");
        path
    }

    #[test]
    fn test_extracts_names_in_document_order() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_backup(
            &tmp,
            r#"{"data":{"RESoptions.filteReddit":{"subreddits":{"value":[
                ["politics", "everywhere"],
                ["AskReddit", "everywhere"],
                ["aww", "everywhere"]
            ]}}}}"#,
        );

        let names = extract_subreddits(&path).expect("extract");
        assert_eq!(names, vec!["politics", "AskReddit", "aww"]);
    }

    #[test]
    fn test_skips_blank_and_missing_first_elements() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_backup(
            &tmp,
            r#"{"data":{"RESoptions.filteReddit":{"subreddits":{"value":[
                ["politics"],
                [],
                ["", "everywhere"],
                ["  "],
                ["  aww  "]
            ]}}}}"#,
        );

        let names = extract_subreddits(&path).expect("extract");
        assert_eq!(names, vec!["politics", "aww"]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = TempDir::new().expect("tmp");
        let err = extract_subreddits(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
    }

    #[test]
    fn test_missing_nested_field_is_format_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_backup(&tmp, r#"{"data":{"RESoptions.other":{}}}"#);

        let err = extract_subreddits(&path).unwrap_err();
        assert!(matches!(err, SyncError::Format(_)));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_backup(&tmp, "not json at all");

        let err = extract_subreddits(&path).unwrap_err();
        assert!(matches!(err, SyncError::Format(_)));
    }
}
