//! Ledger persistence
//!
//! The ledger is a single-column CSV mirroring the subreddits observed on
//! the device's filter screen via OCR. The capture loop appends to it in
//! batches; `cleanup` rewrites it deduplicated and sorted. Readers must skip
//! the header and may assume at most one name per row.

pub mod builder;

use crate::domain::{Result, SyncError};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Column header of the ledger file.
pub const LEDGER_HEADER: &str = "Subreddit";

/// Create the ledger file with its header if it does not exist yet.
pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([LEDGER_HEADER])?;
    writer.flush()?;
    Ok(())
}

/// Load the set of subreddits recorded in the ledger.
///
/// A missing ledger is an empty set, not an error: nothing has been observed
/// on-device yet.
pub fn load(path: &Path) -> Result<BTreeSet<String>> {
    let mut subs = BTreeSet::new();
    if !path.exists() {
        return Ok(subs);
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    for record in reader.records() {
        let record = record?;
        if let Some(field) = record.get(0) {
            let name = field.trim();
            if !name.is_empty() {
                subs.insert(name.to_string());
            }
        }
    }
    Ok(subs)
}

/// Append a batch of names to the ledger without rewriting existing rows.
pub fn append(path: &Path, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    for name in names {
        writer.write_record([name.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Rewrite the ledger in canonical form: header, then unique names in sorted
/// order. Returns the number of names kept.
///
/// Fails with `NotFound` when the ledger has never been created; building it
/// is the capture loop's job, not cleanup's.
pub fn cleanup(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(SyncError::NotFound(path.to_path_buf()));
    }

    let subs = load(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([LEDGER_HEADER])?;
    for name in &subs {
        writer.write_record([name.as_str()])?;
    }
    writer.flush()?;

    tracing::info!("cleaned up ledger {} ({} names)", path.display(), subs.len());
    Ok(subs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_init_writes_header_once() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("data").join("relay.csv");

        init(&path).expect("init");
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\n");

        // Re-initializing must not touch existing rows.
        append(&path, &owned(&["aww"])).expect("append");
        init(&path).expect("init again");
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\naww\n");
    }

    #[test]
    fn test_load_missing_ledger_is_empty() {
        let tmp = TempDir::new().expect("tmp");
        let subs = load(&tmp.path().join("absent.csv")).expect("load");
        assert!(subs.is_empty());
    }

    #[test]
    fn test_load_skips_header_and_blank_rows() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        fs::write(&path, "Subreddit\naww\n\n  politics  \n").expect("write");

        let subs = load(&path).expect("load");
        assert_eq!(subs.len(), 2);
        assert!(subs.contains("aww"));
        assert!(subs.contains("politics"));
    }

    #[test]
    fn test_append_preserves_existing_rows() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        init(&path).expect("init");

        append(&path, &owned(&["zebra", "aww"])).expect("first batch");
        append(&path, &owned(&["politics"])).expect("second batch");

        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\nzebra\naww\npolitics\n");
    }

    #[test]
    fn test_cleanup_dedupes_and_sorts() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        init(&path).expect("init");
        append(&path, &owned(&["zebra", "aww", "zebra", "politics", "aww"])).expect("append");

        let kept = cleanup(&path).expect("cleanup");
        assert_eq!(kept, 3);
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\naww\npolitics\nzebra\n");
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        init(&path).expect("init");
        append(&path, &owned(&["b", "a", "b"])).expect("append");

        cleanup(&path).expect("first cleanup");
        let first = fs::read_to_string(&path).expect("read");
        cleanup(&path).expect("second cleanup");
        let second = fs::read_to_string(&path).expect("read");
        assert_eq!(first, second);
    }

    #[test]
    fn test_cleanup_missing_ledger_is_not_found() {
        let tmp = TempDir::new().expect("tmp");
        let err = cleanup(&tmp.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
    }
}
