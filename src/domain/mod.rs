//! Shared domain types: the error taxonomy and end-of-run report shapes.
//!
//! The error taxonomy is a `thiserror` enum (`SyncError`) covering the
//! failure classes from the spec: missing files (`NotFound`), unexpected
//! backup shape (`Format`), ADB failures (`Transport`), OCR failures
//! (`Recognition`), plus `Io`/`Csv` source conversions. Structural errors
//! abort; per-item errors are caught at loop scope and modeled as values.

use std::path::PathBuf;

/// Convenience alias for fallible operations in the sync core.
pub type Result<T> = std::result::Result<T, SyncError>;

/// The sync core's error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A required file (backup or ledger) was missing — abort.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The backup had an unexpected shape — abort.
    #[error("format error: {0}")]
    Format(String),

    /// An ADB transport command failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// An OCR recognition step failed.
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Underlying CSV (de)serialization failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Counts summarizing a reconcile (`sync`) run.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    /// Subreddits the backup wants mirrored.
    pub desired: usize,
    /// Desired names already present in the ledger.
    pub already_present: usize,
    /// Add actions attempted this run.
    pub attempted: usize,
    /// Add actions the device acknowledged.
    pub added: usize,
    /// Add actions that failed.
    pub failed: usize,
}

/// How a ledger-building (`capture`) run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Consecutive scans matched: the end of the list was reached.
    Converged,
    /// The iteration cap was hit before convergence.
    Exhausted,
}

impl BuildOutcome {
    /// Human-readable label for the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildOutcome::Converged => "converged",
            BuildOutcome::Exhausted => "exhausted",
        }
    }
}

/// Counts summarizing a ledger-building (`capture`) run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Capture iterations executed.
    pub iterations: usize,
    /// Names written to the ledger across all batches.
    pub names_written: usize,
    /// How the loop terminated.
    pub outcome: BuildOutcome,
}
