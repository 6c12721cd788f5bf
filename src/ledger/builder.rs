//! Ledger building
//!
//! Drives repeated screenshot + scroll rounds against the live filter
//! screen, folding each scan into the ledger until the visible content stops
//! changing (scroll end) or the iteration cap is hit. Polling until two
//! consecutive views match is the only reliable termination signal: there is
//! no API access to the underlying list and its length is unknown.

use crate::config::{Delays, SwipeGesture};
use crate::device::actions::{DeviceActions, REMOTE_CAPTURE_PATH};
use crate::domain::{BuildOutcome, BuildReport, Result};
use crate::ledger;
use crate::ocr::{scan_image, CropBand, TextRecognizer};
use std::collections::HashSet;
use std::path::Path;
use std::thread;

/// One page of the scrollable filter list.
///
/// Implementations own their settle timing; per-page failures must surface
/// as an empty list, never an error.
pub trait FilterScreen {
    /// Names currently visible on the filter screen.
    fn visible_names(&mut self) -> Vec<String>;

    /// Advance the list by one page.
    fn scroll_next(&mut self);
}

/// Scan the live filter list into the ledger.
///
/// Appends in batches of `batch_size` iterations (and on the final
/// iteration), flushing any remainder before returning. Duplicate rows can
/// accumulate across pages; `ledger::cleanup` canonicalizes them later.
pub fn build_ledger(
    screen: &mut dyn FilterScreen,
    ledger_path: &Path,
    max_iterations: usize,
    batch_size: usize,
) -> Result<BuildReport> {
    ledger::init(ledger_path)?;

    let batch_size = batch_size.max(1);
    let mut previous: HashSet<String> = HashSet::new();
    let mut pending: Vec<String> = Vec::new();
    let mut iteration = 0;
    let mut names_written = 0;
    let mut outcome = BuildOutcome::Exhausted;

    while iteration < max_iterations {
        iteration += 1;
        tracing::info!("capture iteration {iteration}");

        let visible = screen.visible_names();
        tracing::debug!("found {} subreddits: {}", visible.len(), visible.join(", "));

        let current: HashSet<String> = visible.iter().cloned().collect();
        if current == previous {
            tracing::info!("scan repeated; assuming end of list reached");
            outcome = BuildOutcome::Converged;
            break;
        }

        previous = current;
        pending.extend(visible);

        if iteration % batch_size == 0 || iteration == max_iterations {
            names_written += flush(ledger_path, &mut pending)?;
        }

        screen.scroll_next();
    }

    names_written += flush(ledger_path, &mut pending)?;

    Ok(BuildReport { iterations: iteration, names_written, outcome })
}

fn flush(ledger_path: &Path, pending: &mut Vec<String>) -> Result<usize> {
    if pending.is_empty() {
        return Ok(0);
    }
    ledger::append(ledger_path, pending)?;
    let flushed = pending.len();
    tracing::info!("wrote batch of {flushed} subreddits to ledger");
    pending.clear();
    Ok(flushed)
}

/// Device-backed [`FilterScreen`].
///
/// Each page read captures a screenshot, pulls it into a transient local
/// file, waits for the pull to settle, and scans it; the transient file
/// disappears with its scope. Transport failures are isolated to the single
/// page: logged, empty result.
pub struct LiveScreen<'a> {
    actions: DeviceActions<'a>,
    recognizer: &'a dyn TextRecognizer,
    band: CropBand,
    swipe: SwipeGesture,
    delays: Delays,
}

impl<'a> LiveScreen<'a> {
    pub fn new(
        actions: DeviceActions<'a>,
        recognizer: &'a dyn TextRecognizer,
        band: CropBand,
        swipe: SwipeGesture,
        delays: Delays,
    ) -> Self {
        Self { actions, recognizer, band, swipe, delays }
    }

    fn capture_page(&self) -> Result<Vec<String>> {
        self.actions.screencap(REMOTE_CAPTURE_PATH)?;
        let staged = tempfile::Builder::new().prefix("relay-screen-").suffix(".png").tempfile()?;
        self.actions.pull(REMOTE_CAPTURE_PATH, staged.path())?;
        thread::sleep(self.delays.after_pull());
        Ok(scan_image(staged.path(), self.band, self.recognizer))
    }
}

impl FilterScreen for LiveScreen<'_> {
    fn visible_names(&mut self) -> Vec<String> {
        match self.capture_page() {
            Ok(names) => names,
            Err(e) => {
                tracing::error!("screenshot capture failed: {e}");
                Vec::new()
            }
        }
    }

    fn scroll_next(&mut self) {
        tracing::debug!("swiping up to load more");
        if let Err(e) = self.actions.swipe(self.swipe) {
            tracing::error!("scroll swipe failed: {e}");
        }
        thread::sleep(self.delays.after_swipe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Screen that replays scripted pages; repeats the last page forever.
    struct ScriptedScreen {
        pages: VecDeque<Vec<String>>,
        last: Vec<String>,
        scrolls: usize,
    }

    impl ScriptedScreen {
        fn new(pages: &[&[&str]]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|page| page.iter().map(|s| s.to_string()).collect())
                    .collect(),
                last: Vec::new(),
                scrolls: 0,
            }
        }
    }

    impl FilterScreen for ScriptedScreen {
        fn visible_names(&mut self) -> Vec<String> {
            if let Some(page) = self.pages.pop_front() {
                self.last = page;
            }
            self.last.clone()
        }

        fn scroll_next(&mut self) {
            self.scrolls += 1;
        }
    }

    /// Screen that always shows something new, so the loop never converges.
    struct EndlessScreen {
        counter: usize,
    }

    impl FilterScreen for EndlessScreen {
        fn visible_names(&mut self) -> Vec<String> {
            self.counter += 1;
            vec![format!("sub{}", self.counter)]
        }

        fn scroll_next(&mut self) {}
    }

    #[test]
    fn test_converges_when_consecutive_scans_match() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        let mut screen = ScriptedScreen::new(&[&["a", "b"], &["a", "b"]]);

        let report = build_ledger(&mut screen, &path, 100, 10).expect("build");

        assert_eq!(report.outcome, BuildOutcome::Converged);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.names_written, 2);
        // No scroll after the converged scan.
        assert_eq!(screen.scrolls, 1);
    }

    #[test]
    fn test_order_insensitive_convergence() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        // Same set, different OCR read order: still the end of the list.
        let mut screen = ScriptedScreen::new(&[&["a", "b"], &["b", "a"]]);

        let report = build_ledger(&mut screen, &path, 100, 10).expect("build");
        assert_eq!(report.outcome, BuildOutcome::Converged);
        assert_eq!(report.iterations, 2);
    }

    #[test]
    fn test_iteration_cap_ends_exhausted() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        let mut screen = EndlessScreen { counter: 0 };

        let report = build_ledger(&mut screen, &path, 3, 10).expect("build");

        assert_eq!(report.outcome, BuildOutcome::Exhausted);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.names_written, 3);
    }

    #[test]
    fn test_flushes_on_batch_boundary_and_remainder() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        let mut screen = ScriptedScreen::new(&[&["a"], &["b"], &["c"], &["c"]]);

        let report = build_ledger(&mut screen, &path, 100, 2).expect("build");

        assert_eq!(report.outcome, BuildOutcome::Converged);
        assert_eq!(report.names_written, 3);
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\na\nb\nc\n");
    }

    #[test]
    fn test_empty_first_scan_converges_immediately() {
        // A failed or blank first capture matches the initial empty set;
        // the loop treats it as the end of the list.
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        let mut screen = ScriptedScreen::new(&[&[]]);

        let report = build_ledger(&mut screen, &path, 100, 10).expect("build");

        assert_eq!(report.outcome, BuildOutcome::Converged);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.names_written, 0);
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\n");
    }

    #[test]
    fn test_duplicate_rows_accumulate_until_cleanup() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("relay.csv");
        // Overlapping pages re-read "b"; append keeps both rows.
        let mut screen = ScriptedScreen::new(&[&["a", "b"], &["b", "c"], &["b", "c"]]);

        build_ledger(&mut screen, &path, 100, 10).expect("build");
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\na\nb\nb\nc\n");

        crate::ledger::cleanup(&path).expect("cleanup");
        assert_eq!(fs::read_to_string(&path).expect("read"), "Subreddit\na\nb\nc\n");
    }
}
