//! Filter reconciliation
//!
//! Computes what the backup wants that the ledger has not observed
//! on-device, and replays one add action per missing entry. Additions are
//! rate limited and individually fallible: a failed add is counted and
//! logged, never fatal to the run.

use crate::backup;
use crate::config::{Delays, TapPoint};
use crate::device::actions::DeviceActions;
use crate::domain::{Result, SyncReport};
use crate::ledger;
use std::collections::BTreeSet;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Single-entry add action against the filter screen.
pub trait FilterAdder {
    /// Attempt to add one filter. Returns whether the device acknowledged;
    /// never propagates transport errors.
    fn add_filter(&mut self, name: &str) -> bool;
}

/// Device-backed [`FilterAdder`]: type the name into the focused filter
/// input, settle, tap the submit control, settle.
pub struct DeviceAdder<'a> {
    actions: DeviceActions<'a>,
    submit_tap: TapPoint,
    delays: Delays,
}

impl<'a> DeviceAdder<'a> {
    pub fn new(actions: DeviceActions<'a>, submit_tap: TapPoint, delays: Delays) -> Self {
        Self { actions, submit_tap, delays }
    }

    fn try_add(&self, name: &str) -> Result<()> {
        self.actions.input_text(name)?;
        thread::sleep(self.delays.after_text());
        self.actions.tap(self.submit_tap)?;
        thread::sleep(self.delays.after_tap());
        Ok(())
    }
}

impl FilterAdder for DeviceAdder<'_> {
    fn add_filter(&mut self, name: &str) -> bool {
        match self.try_add(name) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to add filter for {name}: {e}");
                false
            }
        }
    }
}

/// Names the backup wants that the ledger has not seen, sorted
/// lexicographically for a deterministic replay order.
pub fn plan_additions(backup: &[String], existing: &BTreeSet<String>) -> Vec<String> {
    let mut missing: Vec<String> =
        backup.iter().filter(|name| !existing.contains(*name)).cloned().collect();
    missing.sort();
    missing.dedup();
    missing
}

/// Reconcile the backup against the ledger by replaying add actions.
///
/// Sleeps `pause` after every attempt regardless of outcome: the filter
/// screen needs time to register each input. Ends with a ledger cleanup
/// pass. Note the deliberate decoupling: successfully added names are not
/// written to the ledger here; only a capture run observes on-device state.
pub fn sync_filters(
    backup_path: &Path,
    ledger_path: &Path,
    adder: &mut dyn FilterAdder,
    max_additions: Option<usize>,
    pause: Duration,
) -> Result<SyncReport> {
    let desired = backup::extract_subreddits(backup_path)?;
    let existing = ledger::load(ledger_path)?;

    let to_add = plan_additions(&desired, &existing);
    tracing::info!(
        "filtered {} backup subreddits to {} after excluding ledger entries",
        desired.len(),
        to_add.len()
    );

    let mut report = SyncReport {
        desired: desired.len(),
        already_present: desired.len() - to_add.len(),
        ..SyncReport::default()
    };

    for name in &to_add {
        if let Some(cap) = max_additions {
            if report.attempted >= cap {
                tracing::info!("reached max additions cap of {cap}");
                break;
            }
        }

        report.attempted += 1;
        tracing::info!("attempting to add filter for {name}");
        if adder.add_filter(name) {
            tracing::info!("added filter for {name}");
            report.added += 1;
        } else {
            report.failed += 1;
        }
        thread::sleep(pause);
    }

    ledger::cleanup(ledger_path)?;
    Ok(report)
}
