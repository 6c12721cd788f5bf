//! Sync command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::Config;
use crate::device::actions::DeviceActions;
use crate::device::{resolve_device, AdbTransport};
use crate::sync::{plan_additions, sync_filters, DeviceAdder, FilterAdder};
use crate::{backup, ledger};

#[derive(Args)]
pub struct SyncArgs {
    /// RES backup file (defaults to the configured backup path)
    #[arg(value_name = "BACKUP")]
    pub backup: Option<PathBuf>,

    /// Ledger CSV file (defaults to the configured ledger path)
    #[arg(long, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Specific Android device id to use
    #[arg(short, long, value_name = "ID")]
    pub device: Option<String>,

    /// Max number of subreddits to add (unset: add all)
    #[arg(long, value_name = "N")]
    pub max_additions: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub fn run(args: SyncArgs, cfg: &Config) -> Result<()> {
    let backup_path = args.backup.unwrap_or_else(|| cfg.backup_path.clone());
    let ledger_path = args.ledger.unwrap_or_else(|| cfg.ledger_path.clone());

    // Size the run before touching the device, so the prompt and progress
    // bar can say what is about to happen.
    let desired = backup::extract_subreddits(&backup_path)?;
    let existing = ledger::load(&ledger_path)?;
    let planned = plan_additions(&desired, &existing);
    let planned_count = args.max_additions.map_or(planned.len(), |cap| planned.len().min(cap));

    println!("Syncing subreddits using RES backup: {}", backup_path.display());
    println!("  Backup entries:   {}", desired.len());
    println!("  Already mirrored: {}", desired.len() - planned.len());
    println!("  To add:           {planned_count}");

    if planned_count == 0 {
        // Nothing to replay; just leave the ledger canonical.
        ledger::cleanup(&ledger_path)?;
        println!();
        println!("{}", style("Nothing to add; ledger already covers the backup.").green());
        return Ok(());
    }

    let interactive_terminal = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    if !args.yes && interactive_terminal {
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Drive the device to add {planned_count} filter(s)?"))
            .default(true)
            .interact()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let device_id = resolve_device(&cfg.adb_program, args.device)
        .context("failed to resolve target device")?;
    tracing::info!("using device {device_id}");

    let transport = AdbTransport::new(cfg.adb_program.as_str(), device_id);
    let adder = DeviceAdder::new(DeviceActions::new(&transport), cfg.submit_tap, cfg.delays);

    let bar = ProgressBar::new(planned_count as u64);
    let bar_style = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(bar_style);
    let mut adder = ProgressAdder { inner: adder, bar: &bar };

    let report = sync_filters(
        &backup_path,
        &ledger_path,
        &mut adder,
        args.max_additions,
        cfg.delays.between_adds(),
    )?;
    bar.finish_and_clear();

    println!();
    println!("{}", style("Sync complete!").green().bold());
    println!();
    println!("Statistics:");
    println!("  Backup entries:   {}", report.desired);
    println!("  Already mirrored: {}", report.already_present);
    println!("  Attempted:        {}", report.attempted);
    println!("  Added:            {}", report.added);
    if report.failed > 0 {
        println!("  Failed:           {}", style(report.failed).red());
    }
    println!("  Ledger:           {}", ledger_path.display());

    Ok(())
}

/// Ticks the progress bar around the wrapped adder.
struct ProgressAdder<'a, A> {
    inner: A,
    bar: &'a ProgressBar,
}

impl<A: FilterAdder> FilterAdder for ProgressAdder<'_, A> {
    fn add_filter(&mut self, name: &str) -> bool {
        self.bar.set_message(name.to_string());
        let acknowledged = self.inner.add_filter(name);
        self.bar.inc(1);
        acknowledged
    }
}
