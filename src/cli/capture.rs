//! Capture command implementation
//!
//! Drives the ledger build loop against the live device.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::device::actions::DeviceActions;
use crate::device::{resolve_device, AdbTransport};
use crate::ledger::builder::{build_ledger, FilterScreen, LiveScreen};
use crate::ocr::{CropBand, TesseractCli};

#[derive(Args)]
pub struct CaptureArgs {
    /// Specific Android device id to use
    #[arg(short, long, value_name = "ID")]
    pub device: Option<String>,

    /// Max screenshot iterations (defaults to the configured cap)
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Ledger CSV file (defaults to the configured ledger path)
    #[arg(long, value_name = "FILE")]
    pub ledger: Option<PathBuf>,
}

pub fn run(args: CaptureArgs, cfg: &Config) -> Result<()> {
    let ledger_path = args.ledger.unwrap_or_else(|| cfg.ledger_path.clone());
    let max_iterations = args.max_iterations.unwrap_or(cfg.max_iterations);

    let device_id = resolve_device(&cfg.adb_program, args.device)
        .context("failed to resolve target device")?;
    println!("Scanning filter list on device {device_id} into {}", ledger_path.display());

    let transport = AdbTransport::new(cfg.adb_program.as_str(), device_id);
    let recognizer = TesseractCli::new(cfg.tesseract_program.as_str());
    let band = CropBand { top: cfg.crop_top, bottom: cfg.crop_bottom };
    let screen = LiveScreen::new(
        DeviceActions::new(&transport),
        &recognizer,
        band,
        cfg.scroll_swipe,
        cfg.delays,
    );

    let bar = ProgressBar::new_spinner();
    let bar_style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(bar_style);
    bar.enable_steady_tick(Duration::from_millis(120));
    let mut screen = ProgressScreen { inner: screen, bar: &bar, pages: 0 };

    let report = build_ledger(&mut screen, &ledger_path, max_iterations, cfg.batch_size)?;
    bar.finish_and_clear();

    println!();
    println!("{}", style("Capture complete!").green().bold());
    println!();
    println!("Statistics:");
    println!("  Iterations:    {}", report.iterations);
    println!("  Names written: {}", report.names_written);
    println!("  Outcome:       {}", report.outcome.as_str());
    println!("  Ledger:        {}", ledger_path.display());

    Ok(())
}

/// Reports page progress on the spinner around the wrapped screen.
struct ProgressScreen<'a, S> {
    inner: S,
    bar: &'a ProgressBar,
    pages: usize,
}

impl<S: FilterScreen> FilterScreen for ProgressScreen<'_, S> {
    fn visible_names(&mut self) -> Vec<String> {
        self.pages += 1;
        self.bar.set_message(format!("scanning page {}", self.pages));
        self.inner.visible_names()
    }

    fn scroll_next(&mut self) {
        self.bar.set_message(format!("scrolling after page {}", self.pages));
        self.inner.scroll_next()
    }
}
