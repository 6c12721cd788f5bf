//! Scan command implementation
//!
//! Offline counterpart of capture: OCR a directory of already-taken
//! screenshots and print the union of extracted subreddit names.

use anyhow::Result;
use clap::Args;
use console::style;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::ocr::{scan_image, CropBand, TesseractCli};

#[derive(Args)]
pub struct ScanArgs {
    /// Directory containing *.png / *.jpg screenshots
    #[arg(value_name = "SCREENSHOT_DIR")]
    pub dir: PathBuf,
}

pub fn run(args: ScanArgs, cfg: &Config) -> Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!("not a directory: {}", args.dir.display());
    }

    let mut screenshots: Vec<PathBuf> = WalkDir::new(&args.dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_screenshot(path))
        .collect();
    screenshots.sort();

    if screenshots.is_empty() {
        println!("No image files found in the directory.");
        return Ok(());
    }

    let recognizer = TesseractCli::new(cfg.tesseract_program.as_str());
    let band = CropBand { top: cfg.crop_top, bottom: cfg.crop_bottom };

    let mut all_subs = BTreeSet::new();
    for screenshot in &screenshots {
        println!("Processing {}...", screenshot.display());
        all_subs.extend(scan_image(screenshot, band, &recognizer));
    }

    if all_subs.is_empty() {
        println!("No subreddits found.");
    } else {
        println!("{}", style("Subreddits extracted:").bold());
        for sub in &all_subs {
            println!("{sub}");
        }
    }

    Ok(())
}

fn is_screenshot(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("png" | "jpg")
    )
}
