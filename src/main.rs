//! relay-sync: Mirror RES subreddit filters into Relay for Reddit
//!
//! Drives a connected Android device over ADB to replay Reddit Enhancement
//! Suite filter entries into Relay for Reddit's filter list, using OCR on
//! scrolled screenshots to learn which filters the device already has.

use anyhow::Result;

mod backup;
mod cli;
mod config;
mod device;
mod domain;
mod ledger;
mod ocr;
mod sync;

fn main() -> Result<()> {
    cli::run()
}
