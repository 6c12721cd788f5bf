//! Add command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use crate::cli::utils::parse_csv;
use crate::config::Config;
use crate::device::actions::DeviceActions;
use crate::device::{resolve_device, AdbTransport};
use crate::sync::{DeviceAdder, FilterAdder};

#[derive(Args)]
pub struct AddArgs {
    /// Comma-separated subreddit names, e.g. "subreddit1, subreddit2"
    #[arg(value_name = "SUBREDDITS")]
    pub subreddits: String,

    /// Specific Android device id to use
    #[arg(short, long, value_name = "ID")]
    pub device: Option<String>,
}

pub fn run(args: AddArgs, cfg: &Config) -> Result<()> {
    let names = parse_csv(&args.subreddits);
    if names.is_empty() {
        anyhow::bail!("no subreddit names given");
    }

    let device_id = resolve_device(&cfg.adb_program, args.device)
        .context("failed to resolve target device")?;
    tracing::info!("using device {device_id}");

    let transport = AdbTransport::new(cfg.adb_program.as_str(), device_id);
    let mut adder = DeviceAdder::new(DeviceActions::new(&transport), cfg.submit_tap, cfg.delays);

    for name in &names {
        if adder.add_filter(name) {
            println!("{}", style(format!("Added {name}")).green());
        } else {
            println!("{}", style(format!("Failed to add {name}")).red());
        }
    }
    println!("{}", style("Finished processing filters.").bold());

    Ok(())
}
