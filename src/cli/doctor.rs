//! Doctor command implementation
//!
//! Pre-run environment checks: the two external executables and a connected
//! device. Checks report, they do not abort; a missing device is a normal
//! state when preparing config offline.

use anyhow::Result;
use console::style;
use std::process::Command;

use crate::config::Config;
use crate::device::list_devices;

pub fn run(cfg: &Config) -> Result<()> {
    println!("{}", style("Performing environment checks...").cyan().bold());

    check_program(&cfg.adb_program, &["version"], "ADB");
    check_program(&cfg.tesseract_program, &["--version"], "Tesseract OCR");

    match list_devices(&cfg.adb_program) {
        Ok(devices) if !devices.is_empty() => {
            println!(
                "{}",
                style(format!("✅ Android device connected: {}", devices.join(", "))).green()
            );
        }
        Ok(_) => {
            println!("{}", style("❌ No Android device connected").red());
        }
        Err(e) => {
            println!("{}", style(format!("❌ Could not list devices: {e}")).red());
        }
    }

    println!("{}", style("Checks complete.").cyan());
    Ok(())
}

fn check_program(program: &str, args: &[&str], label: &str) {
    let available = Command::new(program)
        .args(args)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    if available {
        println!("{}", style(format!("✅ {label} is available")).green());
    } else {
        println!("{}", style(format!("❌ {label} not found or not working ({program})")).red());
    }
}
