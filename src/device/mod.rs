//! Device command transport
//!
//! Single point of contact with ADB. Every UI action, screenshot, and file
//! pull goes through [`Transport::execute`], which blocks until the command
//! returns. The device id is resolved once at the command boundary and
//! threaded explicitly from there on; nothing re-queries it mid-operation.

pub mod actions;

use crate::domain::{Result, SyncError};
use std::process::Command;

/// Synchronous command channel to one device.
pub trait Transport {
    /// Run a command against the device and return its stdout.
    fn execute(&self, args: &[&str]) -> Result<String>;
}

/// ADB-backed transport bound to a resolved device id.
pub struct AdbTransport {
    program: String,
    device: String,
}

impl AdbTransport {
    pub fn new(program: impl Into<String>, device: impl Into<String>) -> Self {
        Self { program: program.into(), device: device.into() }
    }
}

impl Transport for AdbTransport {
    fn execute(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-s")
            .arg(&self.device)
            .args(args)
            .output()
            .map_err(|e| SyncError::Transport(format!("failed to spawn {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyncError::Transport(format!(
                "adb {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// List the ids of connected devices via `adb devices`.
pub fn list_devices(program: &str) -> Result<Vec<String>> {
    let output = Command::new(program)
        .arg("devices")
        .output()
        .map_err(|e| SyncError::Transport(format!("failed to spawn {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SyncError::Transport(format!(
            "{program} devices exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(parse_device_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Resolve the device to use: the requested id when given, otherwise the
/// first connected device.
pub fn resolve_device(program: &str, requested: Option<String>) -> Result<String> {
    if let Some(id) = requested {
        return Ok(id);
    }

    let devices = list_devices(program)?;
    devices
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::Transport("no Android devices found".to_string()))
}

/// Extract device ids from `adb devices` output: lines containing the word
/// "device" minus the "List of devices attached" banner.
fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| line.contains("device") && !line.starts_with("List"))
        .filter_map(|line| line.split_whitespace().next())
        .map(|id| id.to_string())
        .collect()
}
