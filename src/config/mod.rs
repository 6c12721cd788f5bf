//! Configuration loading
//!
//! Handles loading from config files with defaults tuned to Relay for
//! Reddit's filter screen; the CLI overrides individual fields per command.

pub mod loader;

pub use loader::load_config;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tool configuration.
///
/// Every field has a default matching the layout of Relay's filter list on a
/// 1080x2280 handset; the crop band and coordinates are deliberately
/// configurable because they are tuned to one specific application layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RES backup file to read desired filters from.
    #[serde(default = "default_backup_path")]
    pub backup_path: PathBuf,

    /// CSV ledger mirroring the filters observed on-device.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// ADB executable.
    #[serde(default = "default_adb_program")]
    pub adb_program: String,

    /// Tesseract executable used for screen text recognition.
    #[serde(default = "default_tesseract_program")]
    pub tesseract_program: String,

    /// Top of the OCR crop band as a fraction of screenshot height.
    /// Discards the title/header region above the filter list.
    #[serde(default = "default_crop_top")]
    pub crop_top: f64,

    /// Bottom of the OCR crop band as a fraction of screenshot height.
    /// Discards the navigation chrome below the filter list.
    #[serde(default = "default_crop_bottom")]
    pub crop_bottom: f64,

    /// Screen location of the filter screen's submit (+) control.
    #[serde(default = "default_submit_tap")]
    pub submit_tap: TapPoint,

    /// Swipe gesture that advances the filter list by one page.
    #[serde(default)]
    pub scroll_swipe: SwipeGesture,

    /// Iterations between ledger flushes during a capture run.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Screenshot iteration cap for a capture run.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// UI settle delays. Mandatory synchronous waits, not hints: the device
    /// needs this long to register each input.
    #[serde(default)]
    pub delays: Delays,
}

/// An absolute tap coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TapPoint {
    pub x: u32,
    pub y: u32,
}

/// Arguments to `input swipe`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwipeGesture {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub duration_ms: u32,
}

impl Default for SwipeGesture {
    fn default() -> Self {
        // Upward page swipe through the middle of the list.
        Self { x1: 500, y1: 1500, x2: 500, y2: 780, duration_ms: 300 }
    }
}

/// Settle delays between device actions, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Delays {
    /// After `input text`, before tapping submit.
    #[serde(default = "default_after_text")]
    pub after_text: f64,

    /// After tapping the submit control.
    #[serde(default = "default_after_tap")]
    pub after_tap: f64,

    /// After pulling a screenshot, before reading it.
    #[serde(default = "default_after_pull")]
    pub after_pull: f64,

    /// After a scroll swipe, while the list settles.
    #[serde(default = "default_after_swipe")]
    pub after_swipe: f64,

    /// Between consecutive add attempts, regardless of outcome.
    #[serde(default = "default_between_adds")]
    pub between_adds: f64,
}

impl Delays {
    pub fn after_text(&self) -> Duration {
        Duration::from_secs_f64(self.after_text)
    }

    pub fn after_tap(&self) -> Duration {
        Duration::from_secs_f64(self.after_tap)
    }

    pub fn after_pull(&self) -> Duration {
        Duration::from_secs_f64(self.after_pull)
    }

    pub fn after_swipe(&self) -> Duration {
        Duration::from_secs_f64(self.after_swipe)
    }

    pub fn between_adds(&self) -> Duration {
        Duration::from_secs_f64(self.between_adds)
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            after_text: default_after_text(),
            after_tap: default_after_tap(),
            after_pull: default_after_pull(),
            after_swipe: default_after_swipe(),
            between_adds: default_between_adds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_path: default_backup_path(),
            ledger_path: default_ledger_path(),
            adb_program: default_adb_program(),
            tesseract_program: default_tesseract_program(),
            crop_top: default_crop_top(),
            crop_bottom: default_crop_bottom(),
            submit_tap: default_submit_tap(),
            scroll_swipe: SwipeGesture::default(),
            batch_size: default_batch_size(),
            max_iterations: default_max_iterations(),
            delays: Delays::default(),
        }
    }
}

fn default_backup_path() -> PathBuf {
    PathBuf::from("data/RES.json")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("data/relay.csv")
}

fn default_adb_program() -> String {
    "adb".to_string()
}

fn default_tesseract_program() -> String {
    "tesseract".to_string()
}

fn default_crop_top() -> f64 {
    0.30
}

fn default_crop_bottom() -> f64 {
    0.80
}

fn default_submit_tap() -> TapPoint {
    // Relay's "+" control on the filter list screen.
    TapPoint { x: 863, y: 610 }
}

fn default_batch_size() -> usize {
    10
}

fn default_max_iterations() -> usize {
    5000
}

fn default_after_text() -> f64 {
    0.5
}

fn default_after_tap() -> f64 {
    1.0
}

fn default_after_pull() -> f64 {
    1.0
}

fn default_after_swipe() -> f64 {
    2.0
}

fn default_between_adds() -> f64 {
    1.5
}
