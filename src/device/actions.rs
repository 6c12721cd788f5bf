//! UI actions over a device transport.

use crate::config::{SwipeGesture, TapPoint};
use crate::device::Transport;
use crate::domain::Result;
use std::path::Path;

/// On-device staging path for captured screenshots.
pub const REMOTE_CAPTURE_PATH: &str = "/sdcard/ocr_temp.png";

/// The UI action vocabulary the sync core needs, bound to one transport.
pub struct DeviceActions<'a> {
    transport: &'a dyn Transport,
}

impl<'a> DeviceActions<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Type text into the currently focused input field.
    pub fn input_text(&self, text: &str) -> Result<()> {
        self.transport.execute(&["shell", "input", "text", text])?;
        Ok(())
    }

    /// Tap an absolute screen coordinate.
    pub fn tap(&self, point: TapPoint) -> Result<()> {
        let x = point.x.to_string();
        let y = point.y.to_string();
        self.transport.execute(&["shell", "input", "tap", &x, &y])?;
        Ok(())
    }

    /// Perform a swipe gesture.
    pub fn swipe(&self, gesture: SwipeGesture) -> Result<()> {
        let x1 = gesture.x1.to_string();
        let y1 = gesture.y1.to_string();
        let x2 = gesture.x2.to_string();
        let y2 = gesture.y2.to_string();
        let duration = gesture.duration_ms.to_string();
        self.transport.execute(&["shell", "input", "swipe", &x1, &y1, &x2, &y2, &duration])?;
        Ok(())
    }

    /// Capture the screen into the on-device staging path.
    pub fn screencap(&self, remote: &str) -> Result<()> {
        self.transport.execute(&["shell", "screencap", "-p", remote])?;
        Ok(())
    }

    /// Pull a file from the device to a local path.
    pub fn pull(&self, remote: &str, local: &Path) -> Result<()> {
        let local = local.to_string_lossy();
        self.transport.execute(&["pull", remote, &local])?;
        Ok(())
    }
}
