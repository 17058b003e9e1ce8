//! Window placement persistence
//!
//! The window position is stored relative to the top-left corner of the
//! display it was on, together with that display's device name. On the next
//! start the position is re-applied against the same display if it is still
//! connected; otherwise the OS picks the default placement.

use crate::error::{ShellError, ShellResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted window placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowPlacement {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub screen_device_name: String,
}

/// A connected display, in physical pixels
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorArea {
    pub device_name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorArea {
    fn intersection_area(&self, x: f64, y: f64, width: f64, height: f64) -> f64 {
        let left = (self.x as f64).max(x);
        let top = (self.y as f64).max(y);
        let right = (self.x as f64 + self.width as f64).min(x + width);
        let bottom = (self.y as f64 + self.height as f64).min(y + height);
        (right - left).max(0.0) * (bottom - top).max(0.0)
    }
}

/// What to apply to a freshly created window
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlacementPlan {
    /// Inner size, `None` keeps the builder default
    pub size: Option<(f64, f64)>,
    /// Absolute outer position, `None` lets the OS decide
    pub position: Option<(f64, f64)>,
}

impl WindowPlacement {
    /// Read a placement file. Missing or unreadable files yield `None`, as
    /// does anything that is not a JSON object. Absent fields take their
    /// defaults.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match Self::parse(&contents) {
            Ok(placement) => Some(placement),
            Err(e) => {
                log::warn!("Discarding window placement at {:?}: {}", path, e);
                None
            }
        }
    }

    fn parse(contents: &str) -> ShellResult<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        if !value.is_object() {
            return Err(ShellError::config("window placement is not a JSON object"));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn save(&self, path: &Path) -> ShellResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Build a placement from the window's absolute rectangle.
    ///
    /// The owning display is the one with the largest overlap. Returns
    /// `None` when the window is entirely off-screen.
    pub fn capture(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        monitors: &[MonitorArea],
    ) -> Option<Self> {
        let monitor = monitors
            .iter()
            .map(|m| (m, m.intersection_area(x, y, width, height)))
            .filter(|(_, area)| *area > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)?;

        Some(Self {
            top: y - monitor.y as f64,
            left: x - monitor.x as f64,
            width,
            height,
            screen_device_name: monitor.device_name.clone(),
        })
    }

    /// Resolve this placement against the currently connected displays.
    pub fn resolve(&self, monitors: &[MonitorArea]) -> PlacementPlan {
        let size = (self.width > 0.0 && self.height > 0.0).then_some((self.width, self.height));

        let position = monitors
            .iter()
            .find(|m| !self.screen_device_name.is_empty() && m.device_name == self.screen_device_name)
            .map(|m| (m.x as f64 + self.left, m.y as f64 + self.top));

        PlacementPlan { size, position }
    }
}
