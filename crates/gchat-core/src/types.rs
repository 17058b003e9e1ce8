//! Common types used throughout the shell

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status shown by the tray icon.
///
/// Mirrors the favicon the chat page currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrayIconState {
    Normal,
    Badge,
    #[default]
    Offline,
}

impl TrayIconState {
    pub fn as_str(self) -> &'static str {
        match self {
            TrayIconState::Normal => "normal",
            TrayIconState::Badge => "badge",
            TrayIconState::Offline => "offline",
        }
    }
}

impl fmt::Display for TrayIconState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrayIconState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TrayIconState::Normal),
            "badge" => Ok(TrayIconState::Badge),
            "offline" => Ok(TrayIconState::Offline),
            other => Err(format!("unknown tray state '{}'", other)),
        }
    }
}
