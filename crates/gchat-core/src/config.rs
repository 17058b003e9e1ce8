//! Shell configuration

use crate::error::{ShellError, ShellResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform data directory
pub const APP_DIR_NAME: &str = "google-chat-desktop";

/// Base URL of the hosted chat application
pub const CHAT_URL: &str = "https://mail.google.com/chat/";

/// Hosts allowed to load inside the embedded browser (substring match)
pub const TRUSTED_DOMAINS: [&str; 4] = [
    "accounts.google.com",
    "accounts.youtube.com",
    "chat.google.com",
    "mail.google.com",
];

/// Project page opened from the Help menu
pub const PROJECT_URL: &str = "https://github.com/KHiyowa/google-chat-desktop";

/// Name of the icon cache subdirectory inside the per-run temp directory
pub const ICON_CACHE_DIR_NAME: &str = "iconCache";

const CONFIG_FILE_NAME: &str = "config.json";
const PLACEMENT_FILE_NAME: &str = "window.json";

/// Shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// User data directory (settings, window placement, webview profile)
    pub data_dir: PathBuf,

    /// Per-run temporary directory, removed on clean exit
    #[serde(skip)]
    pub temp_dir: PathBuf,

    /// Enable webview developer tools
    pub devtools: bool,

    /// Start with the window hidden in the tray
    pub start_hidden: bool,

    /// Default log filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME),
            temp_dir: default_temp_dir(),
            devtools: cfg!(debug_assertions),
            start_hidden: false,
            log_filter: "info".to_string(),
        }
    }
}

impl ShellConfig {
    /// Load the configuration from the default data directory.
    ///
    /// A missing file yields defaults. A malformed file is an error; callers
    /// decide whether to fall back.
    pub fn load() -> ShellResult<Self> {
        let defaults = Self::default();
        let path = defaults.config_path();
        Ok(Self::load_from(&path)?.unwrap_or(defaults))
    }

    /// Load a configuration file. Returns `Ok(None)` if it does not exist.
    pub fn load_from(path: &Path) -> ShellResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let mut config: ShellConfig = serde_json::from_str(&contents)?;
        if config.data_dir.as_os_str().is_empty() {
            return Err(ShellError::config("data_dir must not be empty"));
        }
        config.temp_dir = default_temp_dir();
        Ok(Some(config))
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    /// Directory holding cached notification icons
    pub fn icon_cache_dir(&self) -> PathBuf {
        self.temp_dir.join(ICON_CACHE_DIR_NAME)
    }

    /// File holding the persisted window placement
    pub fn placement_path(&self) -> PathBuf {
        self.data_dir.join(PLACEMENT_FILE_NAME)
    }

    /// Directory handed to the webview for its browser profile
    pub fn webview_data_dir(&self) -> PathBuf {
        self.data_dir.join("webview")
    }
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}", APP_DIR_NAME, std::process::id()))
}
