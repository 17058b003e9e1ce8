//! Platform abstraction layer
//!
//! Everything that differs between Windows, macOS and Linux: how URLs are
//! handed to the OS, how the menu bar attaches to the window and how an
//! already running instance is brought forward.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use self::linux as imp;
#[cfg(target_os = "macos")]
use self::macos as imp;
#[cfg(target_os = "windows")]
use self::windows as imp;

use gchat_bridge::{ExternalOpener, FailureReporter};
use gchat_core::ShellError;
use muda::Menu;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tao::window::Window;
use thiserror::Error;

pub use imp::activate_existing_window;

/// Why a launcher could not hand a URL to the OS
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
    },

    #[cfg_attr(not(target_os = "windows"), allow(dead_code))]
    #[error("ShellExecuteW failed with code {0}")]
    ShellExecute(isize),
}

impl From<LaunchError> for ShellError {
    fn from(e: LaunchError) -> Self {
        ShellError::launch(e.to_string())
    }
}

/// Build the two-stage launcher chain for this platform
pub fn external_opener() -> ExternalOpener {
    ExternalOpener::new(
        Box::new(imp::DefaultHandlerLauncher),
        Box::new(imp::CommandInterpreterLauncher),
    )
}

/// Attach the menu bar to the main window
pub fn attach_menu(window: &Window, menu: &Menu) -> anyhow::Result<()> {
    imp::attach_menu(window, menu)
}

/// Reports a failed external open with a modal error dialog
pub struct DialogReporter;

impl FailureReporter for DialogReporter {
    fn report_open_failure(&self, _url: &str, details: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title("Google Chat")
            .set_description(details)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Runs `program args.. url` to completion, used by the macOS and Linux
/// launchers. `xdg-open` and `open` only report a missing handler through
/// their exit status.
#[cfg(not(target_os = "windows"))]
pub(crate) fn run_with_url(program: &str, args: &[&str], url: &str) -> Result<(), LaunchError> {
    let status = std::process::Command::new(program)
        .args(args)
        .arg(url)
        .status()
        .map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(LaunchError::Exit {
            program: program.to_string(),
            status,
        });
    }
    Ok(())
}
