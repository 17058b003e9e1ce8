//! Windows platform implementation

use super::LaunchError;
use gchat_bridge::UrlLauncher;
use gchat_core::ShellResult;
use muda::Menu;
use std::os::windows::process::CommandExt;
use std::process::Command;
use tao::platform::windows::WindowExtWindows;
use tao::window::Window;
use tracing::debug;
use windows::core::{HSTRING, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, SetForegroundWindow, ShowWindow, SW_RESTORE, SW_SHOWNORMAL,
};

const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Opens URLs through the shell's registered protocol handler
pub struct DefaultHandlerLauncher;

impl UrlLauncher for DefaultHandlerLauncher {
    fn name(&self) -> &str {
        "ShellExecute"
    }

    fn launch(&self, url: &str) -> ShellResult<()> {
        debug!("ShellExecute open {}", url);
        let result = unsafe {
            ShellExecuteW(
                HWND::default(),
                &HSTRING::from("open"),
                &HSTRING::from(url),
                PCWSTR::null(),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };

        // Values up to 32 are error codes
        let code = result.0 as isize;
        if code <= 32 {
            return Err(LaunchError::ShellExecute(code).into());
        }
        Ok(())
    }
}

/// Opens URLs with `cmd /C start` in a hidden console
pub struct CommandInterpreterLauncher;

impl UrlLauncher for CommandInterpreterLauncher {
    fn name(&self) -> &str {
        "cmd start"
    }

    fn launch(&self, url: &str) -> ShellResult<()> {
        debug!("cmd /C start {}", url);
        // Quoted so cmd does not treat `&` in query strings as a separator.
        // The empty title argument is required when the target is quoted.
        let status = Command::new("cmd")
            .arg("/C")
            .raw_arg(format!("start \"\" \"{}\"", url.replace('"', "%22")))
            .creation_flags(CREATE_NO_WINDOW)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: "cmd".to_string(),
                source,
            })?;

        if !status.success() {
            return Err(LaunchError::Exit {
                program: "cmd".to_string(),
                status,
            }
            .into());
        }
        Ok(())
    }
}

pub fn attach_menu(window: &Window, menu: &Menu) -> anyhow::Result<()> {
    unsafe {
        menu.init_for_hwnd(window.hwnd() as _)
            .map_err(|e| anyhow::anyhow!("HWND menu init failed: {}", e))?;
    }
    debug!("Windows menu initialized");
    Ok(())
}

/// Restore and foreground the window of the instance already running
pub fn activate_existing_window(title: &str) {
    let hwnd = match unsafe { FindWindowW(PCWSTR::null(), &HSTRING::from(title)) } {
        Ok(hwnd) if !hwnd.is_invalid() => hwnd,
        _ => {
            debug!("No existing window titled {:?}", title);
            return;
        }
    };

    unsafe {
        let _ = ShowWindow(hwnd, SW_RESTORE);
        let _ = SetForegroundWindow(hwnd);
    }
}
