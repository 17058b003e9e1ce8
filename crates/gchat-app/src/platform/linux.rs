//! Linux platform implementation

use super::run_with_url;
use gchat_bridge::UrlLauncher;
use gchat_core::ShellResult;
use muda::Menu;
use tao::platform::unix::WindowExtUnix;
use tao::window::Window;
use tracing::debug;

/// `xdg-open`, the desktop's default handler
pub struct DefaultHandlerLauncher;

impl UrlLauncher for DefaultHandlerLauncher {
    fn name(&self) -> &str {
        "xdg-open"
    }

    fn launch(&self, url: &str) -> ShellResult<()> {
        debug!("xdg-open {}", url);
        Ok(run_with_url("xdg-open", &[], url)?)
    }
}

// Fails when the browser is not on PATH, otherwise detaches it so the
// caller is not blocked until the browser exits
const BROWSER_SCRIPT: &str =
    r#"b="${BROWSER:-x-www-browser}"; command -v "$b" >/dev/null 2>&1 || exit 127; "$b" "$1" >/dev/null 2>&1 &"#;

/// `$BROWSER` through the shell, falling back to `x-www-browser`
pub struct CommandInterpreterLauncher;

impl UrlLauncher for CommandInterpreterLauncher {
    fn name(&self) -> &str {
        "sh"
    }

    fn launch(&self, url: &str) -> ShellResult<()> {
        debug!("sh -c $BROWSER {}", url);
        Ok(run_with_url(
            "sh",
            &["-c", BROWSER_SCRIPT, "sh"],
            url,
        )?)
    }
}

pub fn attach_menu(window: &Window, menu: &Menu) -> anyhow::Result<()> {
    menu.init_for_gtk_window(window.gtk_window(), window.default_vbox())
        .map_err(|e| anyhow::anyhow!("GTK menu init failed: {}", e))?;
    debug!("Linux menu initialized");
    Ok(())
}

/// Single instance is only enforced on Windows
pub fn activate_existing_window(title: &str) {
    debug!("Not activating {:?}: unsupported on Linux", title);
}
