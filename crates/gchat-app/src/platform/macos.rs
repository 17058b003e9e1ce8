//! macOS platform implementation

use super::run_with_url;
use gchat_bridge::UrlLauncher;
use gchat_core::ShellResult;
use muda::Menu;
use tao::window::Window;
use tracing::debug;

/// `open`, Launch Services' default handler
pub struct DefaultHandlerLauncher;

impl UrlLauncher for DefaultHandlerLauncher {
    fn name(&self) -> &str {
        "open"
    }

    fn launch(&self, url: &str) -> ShellResult<()> {
        debug!("open {}", url);
        Ok(run_with_url("open", &[], url)?)
    }
}

// Fails when the browser is not on PATH, otherwise detaches it so the
// caller is not blocked until the browser exits
const BROWSER_SCRIPT: &str =
    r#"b="${BROWSER:-open}"; command -v "$b" >/dev/null 2>&1 || exit 127; "$b" "$1" >/dev/null 2>&1 &"#;

/// `$BROWSER` through the shell, falling back to `open`
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

pub fn attach_menu(_window: &Window, menu: &Menu) -> anyhow::Result<()> {
    menu.init_for_nsapp();
    debug!("macOS menu initialized");
    Ok(())
}

/// Single instance is only enforced on Windows
pub fn activate_existing_window(title: &str) {
    debug!("Not activating {:?}: unsupported on macOS", title);
}
