//! Main window and the chat webview it hosts

use crate::UserEvent;
use anyhow::Context as _;
use gchat_bridge::{handle_new_window, PageHost};
use gchat_core::config::CHAT_URL;
use gchat_core::placement::{MonitorArea, WindowPlacement};
use gchat_core::ShellConfig;
use std::path::Path;
use tao::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use tao::event_loop::{EventLoop, EventLoopProxy};
use tao::monitor::MonitorHandle;
use tao::window::{Window, WindowBuilder};
use tracing::{debug, info, warn};
use wry::{PageLoadEvent, WebContext, WebView, WebViewBuilder};

/// Title of the main window, also used to find it from a second instance
pub const WINDOW_TITLE: &str = "Google Chat";

const DEFAULT_WIDTH: f64 = 1200.0;
const DEFAULT_HEIGHT: f64 = 800.0;

pub struct MainWindow {
    window: Window,
    webview: WebView,
    // Must outlive the webview
    _web_context: WebContext,
}

fn monitor_area(monitor: MonitorHandle) -> MonitorArea {
    let position = monitor.position();
    let size = monitor.size();
    MonitorArea {
        device_name: monitor.name().unwrap_or_default(),
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
    }
}

impl MainWindow {
    pub fn create(
        event_loop: &EventLoop<UserEvent>,
        config: &ShellConfig,
        proxy: EventLoopProxy<UserEvent>,
    ) -> anyhow::Result<Self> {
        let mut builder = WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT))
            .with_visible(!config.start_hidden)
            .with_window_icon(crate::tray::window_icon());

        if let Some(placement) = WindowPlacement::load(&config.placement_path()) {
            let monitors: Vec<MonitorArea> =
                event_loop.available_monitors().map(monitor_area).collect();
            let plan = placement.resolve(&monitors);
            debug!("Restoring window placement {:?}", plan);

            if let Some((width, height)) = plan.size {
                builder = builder.with_inner_size(PhysicalSize::new(width, height));
            }
            if let Some((x, y)) = plan.position {
                builder = builder.with_position(PhysicalPosition::new(x, y));
            }
        }

        let window = builder.build(event_loop).context("failed to build window")?;

        let mut web_context = WebContext::new(Some(config.webview_data_dir()));
        let webview = build_webview(&window, &mut web_context, config.devtools, proxy)?;

        Ok(Self {
            window,
            webview,
            _web_context: web_context,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn hide(&self) {
        self.window.set_visible(false);
    }

    pub fn toggle(&self) {
        if self.window.is_visible() {
            self.hide();
        } else {
            self.show_and_focus();
        }
    }

    /// Load the chat application again from its base URL
    pub fn reload(&self) {
        if let Err(e) = self.webview.load_url(CHAT_URL) {
            warn!("Reload failed: {}", e);
        }
    }

    /// Persist the current placement unless the window is minimized or
    /// maximized.
    pub fn save_placement(&self, path: &Path) {
        if self.window.is_minimized() || self.window.is_maximized() {
            return;
        }
        let Ok(position) = self.window.outer_position() else {
            return;
        };
        let size = self.window.inner_size();
        let monitors: Vec<MonitorArea> =
            self.window.available_monitors().map(monitor_area).collect();

        let Some(placement) = WindowPlacement::capture(
            position.x as f64,
            position.y as f64,
            size.width as f64,
            size.height as f64,
            &monitors,
        ) else {
            return;
        };

        if let Err(e) = placement.save(path) {
            warn!("Failed to save window placement: {}", e);
        }
    }
}

impl PageHost for MainWindow {
    fn evaluate_script(&self, script: &str) {
        if let Err(e) = self.webview.evaluate_script(script) {
            warn!("Script evaluation failed: {}", e);
        }
    }

    fn show_and_focus(&self) {
        self.window.set_visible(true);
        self.window.set_minimized(false);
        self.window.set_focus();
    }
}

fn build_webview(
    window: &Window,
    web_context: &mut WebContext,
    devtools: bool,
    proxy: EventLoopProxy<UserEvent>,
) -> anyhow::Result<WebView> {
    let ipc_proxy = proxy.clone();
    let load_proxy = proxy.clone();
    let window_proxy = proxy;

    let builder = WebViewBuilder::with_web_context(web_context)
        .with_url(CHAT_URL)
        .with_devtools(devtools)
        .with_clipboard(true)
        .with_ipc_handler(move |message| {
            let _ = ipc_proxy.send_event(UserEvent::Bridge(message.body().clone()));
        })
        .with_on_page_load_handler(move |event, url| {
            if let PageLoadEvent::Finished = event {
                let _ = load_proxy.send_event(UserEvent::PageLoaded(url));
            }
        })
        .with_new_window_req_handler(move |url| {
            handle_new_window(&url, |external| {
                let _ = window_proxy.send_event(UserEvent::OpenExternal(external));
            })
        });

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(window)?;

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .context("window has no GTK container")?;
        builder.build_gtk(vbox)?
    };

    info!("Chat webview created");
    Ok(webview)
}

