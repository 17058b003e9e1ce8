//! Google Chat Desktop - application entry point
//!
//! One window hosting the Google Chat web app in a system webview, a tray
//! icon mirroring the page's unread state, and native toasts for the
//! page's web notifications.

mod about;
mod context;
mod instance;
mod menu;
mod platform;
mod toast;
mod tray;
mod window;

use anyhow::Context as _;
use context::ShellContext;
use gchat_core::ShellConfig;
use instance::InstanceCheck;
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Events forwarded to the UI thread through the event-loop proxy
#[derive(Debug)]
pub enum UserEvent {
    /// Raw payload posted by the page script
    Bridge(String),
    /// The webview finished loading a document
    PageLoaded(String),
    /// The page asked for a URL that must open outside the app
    OpenExternal(String),
    /// A toast was clicked; carries its encoded arguments
    ToastActivated(String),
    /// A toast was dismissed by the user
    ToastDismissed(String),
    Menu(muda::MenuId),
    Tray(tray_icon::TrayIconEvent),
}

fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    tracing_log::LogTracer::init().context("failed to set log tracer")?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set subscriber")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match ShellConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (ShellConfig::default(), Some(e)),
    };

    init_logging(&config.log_filter)?;
    if let Some(e) = config_error {
        warn!("Ignoring configuration at {:?}: {}", config.config_path(), e);
    }

    info!("Starting Google Chat Desktop {}", env!("CARGO_PKG_VERSION"));

    let instance = match instance::acquire() {
        InstanceCheck::Primary(guard) => guard,
        InstanceCheck::AlreadyRunning => {
            info!("Another instance is running; handing over to it");
            platform::activate_existing_window(window::WINDOW_TITLE);
            return Ok(());
        }
    };

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let menu_proxy = proxy.clone();
    muda::MenuEvent::set_event_handler(Some(move |event: muda::MenuEvent| {
        let _ = menu_proxy.send_event(UserEvent::Menu(event.id));
    }));
    let tray_proxy = proxy.clone();
    tray_icon::TrayIconEvent::set_event_handler(Some(move |event| {
        let _ = tray_proxy.send_event(UserEvent::Tray(event));
    }));

    let mut ctx = ShellContext::new(&event_loop, config, instance, proxy)
        .context("failed to create the main window")?;

    info!("Window created successfully");

    event_loop.run(move |event, _target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            // The tray must be created once the loop is running
            Event::NewEvents(StartCause::Init) => ctx.install_tray(),
            Event::WindowEvent { event, .. } => ctx.handle_window_event(event, control_flow),
            Event::UserEvent(user_event) => ctx.handle_user_event(user_event, control_flow),
            _ => {}
        }
    })
}
