//! Application context owned by the event loop

use crate::instance::InstanceGuard;
use crate::menu::{self, MenuAction, MenuActions};
use crate::platform::{self, DialogReporter};
use crate::toast::{ActivationRouter, ToastBackend};
use crate::tray::Tray;
use crate::window::MainWindow;
use crate::UserEvent;
use gchat_bridge::script::PAGE_BRIDGE;
use gchat_bridge::{Bridge, BridgeOutcome, ExternalOpener, IconCache, PageHost};
use gchat_core::config::{CHAT_URL, PROJECT_URL};
use gchat_core::ShellConfig;
use muda::Menu;
use tao::event::WindowEvent;
use tao::event_loop::{ControlFlow, EventLoop, EventLoopProxy};
use tray_icon::{MouseButton, TrayIconEvent};
use tracing::{debug, error, info, warn};

pub struct ShellContext {
    config: ShellConfig,
    main: MainWindow,
    bridge: Bridge<ToastBackend>,
    opener: ExternalOpener,
    actions: MenuActions,
    tray: Option<Tray>,
    _menu_bar: Menu,
    instance: Option<InstanceGuard>,
}

impl ShellContext {
    pub fn new(
        event_loop: &EventLoop<UserEvent>,
        config: ShellConfig,
        instance: InstanceGuard,
        proxy: EventLoopProxy<UserEvent>,
    ) -> anyhow::Result<Self> {
        let main = MainWindow::create(event_loop, &config, proxy.clone())?;

        let mut actions = MenuActions::new();
        let menu_bar = menu::build_menu_bar(&mut actions)?;
        if let Err(e) = platform::attach_menu(main.window(), &menu_bar) {
            error!("Failed to initialize menu: {}", e);
        }

        let icons = IconCache::new(&config.temp_dir, config.icon_cache_dir());
        let toasts = ToastBackend::new(ActivationRouter::new(proxy));

        Ok(Self {
            bridge: Bridge::new(icons, toasts),
            opener: platform::external_opener(),
            main,
            actions,
            tray: None,
            _menu_bar: menu_bar,
            instance: Some(instance),
            config,
        })
    }

    pub fn install_tray(&mut self) {
        if self.tray.is_some() {
            return;
        }
        match Tray::build(&mut self.actions, self.bridge.tray_state()) {
            Ok(tray) => self.tray = Some(tray),
            Err(e) => error!("Failed to create tray icon: {}", e),
        }
    }

    pub fn handle_window_event(&mut self, event: WindowEvent<'_>, control_flow: &mut ControlFlow) {
        match event {
            WindowEvent::CloseRequested => {
                debug!("Close requested, hiding to tray");
                if self.tray.is_some() {
                    self.main.hide();
                } else {
                    // Without a tray there is no way back to a hidden window
                    self.quit(control_flow);
                }
            }
            WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
                self.main.save_placement(&self.config.placement_path());
            }
            _ => {}
        }
    }

    pub fn handle_user_event(&mut self, event: UserEvent, control_flow: &mut ControlFlow) {
        match event {
            UserEvent::Bridge(raw) => {
                let outcome = self.bridge.handle(&raw);
                self.apply(outcome);
            }
            UserEvent::PageLoaded(url) => self.page_loaded(&url),
            UserEvent::OpenExternal(url) => {
                let outcome = self.opener.open(&url, &DialogReporter);
                debug!("External open of {} -> {:?}", url, outcome);
            }
            UserEvent::ToastActivated(arguments) => {
                self.bridge.toast_activated(&arguments, &self.main);
            }
            UserEvent::ToastDismissed(arguments) => {
                self.bridge.toast_dismissed(&arguments, &self.main);
            }
            UserEvent::Menu(id) => match self.actions.lookup(&id) {
                Some(action) => self.run_action(action, control_flow),
                None => debug!("Unhandled menu id {:?}", id),
            },
            UserEvent::Tray(TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            }) => self.main.show_and_focus(),
            UserEvent::Tray(_) => {}
        }
    }

    fn apply(&mut self, outcome: BridgeOutcome) {
        match outcome {
            BridgeOutcome::TrayState {
                state,
                changed: true,
            } => {
                if let Some(tray) = self.tray.as_mut() {
                    tray.set_state(state);
                }
            }
            BridgeOutcome::Notified { tag, icon } => {
                debug!("Toast shown (tag {:?}, icon {:?})", tag, icon);
            }
            BridgeOutcome::TrayState { .. } | BridgeOutcome::Dropped(_) => {}
        }
    }

    fn page_loaded(&mut self, url: &str) {
        if url.starts_with(CHAT_URL) {
            info!("Chat loaded, installing page bridge");
            self.main.evaluate_script(PAGE_BRIDGE);
        } else {
            info!("Left the chat application ({}), tray offline", url);
            let outcome = self.bridge.set_offline();
            self.apply(outcome);
        }
    }

    fn run_action(&mut self, action: MenuAction, control_flow: &mut ControlFlow) {
        match action {
            MenuAction::ToggleWindow => self.main.toggle(),
            MenuAction::Reload => self.main.reload(),
            MenuAction::OpenProject => {
                self.opener.open(PROJECT_URL, &DialogReporter);
            }
            MenuAction::About => {
                if crate::about::show() {
                    self.opener.open(PROJECT_URL, &DialogReporter);
                }
            }
            MenuAction::Relaunch => self.relaunch(control_flow),
            MenuAction::Quit => self.quit(control_flow),
        }
    }

    fn relaunch(&mut self, control_flow: &mut ControlFlow) {
        // Let the new process become the primary instance
        self.instance.take();

        match std::env::current_exe() {
            Ok(exe) => match std::process::Command::new(&exe).spawn() {
                Ok(_) => info!("Relaunched {:?}", exe),
                Err(e) => error!("Failed to relaunch {:?}: {}", exe, e),
            },
            Err(e) => error!("Cannot locate the current executable: {}", e),
        }
        self.quit(control_flow);
    }

    fn quit(&mut self, control_flow: &mut ControlFlow) {
        info!("Shutting down");
        self.tray.take();
        if let Err(e) = self.bridge.icons().purge() {
            warn!("Failed to remove temporary files: {}", e);
        }
        *control_flow = ControlFlow::Exit;
    }
}
