//! OS toast backend
//!
//! Windows toasts go through WinRT; their activation and dismissal
//! callbacks fire on WinRT threads and are forwarded to the UI thread as
//! `UserEvent`s. Elsewhere `notify-rust` talks to the desktop notification
//! service.

use crate::UserEvent;
use gchat_bridge::{ToastRequest, ToastSink};
use tao::event_loop::EventLoopProxy;
use tracing::warn;

/// Carries toast callbacks back onto the event loop
#[derive(Clone)]
pub struct ActivationRouter {
    proxy: EventLoopProxy<UserEvent>,
}

impl ActivationRouter {
    pub fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self { proxy }
    }

    pub fn activated(&self, arguments: String) {
        if self.proxy.send_event(UserEvent::ToastActivated(arguments)).is_err() {
            warn!("Toast activation arrived after the event loop closed");
        }
    }

    pub fn dismissed(&self, arguments: String) {
        let _ = self.proxy.send_event(UserEvent::ToastDismissed(arguments));
    }
}

pub struct ToastBackend {
    router: ActivationRouter,
}

impl ToastBackend {
    pub fn new(router: ActivationRouter) -> Self {
        Self { router }
    }
}

#[cfg(target_os = "windows")]
impl ToastSink for ToastBackend {
    fn show(&self, toast: ToastRequest) {
        use tauri_winrt_notification::{IconCrop, Sound, Toast, ToastDismissalReason};

        let arguments = toast.arguments.encode();

        let mut winrt = Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&toast.title)
            .text1(&toast.body)
            .sound(if toast.silent { None } else { Some(Sound::Default) });

        if let Some(image) = &toast.image {
            winrt = winrt.icon(image, IconCrop::Square, "");
        }

        let router = self.router.clone();
        let activated_args = arguments.clone();
        winrt = winrt.on_activated(move |_action| {
            router.activated(activated_args.clone());
            Ok(())
        });

        let router = self.router.clone();
        winrt = winrt.on_dismissed(move |reason| {
            // Timed-out toasts move to the action centre and can still be clicked
            if matches!(reason, Some(ToastDismissalReason::UserCanceled)) {
                router.dismissed(arguments.clone());
            }
            Ok(())
        });

        if let Err(e) = winrt.show() {
            warn!("Failed to show toast: {}", e);
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl ToastSink for ToastBackend {
    fn show(&self, toast: ToastRequest) {
        let router = self.router.clone();
        // D-Bus round trips and the action wait happen off the UI thread
        let spawned = std::thread::Builder::new()
            .name("toast".into())
            .spawn(move || show_desktop_notification(toast, router));
        if let Err(e) = spawned {
            warn!("Failed to spawn toast thread: {}", e);
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn desktop_notification(toast: &ToastRequest) -> notify_rust::Notification {
    let mut notification = notify_rust::Notification::new();
    notification
        .appname("Google Chat")
        .summary(&toast.title)
        .body(&toast.body);
    if let Some(image) = &toast.image {
        notification.icon(&image.to_string_lossy());
    }

    // The sound hint only exists on the freedesktop backend
    #[cfg(all(unix, not(target_os = "macos")))]
    if toast.silent {
        notification.hint(notify_rust::Hint::SuppressSound(true));
    }

    #[cfg(target_os = "linux")]
    notification.action("default", "Open");

    notification
}

#[cfg(not(target_os = "windows"))]
fn show_desktop_notification(toast: ToastRequest, router: ActivationRouter) {
    let notification = desktop_notification(&toast);

    #[cfg(target_os = "linux")]
    {
        let arguments = toast.arguments.encode();
        match notification.show() {
            Ok(handle) => handle.wait_for_action(|action| match action {
                "default" => router.activated(arguments),
                "__closed" => router.dismissed(arguments),
                _ => {}
            }),
            Err(e) => warn!("Failed to show notification: {}", e),
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = router;
        if let Err(e) = notification.show() {
            warn!("Failed to show notification: {}", e);
        }
    }
}
