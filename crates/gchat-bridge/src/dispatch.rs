//! Bridge dispatch
//!
//! Routes decoded page messages to the icon cache, the notification
//! presenter and the tray state. Nothing here is fatal: a bad payload is
//! logged and dropped.

use crate::icon_cache::IconCache;
use crate::message::{BridgeMessage, NotificationMessage};
use crate::presenter::{NotificationPresenter, PageHost, ToastSink};
use gchat_core::TrayIconState;
use std::path::PathBuf;
use std::sync::Mutex;

/// What a single bridge payload did
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutcome {
    /// A toast was handed to the sink
    Notified {
        tag: Option<String>,
        icon: Option<PathBuf>,
    },
    /// The page reported a favicon state
    TrayState {
        state: TrayIconState,
        changed: bool,
    },
    /// The payload was rejected
    Dropped(String),
}

/// Current tray state, starting offline until the page reports otherwise
#[derive(Debug, Default)]
pub struct TrayStatus {
    state: Mutex<TrayIconState>,
}

impl TrayStatus {
    pub fn get(&self) -> TrayIconState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns `true` when the state actually changed
    pub fn set(&self, state: TrayIconState) -> bool {
        let mut current = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let changed = *current != state;
        *current = state;
        changed
    }
}

pub struct Bridge<S: ToastSink> {
    icons: IconCache,
    presenter: NotificationPresenter<S>,
    tray: TrayStatus,
}

impl<S: ToastSink> Bridge<S> {
    pub fn new(icons: IconCache, sink: S) -> Self {
        Self {
            icons,
            presenter: NotificationPresenter::new(sink),
            tray: TrayStatus::default(),
        }
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    pub fn presenter(&self) -> &NotificationPresenter<S> {
        &self.presenter
    }

    pub fn tray_state(&self) -> TrayIconState {
        self.tray.get()
    }

    /// Handle one raw payload posted by the page script
    pub fn handle(&self, raw: &str) -> BridgeOutcome {
        let message = match BridgeMessage::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Dropping bridge message: {}", e);
                return BridgeOutcome::Dropped(e.to_string());
            }
        };
        log::trace!("Bridge message: {}", message.kind());

        match message {
            BridgeMessage::Notification(notification) => self.notify(notification),
            BridgeMessage::Favicon { state } => self.set_tray_state(state),
        }
    }

    fn notify(&self, notification: NotificationMessage) -> BridgeOutcome {
        let icon = match (&notification.icon_base64, &notification.icon_mime_type) {
            (Some(data), Some(mime)) => self.icons.resolve(data, mime),
            _ => None,
        };

        self.presenter.present(
            &notification.title,
            &notification.body,
            notification.tag.as_deref(),
            icon.clone(),
        );

        BridgeOutcome::Notified {
            tag: notification.tag,
            icon,
        }
    }

    pub fn set_tray_state(&self, state: TrayIconState) -> BridgeOutcome {
        let changed = self.tray.set(state);
        if changed {
            log::info!("Tray state -> {}", state);
        }
        BridgeOutcome::TrayState { state, changed }
    }

    /// The window left the chat application (sign-in page, error page)
    pub fn set_offline(&self) -> BridgeOutcome {
        self.set_tray_state(TrayIconState::Offline)
    }

    pub fn toast_activated(&self, arguments: &str, host: &dyn PageHost) {
        self.presenter.on_activated(arguments, host);
    }

    pub fn toast_dismissed(&self, arguments: &str, host: &dyn PageHost) {
        self.presenter.on_dismissed(arguments, host);
    }
}
