//! Google Chat page bridge
//!
//! Everything between the hosted chat page and the native shell that can be
//! exercised without a window: message decoding, the icon cache, the
//! new-window navigation policy, toast presentation and the injected script.

pub mod dispatch;
pub mod icon_cache;
pub mod message;
pub mod navigation;
pub mod presenter;
pub mod script;

pub use dispatch::{Bridge, BridgeOutcome, TrayStatus};
pub use icon_cache::IconCache;
pub use message::{BridgeMessage, DecodeError, NotificationMessage};
pub use navigation::{
    decide, handle_new_window, ExternalOpenOutcome, ExternalOpener, FailureReporter,
    NavigationDecision, UrlLauncher,
};
pub use presenter::{NotificationPresenter, PageHost, ToastArguments, ToastRequest, ToastSink};
