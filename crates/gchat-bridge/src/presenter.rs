//! Native toast presentation
//!
//! Turns decoded notifications into toast requests and routes toast
//! activation back into the page as `notificationClick` events.

use crate::script;
use std::path::PathBuf;

/// Argument key carrying the page notification tag
pub const TAG_ARGUMENT: &str = "tag";

/// Key/value arguments attached to a toast and handed back on activation.
///
/// Encoded as `key=value;key2=value2`, with `%`, `;` and `=` escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastArguments {
    pairs: Vec<(String, String)>,
}

impl ToastArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an argument
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parse an encoded argument string. Segments without `=` become keys
    /// with an empty value.
    pub fn parse(encoded: &str) -> Self {
        let pairs = encoded
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((k, v)) => (unescape(k), unescape(v)),
                None => (unescape(segment), String::new()),
            })
            .collect();
        Self { pairs }
    }
}

fn escape(s: &str) -> String {
    s.replace('%', "%25").replace(';', "%3B").replace('=', "%3D")
}

fn unescape(s: &str) -> String {
    s.replace("%3B", ";").replace("%3D", "=").replace("%25", "%")
}

/// A toast ready to be shown by the OS notification center
#[derive(Debug, Clone, PartialEq)]
pub struct ToastRequest {
    pub title: String,
    pub body: String,
    /// Always set: the page plays its own sounds
    pub silent: bool,
    pub arguments: ToastArguments,
    /// Replaces the app logo when present
    pub image: Option<PathBuf>,
}

/// Delivers toasts to the OS
pub trait ToastSink {
    /// Enqueue a toast. Must not block the caller.
    fn show(&self, toast: ToastRequest);
}

/// The window hosting the chat page
pub trait PageHost {
    /// Run a script inside the page (fire-and-forget)
    fn evaluate_script(&self, script: &str);

    /// Show, restore and focus the window
    fn show_and_focus(&self);
}

pub struct NotificationPresenter<S: ToastSink> {
    sink: S,
}

impl<S: ToastSink> NotificationPresenter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn present(&self, title: &str, body: &str, tag: Option<&str>, icon_path: Option<PathBuf>) {
        let mut arguments = ToastArguments::new();
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            arguments = arguments.add(TAG_ARGUMENT, tag);
        }

        self.sink.show(ToastRequest {
            title: title.to_string(),
            body: body.to_string(),
            silent: true,
            arguments,
            image: icon_path,
        });
    }

    /// The user clicked a toast.
    pub fn on_activated(&self, arguments: &str, host: &dyn PageHost) {
        let args = ToastArguments::parse(arguments);
        if let Some(tag) = args.get(TAG_ARGUMENT) {
            log::debug!("Toast activated for tag {}", tag);
            host.evaluate_script(&script::dispatch_notification_event(
                script::NOTIFICATION_CLICK_EVENT,
                tag,
            ));
        }
        host.show_and_focus();
    }

    /// The user dismissed a toast without activating it.
    pub fn on_dismissed(&self, arguments: &str, host: &dyn PageHost) {
        let args = ToastArguments::parse(arguments);
        if let Some(tag) = args.get(TAG_ARGUMENT) {
            log::debug!("Toast dismissed for tag {}", tag);
            host.evaluate_script(&script::dispatch_notification_event(
                script::NOTIFICATION_CLOSE_EVENT,
                tag,
            ));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingHost, RecordingSink};
    use super::*;

    #[test]
    fn test_plain_notification() {
        let presenter = NotificationPresenter::new(RecordingSink::default());
        presenter.present("Alice", "Hi", None, None);

        let toasts = presenter.sink().toasts.borrow();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Alice");
        assert_eq!(toasts[0].body, "Hi");
        assert!(toasts[0].silent);
        assert!(toasts[0].arguments.is_empty());
        assert_eq!(toasts[0].image, None);
    }

    #[test]
    fn test_tag_and_icon_are_attached() {
        let presenter = NotificationPresenter::new(RecordingSink::default());
        presenter.present("Bob", "Yo", Some("t1"), Some(PathBuf::from("/tmp/abc.png")));

        let toasts = presenter.sink().toasts.borrow();
        assert_eq!(toasts[0].arguments.encode(), "tag=t1");
        assert_eq!(toasts[0].image, Some(PathBuf::from("/tmp/abc.png")));
    }

    #[test]
    fn test_activation_dispatches_click_and_focuses() {
        let presenter = NotificationPresenter::new(RecordingSink::default());
        let host = RecordingHost::default();

        presenter.on_activated("tag=t1", &host);

        let scripts = host.scripts.borrow();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("'notificationClick'"));
        assert!(scripts[0].contains(r#"{ detail: { tag: "t1" } }"#));
        assert_eq!(host.focused.get(), 1);
    }

    #[test]
    fn test_activation_without_tag_only_focuses() {
        let presenter = NotificationPresenter::new(RecordingSink::default());
        let host = RecordingHost::default();

        presenter.on_activated("", &host);
        presenter.on_activated("action=open", &host);

        assert!(host.scripts.borrow().is_empty());
        assert_eq!(host.focused.get(), 2);
    }

    #[test]
    fn test_dismissal_dispatches_close_without_focus() {
        let presenter = NotificationPresenter::new(RecordingSink::default());
        let host = RecordingHost::default();

        presenter.on_dismissed("tag=t2", &host);

        assert!(host.scripts.borrow()[0].contains("'notificationClose'"));
        assert_eq!(host.focused.get(), 0);
    }

    #[test]
    fn test_arguments_escaping() {
        let args = ToastArguments::new()
            .add("tag", "a;b=c%d")
            .add("other", "x");
        let encoded = args.encode();
        assert_eq!(encoded, "tag=a%3Bb%3Dc%25d;other=x");

        let parsed = ToastArguments::parse(&encoded);
        assert_eq!(parsed.get("tag"), Some("a;b=c%d"));
        assert_eq!(parsed.get("other"), Some("x"));
        assert_eq!(parsed, args);
    }

    #[test]
    fn test_arguments_replace_and_bare_keys() {
        let args = ToastArguments::new().add("tag", "one").add("tag", "two");
        assert_eq!(args.encode(), "tag=two");

        let parsed = ToastArguments::parse("flag;tag=t1;;");
        assert_eq!(parsed.get("flag"), Some(""));
        assert_eq!(parsed.get("tag"), Some("t1"));
        assert_eq!(parsed.get("missing"), None);
    }
}
